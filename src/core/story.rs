/// Story bundle — the script, consequence table, waypoint atlas, and intro
/// segment a game runs on. Loading, validation, and lint.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::template::Placeholder;
use crate::schema::map::{ConsequenceTable, SegmentSpec, WaypointAtlas};
use crate::schema::story::{BranchTag, StoryBeat};

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("story has no beats")]
    EmptyScript,
    #[error("final beat {0} must not offer choices")]
    TerminalHasChoices(usize),
    #[error("beat {step} offers {branch:?} more than once")]
    DuplicateChoice { step: usize, branch: BranchTag },
    #[error("beat {0} has mood-dependent text but is not the final beat")]
    MoodTextBeforeEnding(usize),
    #[error("final beat body \"{0}\" does not show {{score}}")]
    EndingWithoutScore(String),
    #[error("{context}: segment \"{color}\" has no waypoints")]
    EmptySegment { context: String, color: String },
    #[error("{context}: segment \"{color}\" references unknown waypoint '{waypoint}'")]
    UnknownWaypoint {
        context: String,
        color: String,
        waypoint: String,
    },
    #[error("waypoint '{0}' lies outside the 0..=100 map area")]
    WaypointOutOfBounds(String),
    #[error("consequence for step {step} is outside a script of {len} beats")]
    ConsequenceOutOfRange { step: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Ordered beats. The last one is the ending.
    pub script: Vec<StoryBeat>,
    #[serde(default)]
    pub consequences: ConsequenceTable,
    pub atlas: WaypointAtlas,
    /// First leg of the path, present before any choice is made.
    pub intro: SegmentSpec,
}

impl Story {
    /// Load and validate a story from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Story, StoryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse and validate a story from a RON string.
    pub fn parse_ron(input: &str) -> Result<Story, StoryError> {
        let story: Story = ron::from_str(input)?;
        story.validate()?;
        Ok(story)
    }

    /// Index of the ending beat. Zero for an empty script.
    pub fn terminal_index(&self) -> usize {
        self.script.len().saturating_sub(1)
    }

    pub fn beat(&self, index: usize) -> Option<&StoryBeat> {
        self.script.get(index)
    }

    /// Check the invariants the game relies on.
    pub fn validate(&self) -> Result<(), StoryError> {
        let terminal = self.script.last().ok_or(StoryError::EmptyScript)?;
        let last = self.terminal_index();

        if terminal.choices().is_some() {
            return Err(StoryError::TerminalHasChoices(last));
        }
        for template in terminal.body.variants() {
            if !template.uses(Placeholder::Score) {
                return Err(StoryError::EndingWithoutScore(template.source().to_string()));
            }
        }

        for (step, beat) in self.script.iter().enumerate() {
            if step != last && (beat.title.is_mood_dependent() || beat.body.is_mood_dependent()) {
                return Err(StoryError::MoodTextBeforeEnding(step));
            }
            let mut seen = FxHashSet::default();
            for choice in beat.choices().unwrap_or(&[]) {
                if !seen.insert(choice.value) {
                    return Err(StoryError::DuplicateChoice {
                        step,
                        branch: choice.value,
                    });
                }
            }
        }

        for (id, point) in self.atlas.iter() {
            if !point.in_bounds() {
                return Err(StoryError::WaypointOutOfBounds(id.as_str().to_string()));
            }
        }

        self.check_segment("intro", &self.intro)?;
        for (step, branch, segments) in self.consequences.entries() {
            if step >= self.script.len() {
                return Err(StoryError::ConsequenceOutOfRange {
                    step,
                    len: self.script.len(),
                });
            }
            let context = format!("consequence {step}/{}", branch.name());
            for segment in segments {
                self.check_segment(&context, segment)?;
            }
        }

        Ok(())
    }

    fn check_segment(&self, context: &str, segment: &SegmentSpec) -> Result<(), StoryError> {
        if segment.waypoints.is_empty() {
            return Err(StoryError::EmptySegment {
                context: context.to_string(),
                color: segment.color.clone(),
            });
        }
        for waypoint in &segment.waypoints {
            if !self.atlas.contains(waypoint) {
                return Err(StoryError::UnknownWaypoint {
                    context: context.to_string(),
                    color: segment.color.clone(),
                    waypoint: waypoint.as_str().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Non-fatal authoring issues. Assumes `validate` passed.
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (step, branch, _) in self.consequences.entries() {
            let offered = self.beat(step).is_some_and(|b| b.offers(branch));
            if !offered {
                warnings.push(format!(
                    "Consequence for step {} branch '{}' can never fire: the beat does not offer it",
                    step,
                    branch.name()
                ));
            }
        }

        for (step, beat) in self.script.iter().enumerate() {
            let Some(choices) = beat.choices() else {
                continue;
            };
            let moves_path = choices
                .iter()
                .any(|c| !self.consequences.lookup(step, c.value).is_empty());
            if !moves_path {
                warnings.push(format!(
                    "Beat {} offers {} choices but none of them extends the path",
                    step,
                    choices.len()
                ));
            }
        }

        let mut used = FxHashSet::default();
        used.extend(self.intro.waypoints.iter());
        for (_, _, segments) in self.consequences.entries() {
            for segment in segments {
                used.extend(segment.waypoints.iter());
            }
        }
        let mut unused: Vec<&str> = self
            .atlas
            .iter()
            .filter(|(id, _)| !used.contains(id))
            .map(|(id, _)| id.as_str())
            .collect();
        unused.sort_unstable();
        for id in unused {
            warnings.push(format!("Waypoint '{}' is never visited", id));
        }

        warnings
    }
}
