/// The narrative state machine: choices → score, mood, path → ending.
///
/// Owns the story, the mutable play state, and the typewriter. Intents are
/// refused while the current body is still being revealed.

use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::config::GameConfig;
use crate::core::path::PathHistory;
use crate::core::snapshot::Snapshot;
use crate::core::story::{Story, StoryError};
use crate::core::template::TemplateContext;
use crate::core::typewriter::{RevealEvent, RevealId, Typewriter};
use crate::schema::mood::{Mood, Sprite};
use crate::schema::story::{BranchTag, StoryBeat};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("story error: {0}")]
    Story(#[from] StoryError),
    #[error("no story provided")]
    MissingStory,
    #[error("branch {branch:?} is not offered at step {step} (offered: {offered:?})")]
    InvalidChoice {
        step: usize,
        branch: BranchTag,
        offered: Vec<BranchTag>,
    },
    #[error("step {step} is waiting for a choice")]
    ChoiceRequired { step: usize },
}

/// What happened to an intent that was not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    Accepted,
    /// Dropped because the current body is still being revealed.
    IgnoredWhileRevealing,
}

/// Mutable play state. Only `NarrativeGame` writes to it.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeState {
    /// May run past the script; read through `NarrativeGame::step`.
    step: usize,
    mood: Mood,
    score: i64,
    path: PathHistory,
}

impl NarrativeState {
    fn initial(story: &Story) -> Self {
        Self {
            step: 0,
            mood: Mood::Neutral,
            score: 0,
            path: PathHistory::new(story.intro.clone()),
        }
    }
}

#[derive(Debug)]
pub struct NarrativeGame {
    story: Story,
    config: GameConfig,
    state: NarrativeState,
    reveal: Typewriter,
}

/// Builder for constructing a `NarrativeGame`.
pub struct NarrativeGameBuilder {
    story: Option<Story>,
    story_path: Option<String>,
    config: GameConfig,
}

impl NarrativeGame {
    pub fn builder() -> NarrativeGameBuilder {
        NarrativeGameBuilder {
            story: None,
            story_path: None,
            config: GameConfig::default(),
        }
    }

    fn new(story: Story, config: GameConfig) -> Self {
        let state = NarrativeState::initial(&story);
        let reveal = Typewriter::new(config.reveal_interval);
        let mut game = Self {
            story,
            config,
            state,
            reveal,
        };
        game.start_reveal();
        game
    }

    /// Pick a branch on the current beat.
    ///
    /// Ignored while revealing. Errors if the beat does not offer `value`;
    /// the state is untouched in that case.
    pub fn choose(&mut self, value: BranchTag) -> Result<IntentOutcome, GameError> {
        if self.reveal.is_revealing() {
            debug!(branch = value.name(), "choice ignored while revealing");
            return Ok(IntentOutcome::IgnoredWhileRevealing);
        }

        let step = self.step();
        if !self.current_beat().offers(value) {
            let offered: Vec<BranchTag> = self
                .current_beat()
                .choices()
                .map(|list| list.iter().map(|c| c.value).collect())
                .unwrap_or_default();
            warn!(step, branch = value.name(), "choice not offered");
            return Err(GameError::InvalidChoice {
                step,
                branch: value,
                offered,
            });
        }

        self.state.score += value.score_delta();
        self.state.mood = value.mood();
        let segments = self.story.consequences.lookup(step, value);
        if !segments.is_empty() {
            self.state.path.append(segments);
        }
        self.state.step = step + 1;
        debug!(
            step,
            branch = value.name(),
            score = self.state.score,
            path_len = self.state.path.len(),
            "choice accepted"
        );

        self.start_reveal();
        Ok(IntentOutcome::Accepted)
    }

    /// Continue past a beat without choices. On the ending this restarts.
    pub fn next(&mut self) -> Result<IntentOutcome, GameError> {
        if self.reveal.is_revealing() {
            debug!("next ignored while revealing");
            return Ok(IntentOutcome::IgnoredWhileRevealing);
        }

        if self.is_ending() {
            self.restart();
            return Ok(IntentOutcome::Accepted);
        }

        let step = self.step();
        if self.current_beat().choices().is_some() {
            return Err(GameError::ChoiceRequired { step });
        }

        self.state.step = step + 1;
        debug!(step = self.state.step, "advanced");
        self.start_reveal();
        Ok(IntentOutcome::Accepted)
    }

    /// Reset to the first beat with a fresh score and path. Always accepted.
    pub fn restart(&mut self) {
        self.state = NarrativeState::initial(&self.story);
        debug!("game restarted");
        self.start_reveal();
    }

    /// Deliver a timer tick for reveal `id`. Stale ids are ignored.
    pub fn tick(&mut self, id: RevealId) -> Option<RevealEvent> {
        self.reveal.tick(id)
    }

    /// Feed elapsed time to the typewriter.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<RevealEvent> {
        self.reveal.advance(elapsed)
    }

    fn start_reveal(&mut self) {
        let body = self.body();
        self.reveal.restart(&body);
    }

    /// Current script index, clamped to the last beat.
    pub fn step(&self) -> usize {
        self.state.step.min(self.story.terminal_index())
    }

    pub fn score(&self) -> i64 {
        self.state.score
    }

    /// Mood from the most recent choice.
    pub fn interim_mood(&self) -> Mood {
        self.state.mood
    }

    /// Mood of the ending, available once the final beat is reached.
    pub fn ending_mood(&self) -> Option<Mood> {
        self.is_ending().then(|| Mood::from_score(self.state.score))
    }

    /// Mood the character sprite shows.
    pub fn sprite_mood(&self) -> Mood {
        self.ending_mood().unwrap_or(self.state.mood)
    }

    pub fn is_ending(&self) -> bool {
        self.state.step >= self.story.terminal_index()
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_revealing()
    }

    pub fn reveal_id(&self) -> Option<RevealId> {
        self.reveal.active_id()
    }

    pub fn displayed(&self) -> &str {
        self.reveal.prefix()
    }

    pub fn path(&self) -> &PathHistory {
        &self.state.path
    }

    pub fn state(&self) -> &NarrativeState {
        &self.state
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current_beat(&self) -> &StoryBeat {
        &self.story.script[self.step()]
    }

    fn template_context(&self) -> TemplateContext<'_> {
        TemplateContext {
            name: &self.config.player_name,
            score: self.state.score,
        }
    }

    pub fn title(&self) -> String {
        self.current_beat()
            .title
            .select(self.sprite_mood())
            .render(&self.template_context())
    }

    /// Full body of the current beat, before any reveal.
    pub fn body(&self) -> String {
        self.current_beat()
            .body
            .select(self.sprite_mood())
            .render(&self.template_context())
    }

    pub fn snapshot(&self) -> Snapshot {
        let mood = self.sprite_mood();
        let is_revealing = self.is_revealing();
        Snapshot {
            step: self.step(),
            title: self.title(),
            displayed: self.displayed().to_string(),
            is_revealing,
            choices: self.current_beat().choices().map(<[_]>::to_vec),
            mood,
            sprite: Sprite::select(mood, is_revealing),
            score: self.state.score,
            is_ending: self.is_ending(),
            path: self.state.path.segments().to_vec(),
            pins: self.state.path.pins(&self.story.atlas),
            reveal_id: self.reveal_id(),
        }
    }
}

impl NarrativeGameBuilder {
    pub fn with_story(mut self, story: Story) -> Self {
        self.story = Some(story);
        self
    }

    /// Load the story from a RON file at build time.
    pub fn story_file(mut self, path: &str) -> Self {
        self.story_path = Some(path.to_string());
        self
    }

    pub fn player_name(mut self, name: &str) -> Self {
        self.config = self.config.with_player_name(name);
        self
    }

    pub fn reveal_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.with_reveal_interval(interval);
        self
    }

    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<NarrativeGame, GameError> {
        let story = match (self.story, self.story_path) {
            (Some(story), _) => {
                story.validate()?;
                story
            }
            (None, Some(path)) => Story::load_from_ron(Path::new(&path))?,
            (None, None) => return Err(GameError::MissingStory),
        };
        Ok(NarrativeGame::new(story, self.config))
    }
}
