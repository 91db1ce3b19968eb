use serde::{Deserialize, Serialize};

use super::mood::Mood;
use crate::core::template::Template;

/// The three-way outcome classification of a player choice.
///
/// Drives the score delta, the interim mood, and the map consequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BranchTag {
    Positive,
    Neutral,
    Negative,
}

impl BranchTag {
    pub const ALL: [BranchTag; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// Score change applied when this branch is chosen.
    pub fn score_delta(&self) -> i64 {
        match self {
            Self::Positive => 1,
            Self::Neutral => 0,
            Self::Negative => -1,
        }
    }

    /// Interim mood shown right after this branch is chosen.
    pub fn mood(&self) -> Mood {
        match self {
            Self::Positive => Mood::Happy,
            Self::Neutral => Mood::Neutral,
            Self::Negative => Mood::Sad,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// Parse a branch name. Accepts the long names and the short
    /// `pos` / `neg` forms used by web front ends.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "pos" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" | "neg" => Some(Self::Negative),
            _ => None,
        }
    }
}

/// A single button offered to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub value: BranchTag,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: BranchTag) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Beat text: either one template, or one per ending mood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BeatText {
    Fixed(Template),
    ByMood {
        happy: Template,
        sad: Template,
        neutral: Template,
    },
}

impl BeatText {
    /// Pick the template for `mood`. Fixed text ignores the mood.
    pub fn select(&self, mood: Mood) -> &Template {
        match self {
            Self::Fixed(t) => t,
            Self::ByMood {
                happy,
                sad,
                neutral,
            } => match mood {
                Mood::Happy => happy,
                Mood::Sad => sad,
                Mood::Neutral => neutral,
            },
        }
    }

    /// All templates this text may render.
    pub fn variants(&self) -> Vec<&Template> {
        match self {
            Self::Fixed(t) => vec![t],
            Self::ByMood {
                happy,
                sad,
                neutral,
            } => vec![happy, sad, neutral],
        }
    }

    pub fn is_mood_dependent(&self) -> bool {
        matches!(self, Self::ByMood { .. })
    }
}

/// One node of the authored script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryBeat {
    pub title: BeatText,
    pub body: BeatText,
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

impl StoryBeat {
    /// The offered choices, or `None` when only "continue" is available.
    /// An empty list counts as no choices.
    pub fn choices(&self) -> Option<&[Choice]> {
        match &self.choices {
            Some(list) if !list.is_empty() => Some(list.as_slice()),
            _ => None,
        }
    }

    pub fn offers(&self, value: BranchTag) -> bool {
        self.choices()
            .is_some_and(|list| list.iter().any(|c| c.value == value))
    }
}
