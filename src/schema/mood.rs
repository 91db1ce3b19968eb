use serde::{Deserialize, Serialize};

/// The emotional state shown on the guide character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Sad,
    #[default]
    Neutral,
}

impl Mood {
    /// Mood implied by a running score: positive is happy, negative is sad.
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s > 0 => Self::Happy,
            s if s < 0 => Self::Sad,
            _ => Self::Neutral,
        }
    }

    /// Lowercase name, as used by presentation layers for asset lookup.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Neutral => "neutral",
        }
    }
}

/// Which character sprite a presentation layer should draw.
///
/// While dialogue is still being typed the character is speaking; once the
/// reveal finishes the sprite falls back to the mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    Speaking,
    Happy,
    Sad,
    Neutral,
}

impl Sprite {
    pub fn select(mood: Mood, speaking: bool) -> Self {
        if speaking {
            return Self::Speaking;
        }
        match mood {
            Mood::Happy => Self::Happy,
            Mood::Sad => Self::Sad,
            Mood::Neutral => Self::Neutral,
        }
    }
}
