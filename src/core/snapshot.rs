use serde::Serialize;

use crate::core::path::Pin;
use crate::core::typewriter::RevealId;
use crate::schema::map::SegmentSpec;
use crate::schema::mood::{Mood, Sprite};
use crate::schema::story::Choice;

/// Read-only view of a game for presentation layers. Rebuilt after every
/// accepted intent and every reveal tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Script index, clamped to the script.
    pub step: usize,
    pub title: String,
    /// The part of the body revealed so far.
    pub displayed: String,
    pub is_revealing: bool,
    /// `None` when only "continue" is available.
    pub choices: Option<Vec<Choice>>,
    /// Interim mood during play, ending mood on the final beat.
    pub mood: Mood,
    pub sprite: Sprite,
    pub score: i64,
    pub is_ending: bool,
    pub path: Vec<SegmentSpec>,
    pub pins: Vec<Pin>,
    /// Reveal task a host timer should tick.
    pub reveal_id: Option<RevealId>,
}

impl Snapshot {
    /// Whether the "continue" control should be enabled.
    pub fn can_continue(&self) -> bool {
        !self.is_revealing && self.choices.is_none()
    }

    /// Whether choice buttons should be enabled.
    pub fn can_choose(&self) -> bool {
        !self.is_revealing && self.choices.is_some()
    }
}
