//! WASM bindings for narrative-trail — the browser page drives a game through
//! `GameSession` and re-renders from the JSON snapshot after every call.
//!
//! Typewriter timing belongs to the page: arm `setInterval(interval_ms)` that
//! calls `tick(revealId)` with the `reveal_id` of the latest snapshot, and clear
//! it whenever the id changes. Ticks for an old id are refused by the core.

use wasm_bindgen::prelude::*;

use narrative_trail::core::game::{IntentOutcome, NarrativeGame};
use narrative_trail::core::story::Story;
use narrative_trail::core::typewriter::RevealId;
use narrative_trail::schema::story::BranchTag;

// ---------------------------------------------------------------------------
// Embedded story data — compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const LAKE_GUARDIAN_STORY: &str =
        include_str!("../../story_data/lake_guardian/story.ron");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct IntentResult<'a> {
    accepted: bool,
    snapshot: &'a narrative_trail::core::snapshot::Snapshot,
}

fn parse_branch(s: &str) -> Result<BranchTag, JsError> {
    BranchTag::from_name(s).ok_or_else(|| JsError::new(&format!("Unknown branch: {s}")))
}

// ---------------------------------------------------------------------------
// GameSession — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct GameSession {
    game: NarrativeGame,
}

#[wasm_bindgen]
impl GameSession {
    /// Start the built-in lake guardian story for `player_name`.
    #[wasm_bindgen(constructor)]
    pub fn new(player_name: &str) -> Result<GameSession, JsError> {
        GameSession::from_story_ron(data::LAKE_GUARDIAN_STORY, player_name)
    }

    /// Start a game from a RON story string.
    pub fn from_story_ron(story_ron: &str, player_name: &str) -> Result<GameSession, JsError> {
        let story = Story::parse_ron(story_ron)
            .map_err(|e| JsError::new(&format!("Story error: {e}")))?;
        let game = NarrativeGame::builder()
            .with_story(story)
            .player_name(player_name)
            .build()
            .map_err(|e| JsError::new(&format!("Game build error: {e}")))?;
        Ok(GameSession { game })
    }

    /// Pick a branch by name (`positive`/`pos`, `neutral`, `negative`/`neg`).
    /// Returns `{accepted, snapshot}` as JSON.
    pub fn choose(&mut self, branch: &str) -> Result<String, JsError> {
        let branch = parse_branch(branch)?;
        let outcome = self
            .game
            .choose(branch)
            .map_err(|e| JsError::new(&format!("Choice error: {e}")))?;
        self.intent_result(outcome)
    }

    /// Continue past a beat without choices. Returns `{accepted, snapshot}`.
    pub fn next(&mut self) -> Result<String, JsError> {
        let outcome = self
            .game
            .next()
            .map_err(|e| JsError::new(&format!("Advance error: {e}")))?;
        self.intent_result(outcome)
    }

    /// Start over from the first beat. Returns the new snapshot.
    pub fn restart(&mut self) -> Result<String, JsError> {
        self.game.restart();
        self.snapshot()
    }

    /// Advance reveal `reveal_id` by one character. Returns the snapshot, or
    /// `null` when the id is stale or already finished.
    pub fn tick(&mut self, reveal_id: u32) -> Result<Option<String>, JsError> {
        match self.game.tick(RevealId(u64::from(reveal_id))) {
            Some(_) => self.snapshot().map(Some),
            None => Ok(None),
        }
    }

    /// Current snapshot as JSON.
    pub fn snapshot(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.game.snapshot())
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Id of the active reveal, for binding a page timer.
    pub fn reveal_id(&self) -> Option<u32> {
        self.game
            .reveal_id()
            .and_then(|id| u32::try_from(id.0).ok())
    }

    pub fn is_revealing(&self) -> bool {
        self.game.is_revealing()
    }

    /// Milliseconds between revealed characters.
    pub fn interval_ms(&self) -> u32 {
        u32::try_from(self.game.config().reveal_interval.as_millis()).unwrap_or(u32::MAX)
    }

    /// Return JSON array of branch names accepted by `choose`.
    pub fn branches() -> String {
        serde_json::to_string(&["positive", "neutral", "negative"])
            .unwrap_or_else(|_| "[]".to_string())
    }
}

// Private helpers
impl GameSession {
    fn intent_result(&self, outcome: IntentOutcome) -> Result<String, JsError> {
        let snapshot = self.game.snapshot();
        let result = IntentResult {
            accepted: outcome == IntentOutcome::Accepted,
            snapshot: &snapshot,
        };
        serde_json::to_string(&result)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }
}
