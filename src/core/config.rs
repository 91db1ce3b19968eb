//! Runtime configuration for a game.

use std::time::Duration;

/// Name used when the player did not enter one.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Time between two revealed characters.
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(18);

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Substituted for `{name}` in beat text.
    pub player_name: String,
    /// Typewriter speed, one character per interval.
    pub reveal_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
        }
    }
}

impl GameConfig {
    /// Set the player name. Blank names fall back to the default.
    pub fn with_player_name(mut self, name: &str) -> Self {
        let name = name.trim();
        self.player_name = if name.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name.to_string()
        };
        self
    }

    pub fn with_reveal_interval(mut self, interval: Duration) -> Self {
        self.reveal_interval = interval;
        self
    }
}
