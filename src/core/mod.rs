//! The game core: templates, the typewriter, path tracking, stories, and the
//! state machine tying them together.

pub mod config;
pub mod game;
pub mod path;
pub mod snapshot;
pub mod story;
pub mod template;
pub mod typewriter;
