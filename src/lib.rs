//! Narrative Trail — a branching-narrative state machine for small story games.
//!
//! A player answers a sequence of choices. Each choice moves a score and mood,
//! extends a path drawn on a map overlay, and the next line of dialogue is
//! revealed one character at a time. Rendering is left to the host; this crate
//! owns the state and hands out read-only snapshots.

pub mod core;
pub mod schema;
