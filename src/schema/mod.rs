//! Authored data types: beats, branches, moods, and the map.

pub mod map;
pub mod mood;
pub mod story;
