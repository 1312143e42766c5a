//! Silent Thread: narrative state machine for branching interactive fiction.
//!
//! Drives a story graph with embedded mini-games: d20 skill checks,
//! point-and-click investigation scenes, and three kinds of logic puzzle.
//! Presentation (rendering, audio, video) stays outside the crate; the
//! engine only emits declarative signals for it to consume.

pub mod core;
pub mod schema;
