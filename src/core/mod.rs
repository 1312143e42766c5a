//! Runtime: session state, resolvers, and the narrative engine that owns them.

pub mod content;
pub mod dice;
pub mod engine;
pub mod investigation;
pub mod puzzle;
pub mod session;
pub mod signal;
pub mod timer;
