//! Content Graph schema: statically authored, immutable data.

pub mod ids;
pub mod investigation;
pub mod item;
pub mod puzzle;
pub mod story;
