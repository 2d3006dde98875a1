//! Live path trimming
//!
//! - [`trim_path`] / [`nearest_index`] - pure geometry on the full route
//! - [`PathTrimmer`] - the periodic task that feeds trimmed paths to the planner

mod path;
mod task;

pub use path::{nearest_index, trim_path};
pub use task::{PathTrimmer, TickOutcome};
