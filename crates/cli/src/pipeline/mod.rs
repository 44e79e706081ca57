//! Session analysis pipeline.

mod analysis;
mod stats;

pub use analysis::analyze;
pub use stats::RunStats;
