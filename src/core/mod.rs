// Public modules
pub mod error;
pub mod files;
pub mod patch;
pub mod updater;

// Re-export common types for convenience
pub use error::{Error, Result};
pub use updater::{FileReport, Outcome, RunResult, RunSummary};
