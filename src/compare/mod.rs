//! Multi-host comparison
//!
//! Runs every configured test against all hosts and reports the differences
//! against the baseline host.

mod report;
mod runner;

pub use report::RunError;
pub use runner::Comparator;
