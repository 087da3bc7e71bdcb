//! Comparison results
//!
//! Per-iteration outcomes, run totals and the run-level error type.

use std::fmt;
use thiserror::Error;

use crate::diff::{DiffLine, DiffStats};
use crate::http::FetchError;

/// Errors that end a comparison run
#[derive(Error, Debug)]
pub enum RunError {
    #[error("fetch failed for host {host}: {source}")]
    Fetch {
        host: String,
        endpoint: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl RunError {
    /// Failed fetch, if this error came from one
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            RunError::Fetch { source, .. } => Some(source),
            RunError::Output(_) => None,
        }
    }
}

/// Diff of one host against the baseline
#[derive(Clone, Debug)]
pub struct PairReport {
    pub baseline: String,
    pub host: String,
    pub lines: Vec<DiffLine>,
    pub stats: DiffStats,
    /// At least one body was not JSON and was compared as raw text
    pub raw_text: bool,
}

impl PairReport {
    pub fn new(
        baseline: impl Into<String>,
        host: impl Into<String>,
        lines: Vec<DiffLine>,
        raw_text: bool,
    ) -> Self {
        let stats = DiffStats::from_lines(&lines);
        Self {
            baseline: baseline.into(),
            host: host.into(),
            lines,
            stats,
            raw_text,
        }
    }

    pub fn is_identical(&self) -> bool {
        self.stats.is_identical()
    }
}

/// Result of one test x parameter set
#[derive(Clone, Debug)]
pub enum IterationOutcome {
    /// Every non-baseline host was diffed against the baseline
    Compared {
        endpoint: String,
        reports: Vec<PairReport>,
    },
    /// A host could not be fetched and the iteration was skipped
    Skipped {
        endpoint: String,
        host: String,
        reason: String,
    },
}

impl IterationOutcome {
    pub fn endpoint(&self) -> &str {
        match self {
            IterationOutcome::Compared { endpoint, .. }
            | IterationOutcome::Skipped { endpoint, .. } => endpoint,
        }
    }

    pub fn reports(&self) -> &[PairReport] {
        match self {
            IterationOutcome::Compared { reports, .. } => reports,
            IterationOutcome::Skipped { .. } => &[],
        }
    }
}

/// Totals over a whole run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: usize,
    pub comparisons: usize,
    pub identical: usize,
    pub different: usize,
    pub skipped: usize,
    pub raw_text: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &IterationOutcome) {
        self.iterations += 1;
        match outcome {
            IterationOutcome::Compared { reports, .. } => {
                for report in reports {
                    self.comparisons += 1;
                    if report.is_identical() {
                        self.identical += 1;
                    } else {
                        self.different += 1;
                    }
                    if report.raw_text {
                        self.raw_text += 1;
                    }
                }
            }
            IterationOutcome::Skipped { .. } => self.skipped += 1,
        }
    }

    /// No differences and nothing skipped
    pub fn is_clean(&self) -> bool {
        self.different == 0 && self.skipped == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations, {} comparisons: {} identical, {} different, {} skipped",
            self.iterations, self.comparisons, self.identical, self.different, self.skipped
        )?;
        if self.raw_text > 0 {
            write!(f, " ({} compared as raw text)", self.raw_text)?;
        }
        Ok(())
    }
}
