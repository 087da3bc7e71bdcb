//! Comparison runner
//!
//! Walks every test and parameter set, fetches the endpoint from each host in
//! order and diffs every host against the baseline.

use std::io::Write;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::report::{IterationOutcome, PairReport, RunError, RunSummary};
use crate::config::{ApiDiffConfig, ApiTest, ErrorPolicy, ParamSet};
use crate::diff::compute_diff;
use crate::http::{Fetcher, HostResponse};
use crate::normalize::normalize;
use crate::output::{render, Palette};
use crate::template;

/// Prefix of the per-iteration banner
const BANNER: &str = "######## Execute api test:";

/// Sequential multi-host comparison runner
pub struct Comparator<F> {
    config: ApiDiffConfig,
    fetcher: F,
    policy: ErrorPolicy,
    palette: Palette,
}

impl<F: Fetcher> Comparator<F> {
    /// Create a runner with the abort policy and the ANSI palette
    pub fn new(config: ApiDiffConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            policy: ErrorPolicy::default(),
            palette: Palette::ansi(),
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Run every test iteration, writing progress and diffs to `out`
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<RunSummary, RunError> {
        info!(
            "Comparing {} hosts over {} iterations (baseline: {}, on error: {})",
            self.config.hosts.len(),
            self.config.iteration_count(),
            self.config.baseline().unwrap_or("-"),
            self.policy
        );

        let start = Instant::now();
        let mut summary = RunSummary::default();

        for test in &self.config.tests {
            for params in &test.params {
                let outcome = self.run_iteration(test, params, out).await?;
                match &outcome {
                    IterationOutcome::Skipped { host, reason, .. } => {
                        debug!("{}: skipped, {} failed: {}", outcome.endpoint(), host, reason)
                    }
                    IterationOutcome::Compared { .. } => debug!(
                        "{}: {} comparisons",
                        outcome.endpoint(),
                        outcome.reports().len()
                    ),
                }
                summary.record(&outcome);
            }
        }

        info!(
            "Run completed in {}ms - {}",
            start.elapsed().as_millis(),
            summary
        );

        Ok(summary)
    }

    /// Run one test with one parameter set
    pub async fn run_iteration<W: Write>(
        &self,
        test: &ApiTest,
        params: &ParamSet,
        out: &mut W,
    ) -> Result<IterationOutcome, RunError> {
        let endpoint = template::resolve(&test.api, params);
        writeln!(out, "{BANNER} {endpoint}")?;

        let mut responses = Vec::with_capacity(self.config.hosts.len());

        for host in &self.config.hosts {
            match self.fetcher.fetch(host, &endpoint).await {
                Ok(response) => {
                    writeln!(out, "{} [HTTP-{}]", response.url, response.status_code)?;
                    debug!("{} answered in {}ms", host, response.duration_ms);
                    responses.push(response);
                }
                Err(err) => {
                    if let Some(status) = err.status() {
                        writeln!(out, "{} [HTTP-{}]", err.url(), status)?;
                    } else if err.is_transport() {
                        warn!("{} is unreachable", host);
                    }

                    let failure = RunError::Fetch {
                        host: host.clone(),
                        endpoint: endpoint.clone(),
                        source: err,
                    };

                    match self.policy {
                        ErrorPolicy::Abort => return Err(failure),
                        ErrorPolicy::Skip => {
                            writeln!(out, "{failure}")?;
                            return Ok(IterationOutcome::Skipped {
                                endpoint,
                                host: host.clone(),
                                reason: failure
                                    .fetch_error()
                                    .map(|e| e.to_string())
                                    .unwrap_or_default(),
                            });
                        }
                    }
                }
            }
        }

        let reports = self.compare_responses(&responses, out)?;
        Ok(IterationOutcome::Compared { endpoint, reports })
    }

    /// Diff every response after the first against the first
    fn compare_responses<W: Write>(
        &self,
        responses: &[HostResponse],
        out: &mut W,
    ) -> Result<Vec<PairReport>, RunError> {
        let Some((baseline, others)) = responses.split_first() else {
            return Ok(Vec::new());
        };

        let (left, left_raw) = comparable_text(baseline);
        let mut reports = Vec::with_capacity(others.len());

        for other in others {
            let (right, right_raw) = comparable_text(other);
            let lines = compute_diff(&left, &right);
            let report = PairReport::new(&baseline.host, &other.host, lines, left_raw || right_raw);

            writeln!(out, "--- {}", report.baseline)?;
            writeln!(out, "+++ {}", report.host)?;
            if !report.lines.is_empty() {
                writeln!(out, "{}", render(&report.lines, &self.palette))?;
            }
            writeln!(out, "({})", report.stats)?;
            writeln!(out)?;

            reports.push(report);
        }

        Ok(reports)
    }
}

/// Normalized body, or the raw body when it is not JSON.
///
/// The flag is true when the raw body is used.
fn comparable_text(response: &HostResponse) -> (String, bool) {
    match normalize(&response.body) {
        Ok(pretty) => (pretty, false),
        Err(e) => {
            warn!(
                "Response from {} for {} cannot be normalized, comparing raw text: {}",
                response.host, response.url, e
            );
            (response.body.clone(), true)
        }
    }
}
