//! api-diff - API Regression Comparison Tool
//!
//! Calls the same API endpoints on several hosts and shows how each host's
//! response differs from the first (baseline) host.
//!
//! ## Features
//!
//! - Endpoint templates with `{name}` placeholders and parameter sets
//! - JSON responses normalized before comparison (key order preserved)
//! - Line diffs highlighted in green (added) and red (removed)
//! - Abort-on-failure or skip-and-continue error policy
//!
//! ## Usage
//!
//! ```bash
//! # Compare every test in the config
//! api-diff --config api-diff.yaml
//!
//! # Keep going when a host fails, bound each request to 10 seconds
//! api-diff --config api-diff.yaml --on-error skip --timeout 10
//!
//! # Plain output for logs and pipes
//! api-diff --config api-diff.yaml --no-color
//! ```
//!
//! ## Exit codes
//!
//! - `0` all comparisons completed
//! - `1` usage or configuration error
//! - `2` request or transport error

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing::{error, info};

mod cli;
mod compare;
mod config;
mod diff;
mod http;
mod normalize;
mod output;
mod template;
mod utils;

use cli::Args;
use compare::{Comparator, RunError};
use config::{ApiDiffConfig, EnvConfig, RunSettings};
use http::{Fetcher, HttpFetcher};
use output::Palette;
use utils::logger::{init_logger, LogLevel};

/// All comparisons completed
const EXIT_OK: u8 = 0;

/// Usage or configuration error
const EXIT_CONFIG: u8 = 1;

/// Request or transport error
const EXIT_REQUEST: u8 = 2;

/// Where in the run an error was raised
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    /// Argument conversion and config loading, before any request
    Setup,
    /// Fetching, diffing and writing the report
    Compare,
}

/// Exit status for the result of a stage
fn exit_status<T>(stage: Stage, result: &Result<T>) -> u8 {
    match (stage, result) {
        (_, Ok(_)) => EXIT_OK,
        (Stage::Setup, Err(_)) => EXIT_CONFIG,
        (Stage::Compare, Err(_)) => EXIT_REQUEST,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let Some(level) = LogLevel::resolve(args.log_level.as_deref(), args.verbose) else {
        eprintln!(
            "error: unknown log level: {}",
            args.log_level.as_deref().unwrap_or_default()
        );
        return ExitCode::from(EXIT_CONFIG);
    };
    init_logger(level);

    let loaded = load_config(&args);
    let setup_status = exit_status(Stage::Setup, &loaded);
    let (config, settings) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            report(&e);
            return ExitCode::from(setup_status);
        }
    };

    let result = run_comparison(config, settings).await;
    if let Err(e) = &result {
        report(e);
    }
    ExitCode::from(exit_status(Stage::Compare, &result))
}

/// Print a fatal error
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<RunError>() {
        // RunError already includes its source in the message
        Some(run_error) => {
            if let RunError::Fetch { endpoint, .. } = run_error {
                error!("Comparison aborted at api test {}", endpoint);
            }
            eprintln!("error: {run_error}");
        }
        None => eprintln!("error: {err:#}"),
    }
}

/// Read the config file and layer file, environment and CLI settings
fn load_config(args: &Args) -> Result<(ApiDiffConfig, RunSettings)> {
    let cli_settings = args.settings()?;

    println!("Reading config: {}", args.config);
    let config = ApiDiffConfig::load(&args.config)?;

    let settings = config
        .settings
        .clone()
        .overlay(EnvConfig::load().settings())
        .overlay(cli_settings);

    Ok((config, settings))
}

async fn run_comparison(config: ApiDiffConfig, settings: RunSettings) -> Result<()> {
    let stdout = io::stdout();
    let palette = Palette::for_color(settings.color_mode().enabled(stdout.is_terminal()));
    let fetcher = HttpFetcher::with_timeout(settings.timeout_secs)?;

    let mut out = stdout.lock();
    compare_hosts(config, &settings, fetcher, palette, &mut out).await
}

/// Run every comparison and finish the report with the run summary
async fn compare_hosts<F: Fetcher, W: Write>(
    config: ApiDiffConfig,
    settings: &RunSettings,
    fetcher: F,
    palette: Palette,
    out: &mut W,
) -> Result<()> {
    let comparator = Comparator::new(config, fetcher)
        .with_policy(settings.policy())
        .with_palette(palette);

    let summary = comparator.run(out).await?;

    writeln!(out, "{summary}")?;
    if summary.is_clean() {
        info!("All hosts returned equivalent responses");
    } else {
        info!("{}", summary);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiTest, ErrorPolicy};
    use crate::http::{FetchError, HostResponse};

    /// Answers 200 from every host except `failing`
    struct OneHostDown {
        failing: &'static str,
    }

    impl Fetcher for OneHostDown {
        async fn fetch(&self, host: &str, endpoint: &str) -> Result<HostResponse, FetchError> {
            let url = format!("{host}{endpoint}");
            if host == self.failing {
                return Err(FetchError::Status {
                    url,
                    status: 500,
                    body: "internal error".to_string(),
                });
            }
            Ok(HostResponse {
                host: host.to_string(),
                url,
                status_code: 200,
                body: r#"{"id":7}"#.to_string(),
                duration_ms: 1,
            })
        }
    }

    fn two_hosts() -> ApiDiffConfig {
        ApiDiffConfig {
            hosts: vec!["http://a".to_string(), "http://b".to_string()],
            tests: vec![ApiTest {
                api: "/users/{id}".to_string(),
                params: vec![[("id".to_string(), "7".to_string())].into_iter().collect()],
            }],
            ..Default::default()
        }
    }

    fn compare_with(policy: ErrorPolicy, failing: &'static str) -> (Result<()>, String) {
        let settings = RunSettings {
            on_error: Some(policy),
            ..Default::default()
        };
        let mut out = Vec::new();
        let result = tokio_test::block_on(compare_hosts(
            two_hosts(),
            &settings,
            OneHostDown { failing },
            Palette::plain(),
            &mut out,
        ));
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_exit_status_by_stage() {
        assert_eq!(exit_status(Stage::Setup, &Ok(())), 0);
        assert_eq!(exit_status(Stage::Compare, &Ok(())), 0);
        assert_eq!(exit_status::<()>(Stage::Setup, &Err(anyhow::anyhow!("bad"))), 1);
        assert_eq!(exit_status::<()>(Stage::Compare, &Err(anyhow::anyhow!("bad"))), 2);
    }

    #[test]
    fn test_bad_error_policy_is_setup_error() {
        let args = Args::parse_from(["api-diff", "--config", "missing.yaml", "--on-error", "retry"]);
        let result = load_config(&args);
        assert_eq!(exit_status(Stage::Setup, &result), EXIT_CONFIG);
        assert!(result.unwrap_err().to_string().contains("Unknown error policy"));
    }

    #[test]
    fn test_invalid_config_is_setup_error() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"hosts:\n  - http://a\ntests:\n  - api: /x\n").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let args = Args::parse_from(["api-diff", "--config", path.as_str()]);
        let result = load_config(&args);
        assert_eq!(exit_status(Stage::Setup, &result), EXIT_CONFIG);
        assert!(format!("{:#}", result.unwrap_err()).contains("At least 2 hosts"));
    }

    #[test]
    fn test_fetch_abort_is_request_error() {
        let (result, output) = compare_with(ErrorPolicy::Abort, "http://b");
        assert_eq!(exit_status(Stage::Compare, &result), EXIT_REQUEST);

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RunError>(),
            Some(RunError::Fetch { host, .. }) if host == "http://b"
        ));
        assert!(output.contains("http://b/users/7 [HTTP-500]"));
    }

    #[test]
    fn test_skip_policy_completes() {
        let (result, output) = compare_with(ErrorPolicy::Skip, "http://b");
        assert_eq!(exit_status(Stage::Compare, &result), EXIT_OK);
        assert!(output.contains("1 skipped"));
    }

    #[test]
    fn test_clean_run_completes() {
        let (result, output) = compare_with(ErrorPolicy::Abort, "http://none");
        assert_eq!(exit_status(Stage::Compare, &result), EXIT_OK);
        assert!(output.contains("(identical)"));
        assert!(output.ends_with("1 iterations, 1 comparisons: 1 identical, 0 different, 0 skipped\n"));
    }
}
