//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;

use crate::config::{ColorMode, ErrorPolicy, RunSettings};

/// Compare API responses across hosts
#[derive(Parser, Debug)]
#[command(name = "api-diff")]
#[command(version)]
#[command(about = "Call the same APIs on several hosts and diff the responses")]
#[command(long_about = None)]
pub struct Args {
    /// Config file path (YAML or JSON)
    #[arg(short, long)]
    pub config: String,

    /// Request timeout in seconds (unbounded when not set)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// What to do when a host fails (abort, skip)
    #[arg(long)]
    pub on_error: Option<String>,

    /// Color output (auto, always, never)
    #[arg(long)]
    pub color: Option<String>,

    /// Disable colored output
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Command-line overrides as a settings layer
    pub fn settings(&self) -> anyhow::Result<RunSettings> {
        let on_error = self
            .on_error
            .as_deref()
            .map(|s| {
                ErrorPolicy::from_str(s)
                    .ok_or_else(|| anyhow::anyhow!("Unknown error policy: {s} (expected abort or skip)"))
            })
            .transpose()?;

        let color = if self.no_color {
            Some(ColorMode::Never)
        } else {
            self.color
                .as_deref()
                .map(|s| {
                    ColorMode::from_str(s).ok_or_else(|| {
                        anyhow::anyhow!("Unknown color mode: {s} (expected auto, always or never)")
                    })
                })
                .transpose()?
        };

        Ok(RunSettings {
            timeout_secs: self.timeout,
            on_error,
            color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["api-diff", "--config", "api.yaml"]);
        assert_eq!(args.config, "api.yaml");
        assert!(args.timeout.is_none());
        assert!(!args.verbose);
        assert_eq!(args.settings().unwrap(), RunSettings::default());
    }

    #[test]
    fn test_config_required() {
        assert!(Args::try_parse_from(["api-diff"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "api-diff",
            "-c",
            "api.json",
            "--timeout",
            "5",
            "--on-error",
            "skip",
            "--no-color",
        ]);
        let settings = args.settings().unwrap();
        assert_eq!(settings.timeout_secs, Some(5));
        assert_eq!(settings.on_error, Some(ErrorPolicy::Skip));
        assert_eq!(settings.color, Some(ColorMode::Never));
    }

    #[test]
    fn test_invalid_policy() {
        let args = Args::parse_from(["api-diff", "-c", "a.yaml", "--on-error", "retry"]);
        assert!(args.settings().is_err());
    }

    #[test]
    fn test_no_color_conflicts_with_color() {
        let result = Args::try_parse_from([
            "api-diff", "-c", "a.yaml", "--color", "always", "--no-color",
        ]);
        assert!(result.is_err());
    }
}
