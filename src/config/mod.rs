//! Configuration module
//!
//! Describes the hosts and API tests to compare and the run settings.

mod env;
mod file;

pub use env::EnvConfig;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder name to value mapping for one request
pub type ParamSet = BTreeMap<String, String>;

/// Full comparison configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDiffConfig {
    /// Base URLs, the first one is the baseline
    pub hosts: Vec<String>,

    /// API tests in execution order
    #[serde(default)]
    pub tests: Vec<ApiTest>,

    /// Optional run settings
    #[serde(default)]
    pub settings: RunSettings,
}

impl ApiDiffConfig {
    /// Baseline host, compared against every other host
    pub fn baseline(&self) -> Option<&str> {
        self.hosts.first().map(String::as_str)
    }

    /// Total number of test iterations (test x parameter set)
    pub fn iteration_count(&self) -> usize {
        self.tests.iter().map(|t| t.params.len()).sum()
    }
}

/// One endpoint template with its parameter sets
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiTest {
    /// Endpoint template, e.g. `/users/{id}`
    pub api: String,

    /// Parameter sets, one request per set
    #[serde(default, deserialize_with = "deserialize_param_sets")]
    pub params: Vec<ParamSet>,
}

/// What to do when a host cannot be fetched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the whole run on the first failure
    #[default]
    Abort,
    /// Report the failure and continue with the next iteration
    Skip,
}

impl ErrorPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "abort" | "fail" => Some(ErrorPolicy::Abort),
            "skip" | "continue" => Some(ErrorPolicy::Skip),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Abort => write!(f, "abort"),
            ErrorPolicy::Skip => write!(f, "skip"),
        }
    }
}

/// When to emit ANSI colors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(ColorMode::Auto),
            "always" | "on" => Some(ColorMode::Always),
            "never" | "off" => Some(ColorMode::Never),
            _ => None,
        }
    }

    /// Resolve against whether output goes to a terminal
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Auto => is_terminal,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Settings block of the config file. Unset fields fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Per-request timeout in seconds, unbounded when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_error: Option<ErrorPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorMode>,
}

impl RunSettings {
    /// Layer `other` on top of `self`; set fields in `other` win
    pub fn overlay(self, other: RunSettings) -> Self {
        Self {
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            on_error: other.on_error.or(self.on_error),
            color: other.color.or(self.color),
        }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.on_error.unwrap_or_default()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.unwrap_or_default()
    }
}

/// Parameter values may be written as strings, numbers or booleans
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::UInt(u) => u.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Str(s) => s,
        }
    }
}

fn deserialize_param_sets<'de, D>(deserializer: D) -> Result<Vec<ParamSet>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<BTreeMap<String, Scalar>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|set| set.into_iter().map(|(k, v)| (k, v.into())).collect())
        .collect())
}
