//! Environment variable configuration
//!
//! Provides environment variable overrides for run settings.

use std::env;

use super::{ColorMode, ErrorPolicy, RunSettings};

/// Environment variable prefix
const ENV_PREFIX: &str = "API_DIFF";

/// Settings read from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Timeout from API_DIFF_TIMEOUT
    pub timeout: Option<u64>,
    /// Error policy from API_DIFF_ON_ERROR
    pub on_error: Option<ErrorPolicy>,
    /// Color mode from API_DIFF_COLOR
    pub color: Option<ColorMode>,
    /// Set when NO_COLOR is present and non-empty
    pub no_color: bool,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            timeout: get_env_parse("TIMEOUT"),
            on_error: get_env("ON_ERROR").and_then(|v| ErrorPolicy::from_str(&v)),
            color: get_env("COLOR").and_then(|v| ColorMode::from_str(&v)),
            no_color: env::var("NO_COLOR").map(|v| !v.is_empty()).unwrap_or(false),
        }
    }

    /// Environment overrides as a settings layer
    pub fn settings(&self) -> RunSettings {
        let color = match (self.color, self.no_color) {
            (Some(mode), _) => Some(mode),
            (None, true) => Some(ColorMode::Never),
            (None, false) => None,
        };

        RunSettings {
            timeout_secs: self.timeout,
            on_error: self.on_error,
            color,
        }
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Builder for setting environment variables in tests
#[cfg(test)]
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

#[cfg(test)]
impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn var(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_{name}"), value.into()));
        self
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        for (key, value) in self.vars {
            env::set_var(key, value);
        }

        EnvGuard { previous }
    }
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}
