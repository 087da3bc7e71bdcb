//! Configuration file loading
//!
//! Reads YAML or JSON comparison configs and validates them.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

use super::ApiDiffConfig;

/// Minimum number of hosts needed for a comparison
const MIN_HOSTS: usize = 2;

impl ApiDiffConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::parse(&content, is_yaml_file(path))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        debug!(
            "Loaded {} hosts and {} tests from {}",
            config.hosts.len(),
            config.tests.len(),
            path.display()
        );

        Ok(config)
    }

    /// Parse configuration text
    pub fn parse(content: &str, yaml: bool) -> Result<Self> {
        let config = if yaml {
            serde_yaml::from_str(content).context("Invalid YAML config")?
        } else {
            serde_json::from_str(content).context("Invalid JSON config")?
        };
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.hosts.len() < MIN_HOSTS {
            anyhow::bail!(
                "At least {} hosts are required for a comparison, found {}",
                MIN_HOSTS,
                self.hosts.len()
            );
        }

        if let Some(index) = self.hosts.iter().position(|h| h.trim().is_empty()) {
            anyhow::bail!("Host #{} is empty", index + 1);
        }

        for (index, test) in self.tests.iter().enumerate() {
            if test.api.is_empty() {
                anyhow::bail!("Test #{} has an empty api", index + 1);
            }
            if test.params.is_empty() {
                warn!("Test '{}' has no parameter sets and will not run", test.api);
            }
        }

        Ok(())
    }
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
