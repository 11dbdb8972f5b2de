//! CLI configuration
//!
//! Values come from an optional config file (`counterpass.toml` in the working
//! directory, or the file passed with `--config`) and `COUNTERPASS_*`
//! environment variables, in that order. Command-line flags override both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use counterpass_scheduler::SchedulingMode;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Catalog file used when `--catalog` is not given
    pub catalog: Option<PathBuf>,

    /// Report format used when `--format` is not given
    pub format: OutputFormat,

    /// When the scheduler rebuilds its schedule
    pub scheduling_mode: SchedulingMode,

    /// Default log level (overridden by RUST_LOG and --verbose)
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            format: OutputFormat::Text,
            scheduling_mode: SchedulingMode::Lazy,
            log_level: "info".to_string(),
        }
    }
}

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

impl CliConfig {
    /// Load configuration from an explicit file, or `counterpass.toml` if present
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name("counterpass").required(false)),
        };

        let config: CliConfig = builder
            .add_source(config::Environment::with_prefix("COUNTERPASS"))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {} (expected one of {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            );
        }

        if let Some(catalog) = &self.catalog {
            if catalog.as_os_str().is_empty() {
                anyhow::bail!("Catalog path must not be empty");
            }
        }

        Ok(())
    }
}
