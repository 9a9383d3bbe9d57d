// Configuration for the savings-predictor command line
//
// Loaded from TOML; every field has a default so an empty file is valid.
// Command-line flags override whatever the file sets.

use crate::entities::EntitySource;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Command-line configuration
///
/// # Example
/// ```
/// use savings_predictor::config::Config;
///
/// let config = Config::from_toml_str("state_path = \"prefs.json\"").unwrap();
/// assert_eq!(config.state_path.to_str(), Some("prefs.json"));
/// assert!(config.skip_off_the_record);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Entity list replacing the packaged one
    pub entities_path: Option<PathBuf>,

    /// JSON preference file holding the savings counters
    ///
    /// Default: `savings-state.json`
    pub state_path: PathBuf,

    /// `EnvFilter` directive for log output, e.g. `savings_predictor=debug`
    pub log_filter: Option<String>,

    /// Skip the whole pipeline for off-the-record tabs
    ///
    /// Default: true
    pub skip_off_the_record: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entities_path: None,
            state_path: PathBuf::from("savings-state.json"),
            log_filter: None,
            skip_off_the_record: true,
        }
    }
}

impl Config {
    /// Load and validate a TOML configuration file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML config")?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.state_path.as_os_str().is_empty() {
            return Err("state_path must not be empty".to_string());
        }

        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                return Err("log_filter must not be empty when set".to_string());
            }
        }

        Ok(())
    }

    /// Where the entity list is read from
    pub fn entity_source(&self) -> EntitySource {
        match &self.entities_path {
            Some(path) => EntitySource::File(path.clone()),
            None => EntitySource::Packaged,
        }
    }
}
