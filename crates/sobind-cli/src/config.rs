//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables
//!
//! Command-line flags are applied last, by the caller.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where to find the shared library
    pub library: LibraryConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Random source settings
    pub random: RandomConfig,
}

/// Library resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Base name of the library, without platform prefix or suffix
    pub name: String,

    /// Explicit path to the library file
    pub path: Option<PathBuf>,

    /// Directories searched before the loader's own search path
    pub search_paths: Vec<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

/// Random source configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Seed applied to the library before any `maybe` call
    pub seed: Option<u64>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            name: sobind_core::LIBRARY_NAME.to_string(),
            path: None,
            search_paths: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".sobind.yaml"), PathBuf::from(".sobind.json")];

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let sobind_dir = config_dir.join("sobind");
            paths.push(sobind_dir.join("config.yaml"));
            paths.push(sobind_dir.join("config.json"));
        }

        paths
    }

    /// Apply `SOBIND_LIBRARY` and `SOBIND_SEED`
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(path) = std::env::var_os("SOBIND_LIBRARY") {
            if !path.is_empty() {
                self.library.path = Some(PathBuf::from(path));
            }
        }

        if let Ok(seed) = std::env::var("SOBIND_SEED") {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("SOBIND_SEED is not a u64: {}", seed)))?;
            self.random.seed = Some(seed);
        }

        Ok(())
    }
}
