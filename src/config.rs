use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::graph::DEFAULT_MAX_DEPTH;
use crate::terms::Locale;

/// Upper bound accepted for `resolution.max_depth`
const MAX_DEPTH_LIMIT: usize = 6;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub kinterm: KintermConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

/// Store and logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct KintermConfig {
    pub db_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Term resolution settings
#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionConfig {
    /// Hop limit for the relation path search
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub locale: Locale,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            locale: Locale::default(),
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in KINTERM_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let config_path = std::env::var("KINTERM_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::from_file(&config_path)
    }

    /// Load and validate a specific config file
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.kinterm.db_path.as_os_str().is_empty() {
            anyhow::bail!("kinterm.db_path must not be empty");
        }

        if self.resolution.max_depth == 0 || self.resolution.max_depth > MAX_DEPTH_LIMIT {
            anyhow::bail!(
                "resolution.max_depth must be between 1 and {}, got {}",
                MAX_DEPTH_LIMIT,
                self.resolution.max_depth
            );
        }

        Ok(())
    }

    /// Get database path
    pub fn db_path(&self) -> &Path {
        &self.kinterm.db_path
    }
}
