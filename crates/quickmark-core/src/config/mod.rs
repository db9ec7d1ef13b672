//! Configuration management for Quickmark.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. A batch works from one frozen [`Config`] value; callers apply
//! their overrides first and then hand the snapshot to the pipeline.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Quickmark.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output sizing and encoding
    pub output: OutputConfig,

    /// Watermark layout
    pub watermark: WatermarkConfig,

    /// Copyright/author stamping
    pub metadata: MetadataConfig,

    /// Front-end preferences
    pub general: GeneralConfig,

    /// Batch settings
    pub processing: ProcessingConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.quickmark.quickmark/config.toml
    /// - Linux: ~/.config/quickmark/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\quickmark\config\config.toml
    ///
    /// Falls back to ~/.quickmark/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "quickmark", "quickmark")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".quickmark").join("config.toml")
            })
    }

    /// Resolved watermark image path (with ~ expansion).
    pub fn watermark_path(&self) -> PathBuf {
        expand_path(&self.watermark.filename)
    }

    /// Resolved saving-path override (with ~ expansion), if one is set.
    pub fn saving_dir(&self) -> Option<PathBuf> {
        self.output.saving_path.as_deref().map(expand_path)
    }

    /// Check that the snapshot is usable before starting a batch.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}
