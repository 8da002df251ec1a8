//! Store configuration.
//!
//! Loaded from a JSON file; every field has a default so a missing file or a
//! partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{CutlineError, Result};
use crate::rate::FrameRate;

/// Default label committed when a blank project name is supplied.
pub const DEFAULT_PROJECT_NAME: &str = "Untitled Project";

/// Configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of undo entries kept.
    pub history_depth: usize,
    /// Label used when a blank project name is committed.
    pub default_project_name: String,
    /// Default width for new engine projects.
    pub default_width: u32,
    /// Default height for new engine projects.
    pub default_height: u32,
    /// Default frame rate for new engine projects.
    pub default_framerate: FrameRate,
    /// Log filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_depth: 200,
            default_project_name: DEFAULT_PROJECT_NAME.to_string(),
            default_width: 1920,
            default_height: 1080,
            default_framerate: FrameRate::FPS_30,
            log_level: "info".to_string(),
        }
    }
}

impl StoreConfig {
    /// Platform location of the config file (`<config dir>/cutline/config.json`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cutline").join("config.json"))
    }

    /// Load configuration from a JSON file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let data = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&data)
            .map_err(|e| CutlineError::Config(format!("Invalid config {}: {}", path.display(), e)))?;
        config.validate()?;

        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write configuration as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)
            .map_err(|e| CutlineError::Serialization(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.history_depth == 0 {
            return Err(CutlineError::Config("history_depth must be at least 1".into()));
        }
        if self.default_project_name.trim().is_empty() {
            return Err(CutlineError::Config(
                "default_project_name must not be blank".into(),
            ));
        }
        if self.default_width == 0 || self.default_height == 0 {
            return Err(CutlineError::Config(
                "default resolution must be positive".into(),
            ));
        }
        Ok(())
    }
}
