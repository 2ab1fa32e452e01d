//! Credential store settings
//!
//! Stored as a plain JSON file. Holds no secrets, only the hashing work factor.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::crypto::HashPolicy;
use crate::error::{CredentialError, Result};

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Work factor for new password hash records
    pub hashing: HashPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            hashing: HashPolicy::default(),
        }
    }
}

impl Settings {
    /// Default settings file location in the user's config directory
    pub fn default_path() -> Result<PathBuf> {
        ProjectDirs::from("dev", "credstore", "credstore")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| {
                CredentialError::Configuration("Could not determine config directory".to_string())
            })
    }

    /// Load settings from file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        settings.hashing.validate()?;

        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        // Write atomically using temp file
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, &contents)?;
        std::fs::rename(&temp_path, path)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }
}
