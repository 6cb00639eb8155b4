//! Unified path management for Aura configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/aura/              # Config directory
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys
//! └── logs/                    # Application logs
//!     └── aura.log.YYYY-MM-DD
//!
//! ~/.local/share/aura/         # Data directory
//! ├── custom_commands.toml     # Saved custom commands
//! ├── tasks.toml               # Tasks read by the idle reminder
//! └── sessions/
//!     └── session-<id>.toml    # One file per session
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_NAME: &str = "aura";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Platform config/data directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

impl From<PathError> for aura_core::AuraError {
    fn from(err: PathError) -> Self {
        aura_core::AuraError::config(err.to_string())
    }
}

/// Resolved config and data roots.
///
/// Either root can be overridden (command line flags, tests); the rest of the
/// layout is derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuraPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AuraPaths {
    /// Uses the given roots as-is.
    pub fn new(config_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Resolves platform defaults, applying any overrides.
    pub fn resolve(
        config_override: Option<&Path>,
        data_override: Option<&Path>,
    ) -> Result<Self, PathError> {
        let config_dir = match config_override {
            Some(dir) => dir.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::HomeDirNotFound)?
                .join(APP_NAME),
        };
        let data_dir = match data_override {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir()
                .ok_or(PathError::HomeDirNotFound)?
                .join(APP_NAME),
        };
        Ok(Self::new(config_dir, data_dir))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file(&self) -> PathBuf {
        self.config_dir.join("secret.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    pub fn commands_file(&self) -> PathBuf {
        self.data_dir.join("custom_commands.toml")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join("tasks.toml")
    }
}
