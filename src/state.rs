//! Durable process-wide state.
//!
//! The only state dfm persists outside profile repositories is the pointer
//! to the currently selected profile. It is loaded at startup, threaded
//! explicitly through command handlers, and saved once at process exit —
//! there is no ambient global.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Process-wide state persisted between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Absolute path of the currently selected profile, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_profile: Option<PathBuf>,
}

impl State {
    /// Load state from `path`.
    ///
    /// A missing file is not an error: it yields the default (no current
    /// profile), so first runs work without setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|e| ConfigError::Invalid {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save state to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        std::fs::write(path, json).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// The current profile location, if one has been selected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoCurrentProfile`] when no profile is set.
    pub fn require_current(&self) -> Result<&Path, ConfigError> {
        self.current_profile
            .as_deref()
            .ok_or(ConfigError::NoCurrentProfile)
    }
}
