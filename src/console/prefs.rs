//! Persisted view preferences.
//!
//! Remembers the message list height between console sessions in a small
//! JSON file under the platform config directory.

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "maillog-console";
const PREFS_FILE: &str = "console.json";

/// Preferences that survive a restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPrefs {
    /// Rows given to the message list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_height: Option<u16>,
}

impl ViewPrefs {
    /// Default location, if the platform has a config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(PREFS_FILE))
    }

    /// Loads preferences; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no saved view preferences");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(IoError::ReadFailed {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                }
                .into());
            }
        };
        serde_json::from_str(&text).map_err(|err| {
            IoError::ReadFailed {
                path: path.display().to_string(),
                reason: err.to_string(),
            }
            .into()
        })
    }

    /// Saves preferences, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let write_failed = |reason: String| IoError::WriteFailed {
            path: path.display().to_string(),
            reason,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_failed(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| write_failed(e.to_string()))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| write_failed(e.to_string()))?;
        Ok(())
    }
}
