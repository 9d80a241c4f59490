//! Persisted user preferences: theme and language.
//!
//! Stored as a small JSON object, by default `settings.json` in the working
//! directory:
//!
//! ```json
//! { "theme": "dark", "language": "en" }
//! ```
//!
//! Loading never fails. A missing file is the normal first-run case; an
//! unreadable or malformed one is logged and ignored. Nothing is written
//! until the user changes a setting.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lumine_theme::ThemeName;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::locale::Language;

/// File name used when no path is given on the command line.
pub const DEFAULT_FILE: &str = "settings.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: ThemeName,
    pub language: Language,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored settings, or the defaults when there are none usable.
    #[must_use]
    pub fn load(&self) -> Settings {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                return Settings::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to read settings");
                return Settings::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => {
                debug!(path = %self.path.display(), ?settings, "loaded settings");
                settings
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to parse settings");
                Settings::default()
            }
        }
    }

    /// Overwrite the file with `settings`.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Io`] when the file can't be written.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let contents = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, contents).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), ?settings, "saved settings");
        Ok(())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(DEFAULT_FILE)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
