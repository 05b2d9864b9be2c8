//! Server settings persistence for kvnotes.
//!
//! Settings live in a JSON file (camelCase keys). Any key may be omitted
//! and falls back to its default. A handful of environment variables
//! override whatever the file says, which is how deployments inject the
//! session secret without writing it to disk.

use crate::DEFAULT_COOKIE_NAME;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Environment variable names read by [`Settings::apply_env_overrides`].
pub mod env_vars {
    pub const SETTINGS_FILE: &str = "KVNOTES_SETTINGS";
    pub const BIND_ADDRESS: &str = "KVNOTES_BIND";
    pub const DATA_DIRECTORY: &str = "KVNOTES_DATA_DIR";
    pub const SESSION_SECRET: &str = "KVNOTES_SESSION_SECRET";
}

/// Default values.
pub mod defaults {
    pub const SETTINGS_FILE: &str = "kvnotes.json";
    pub const BIND_ADDRESS: &str = "127.0.0.1:8787";
    pub const DATA_DIRECTORY: &str = "./data";
}

/// Persisted server settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Socket address the HTTP server listens on.
    pub bind_address: String,
    /// Directory holding one file per user document.
    pub data_directory: PathBuf,
    /// Name of the session cookie.
    pub cookie_name: String,
    /// Key used to sign session cookies. Empty means "not configured".
    pub session_secret: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secret = if self.session_secret.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("Settings")
            .field("bind_address", &self.bind_address)
            .field("data_directory", &self.data_directory)
            .field("cookie_name", &self.cookie_name)
            .field("session_secret", &secret)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: defaults::BIND_ADDRESS.to_string(),
            data_directory: PathBuf::from(defaults::DATA_DIRECTORY),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            session_secret: String::new(),
        }
    }
}

impl Settings {
    /// Overrides fields from `KVNOTES_*` environment variables that are set and non-empty.
    #[must_use]
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v: &String| !v.is_empty());
        if let Some(bind) = var(env_vars::BIND_ADDRESS) {
            self.bind_address = bind;
        }
        if let Some(dir) = var(env_vars::DATA_DIRECTORY) {
            self.data_directory = PathBuf::from(dir);
        }
        if let Some(secret) = var(env_vars::SESSION_SECRET) {
            self.session_secret = secret;
        }
        self
    }

    /// Returns the configured secret, or a random one when none is set.
    ///
    /// A random secret invalidates every session cookie on restart.
    pub fn session_secret_or_random(&self) -> String {
        if self.session_secret.is_empty() {
            log::warn!(
                "no session secret configured (set {}); sessions will not survive a restart",
                env_vars::SESSION_SECRET
            );
            Uuid::new_v4().simple().to_string()
        } else {
            self.session_secret.clone()
        }
    }
}

/// Returns the settings file path: `$KVNOTES_SETTINGS`, else `./kvnotes.json`.
pub fn settings_file_path() -> PathBuf {
    std::env::var(env_vars::SETTINGS_FILE)
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(defaults::SETTINGS_FILE))
}

/// Loads settings from `path`; a missing file yields defaults.
///
/// # Errors
///
/// Returns [`crate::NotesError::Io`] if the file exists but cannot be read, or
/// [`crate::NotesError::Json`] if it is not valid settings JSON.
pub fn load_settings(path: &Path) -> Result<Settings> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(e) => Err(e.into()),
    }
}

/// Loads settings from `path`; returns defaults if the file is missing or corrupt.
pub fn load_settings_or_default(path: &Path) -> Settings {
    load_settings(path).unwrap_or_else(|e| {
        log::warn!("ignoring settings file {}: {e}", path.display());
        Settings::default()
    })
}

/// Saves settings to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`crate::NotesError::Io`] or [`crate::NotesError::Json`] on failure.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NotesError;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = load_settings(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings.bind_address, defaults::BIND_ADDRESS);
        assert_eq!(settings.cookie_name, "__crn_session");
        assert!(settings.session_secret.is_empty());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kvnotes.json");
        fs::write(&path, r#"{"dataDirectory":"/var/lib/kvnotes"}"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.data_directory, PathBuf::from("/var/lib/kvnotes"));
        assert_eq!(settings.bind_address, defaults::BIND_ADDRESS);
    }

    #[test]
    fn test_corrupt_file_is_an_error_unless_lenient() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kvnotes.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_settings(&path), Err(NotesError::Json(_))));
        assert_eq!(
            load_settings_or_default(&path).bind_address,
            defaults::BIND_ADDRESS
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("kvnotes.json");
        let settings = Settings {
            bind_address: "0.0.0.0:9000".to_string(),
            session_secret: "s3cret".to_string(),
            ..Settings::default()
        };
        save_settings(&path, &settings).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("bindAddress"));
        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.bind_address, "0.0.0.0:9000");
        assert_eq!(loaded.session_secret, "s3cret");
    }

    #[test]
    fn test_overrides_skip_unset_and_empty() {
        let vars: HashMap<&str, &str> = [
            (env_vars::BIND_ADDRESS, "0.0.0.0:80"),
            (env_vars::SESSION_SECRET, ""),
        ]
        .into_iter()
        .collect();
        let settings = Settings {
            session_secret: "from-file".to_string(),
            ..Settings::default()
        }
        .apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(settings.bind_address, "0.0.0.0:80");
        assert_eq!(settings.session_secret, "from-file");
        assert_eq!(
            settings.data_directory,
            PathBuf::from(defaults::DATA_DIRECTORY)
        );
    }

    #[test]
    fn test_debug_hides_session_secret() {
        let settings = Settings {
            session_secret: "hunter2".to_string(),
            ..Settings::default()
        };
        let printed = format!("{settings:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains(defaults::BIND_ADDRESS));
    }

    #[test]
    fn test_random_secret_when_unset() {
        let settings = Settings::default();
        let a = settings.session_secret_or_random();
        let b = settings.session_secret_or_random();
        assert!(!a.is_empty());
        assert_ne!(a, b);

        let configured = Settings {
            session_secret: "fixed".to_string(),
            ..Settings::default()
        };
        assert_eq!(configured.session_secret_or_random(), "fixed");
    }
}
