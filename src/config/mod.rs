//! Configuration management module.
//!
//! This module handles the configuration directory: the optional `config.yml`
//! (OAuth client, log level, hotkeys), the credential file written by
//! `login`, and the session log file.

pub mod credentials;
mod error;
pub mod hotkeys;

pub use credentials::{Credential, CredentialStore};
pub use error::ConfigError;

use crate::auth::AuthConfig;
use hotkeys::{HotkeyOverrides, SessionHotkeys};
use log::LevelFilter;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const LOG_FILE_NAME: &str = "todoist-tui.log";
const DEFAULT_DIRECTORY_PATH: &str = ".config/todoist-tui";

pub const CLIENT_ID_VAR: &str = "TODOIST_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "TODOIST_CLIENT_SECRET";

/// Oversees management of the configuration directory.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub log_level: Option<String>,
    pub hotkeys: SessionHotkeys,
    dir: PathBuf,
}

/// Define specification for configuration file.
///
#[derive(Debug, Default, Deserialize)]
struct FileSpec {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub hotkeys: HotkeyOverrides,
}

impl Config {
    /// Load the configuration from the custom directory if provided, else the
    /// default one. The directory is created if missing; a missing
    /// `config.yml` just means defaults.
    ///
    pub fn load(custom_dir: Option<&str>) -> Result<Config, ConfigError> {
        let dir = match custom_dir {
            Some(path) => Path::new(path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir.clone(),
                source: e,
            })?;
        }

        let file_path = dir.join(FILE_NAME);
        let data = if file_path.exists() {
            let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            Config::parse(&contents)?
        } else {
            FileSpec::default()
        };

        Ok(Config {
            client_id: data.client_id.filter(|s| !s.is_empty()),
            client_secret: data.client_secret.filter(|s| !s.is_empty()),
            log_level: data.log_level,
            hotkeys: SessionHotkeys::default().with_overrides(data.hotkeys),
            dir,
        })
    }

    fn parse(contents: &str) -> Result<FileSpec, ConfigError> {
        // An empty file parses as null
        if contents.trim().is_empty() {
            return Ok(FileSpec::default());
        }
        serde_yaml::from_str(contents).map_err(|e| ConfigError::DeserializationFailed(e.to_string()))
    }

    /// Let non-empty values from the environment override the file.
    ///
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup(CLIENT_ID_VAR).filter(|s| !s.is_empty()) {
            self.client_id = Some(id);
        }
        if let Some(secret) = lookup(CLIENT_SECRET_VAR).filter(|s| !s.is_empty()) {
            self.client_secret = Some(secret);
        }
    }

    pub fn credentials(&self) -> CredentialStore {
        CredentialStore::new(&self.dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE_NAME)
    }

    /// Authorization settings for `login`, failing when no OAuth client is
    /// configured.
    ///
    pub fn auth_config(&self) -> Result<AuthConfig, ConfigError> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Ok(AuthConfig::new(id, secret)),
            _ => Err(ConfigError::MissingClientCredentials),
        }
    }

    /// Level from `log_level`, falling back to info for absent or unknown
    /// values.
    ///
    pub fn log_level(&self) -> LevelFilter {
        match self.log_level.as_deref().map(str::parse::<LevelFilter>) {
            Some(Ok(level)) => level,
            Some(Err(_)) => {
                log::warn!("Unknown log_level {:?}, using info", self.log_level);
                LevelFilter::Info
            }
            None => LevelFilter::Info,
        }
    }

    /// Returns the path buffer for the default configuration directory
    /// or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, ConfigError> {
        match dirs::home_dir() {
            Some(home) => Ok(home.join(DEFAULT_DIRECTORY_PATH)),
            None => Err(ConfigError::HomeDirectoryNotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use hotkeys::{Hotkey, HotkeyAction};
    use std::collections::HashMap;

    #[test]
    fn load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todoist-tui");
        let config = Config::load(path.to_str()).unwrap();
        assert!(path.exists());
        assert_eq!(config.client_id, None);
        assert_eq!(config.log_level(), LevelFilter::Info);
        assert_eq!(config.hotkeys, SessionHotkeys::default());
        assert_eq!(config.log_path(), path.join("todoist-tui.log"));
        assert_eq!(config.credentials().path(), path.join("credentials.json"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(FILE_NAME),
            "client_id: abc\nclient_secret: shh\nlog_level: debug\nhotkeys:\n  browsing:\n    reload: ctrl+r\n",
        )
        .unwrap();
        let config = Config::load(dir.path().to_str()).unwrap();
        assert_eq!(config.client_id.as_deref(), Some("abc"));
        assert_eq!(config.log_level(), LevelFilter::Debug);
        let reload = &config.hotkeys.browsing[&HotkeyAction::Reload];
        assert_eq!(reload[0].code, KeyCode::Char('r'));
        assert_ne!(reload[0], Hotkey::char('r'));

        let auth = config.auth_config().unwrap();
        assert_eq!(auth.client_id, "abc");
        assert_eq!(auth.client_secret, "shh");
    }

    #[test]
    fn load_accepts_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), "").unwrap();
        assert!(Config::load(dir.path().to_str()).is_ok());
    }

    #[test]
    fn load_rejects_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), "hotkeys:\n  browsing:\n    quit: hyper+q\n").unwrap();
        assert!(matches!(
            Config::load(dir.path().to_str()),
            Err(ConfigError::DeserializationFailed(_))
        ));
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), "client_id: from-file\n").unwrap();
        let mut config = Config::load(dir.path().to_str()).unwrap();

        let env: HashMap<&str, &str> = [(CLIENT_ID_VAR, "from-env"), (CLIENT_SECRET_VAR, "")]
            .into_iter()
            .collect();
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.client_id.as_deref(), Some("from-env"));
        assert_eq!(config.client_secret, None);
        assert!(matches!(
            config.auth_config(),
            Err(ConfigError::MissingClientCredentials)
        ));
    }
}
