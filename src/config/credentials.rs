//! Credential file persistence.
//!
//! The credential is a small JSON object written with owner-only permissions.
//! A missing, unreadable or unparsable file means "not authenticated".

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

/// Access token obtained by a successful login.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Reads and writes the credential file inside the configuration directory.
///
#[derive(Clone, Debug)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Returns a store for the credential file inside the given directory.
    ///
    pub fn new(dir: &Path) -> Self {
        CredentialStore {
            path: dir.join(CREDENTIALS_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored credential.
    ///
    pub fn load(&self) -> Result<Credential, ConfigError> {
        let not_authenticated = || ConfigError::NotAuthenticated {
            path: self.path.clone(),
        };
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            log::debug!("Could not read {}: {}", self.path.display(), e);
            not_authenticated()
        })?;
        let credential: Credential = serde_json::from_str(&contents).map_err(|e| {
            log::warn!("Ignoring unparsable credential file {}: {}", self.path.display(), e);
            not_authenticated()
        })?;
        if credential.access_token.is_empty() {
            return Err(not_authenticated());
        }
        Ok(credential)
    }

    /// Write the credential, replacing any previous one.
    ///
    pub fn save(&self, credential: &Credential) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let content = serde_json::to_string_pretty(credential)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        let save_failed = |source| ConfigError::SaveFailed {
            path: self.path.clone(),
            source,
        };
        let mut file = open_owner_only(&self.path).map_err(save_failed)?;
        file.write_all(content.as_bytes()).map_err(save_failed)?;
        file.flush().map_err(save_failed)?;
        log::info!("Saved credentials to {}", self.path.display());
        Ok(())
    }
}

#[cfg(unix)]
fn open_owner_only(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_owner_only(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}
