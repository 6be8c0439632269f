//! Persisted credential cache.
//!
//! The filesystem analogue of the browser's persisted login: the access
//! token (`credentials.json`) and the cached user profile
//! (`profile.json`) under the docchat config directory. Their presence is
//! what session restore checks on startup.
//!
//! # Security Note
//!
//! The token is stored as plaintext JSON. The file should carry
//! restrictive permissions; encryption is out of scope for this cache.

use std::fs;
use std::path::PathBuf;

use docchat_core::api::CredentialStore;
use docchat_core::user::User;
use docchat_core::{DocchatError, Result};
use serde::{Deserialize, Serialize};

use crate::paths::{DocchatPaths, PathError};

const CREDENTIALS_FILE: &str = "credentials.json";
const PROFILE_FILE: &str = "profile.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredCredentials {
    access_token: String,
}

/// Errors that can occur during credential storage operations.
#[derive(Debug)]
pub enum CredentialStorageError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for CredentialStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
            CredentialStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            CredentialStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for CredentialStorageError {}

impl From<std::io::Error> for CredentialStorageError {
    fn from(e: std::io::Error) -> Self {
        CredentialStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for CredentialStorageError {
    fn from(e: serde_json::Error) -> Self {
        CredentialStorageError::ParseError(e)
    }
}

impl From<PathError> for CredentialStorageError {
    fn from(_: PathError) -> Self {
        CredentialStorageError::ConfigDirNotFound
    }
}

impl From<CredentialStorageError> for DocchatError {
    fn from(e: CredentialStorageError) -> Self {
        DocchatError::storage(e.to_string())
    }
}

/// File-based implementation of [`CredentialStore`].
pub struct CredentialStorage {
    dir: PathBuf,
}

impl CredentialStorage {
    /// Creates a storage rooted at the default config directory.
    pub fn new() -> std::result::Result<Self, CredentialStorageError> {
        Ok(Self {
            dir: DocchatPaths::config_dir()?,
        })
    }

    /// Creates a storage rooted at a custom directory (for testing).
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> std::result::Result<(), CredentialStorageError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.dir.join(file), json)?;
        Ok(())
    }

    fn read_json<T: for<'de> Deserialize<'de>>(
        &self,
        file: &str,
    ) -> std::result::Result<Option<T>, CredentialStorageError> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn remove(&self, file: &str) -> std::result::Result<(), CredentialStorageError> {
        let path = self.dir.join(file);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl CredentialStore for CredentialStorage {
    fn save_token(&self, token: &str) -> Result<()> {
        self.write_json(
            CREDENTIALS_FILE,
            &StoredCredentials {
                access_token: token.to_string(),
            },
        )?;
        Ok(())
    }

    fn load_token(&self) -> Result<Option<String>> {
        let stored: Option<StoredCredentials> = self.read_json(CREDENTIALS_FILE)?;
        Ok(stored.map(|c| c.access_token))
    }

    fn save_profile(&self, user: &User) -> Result<()> {
        self.write_json(PROFILE_FILE, user)?;
        Ok(())
    }

    fn load_profile(&self) -> Result<Option<User>> {
        Ok(self.read_json(PROFILE_FILE)?)
    }

    fn clear(&self) -> Result<()> {
        self.remove(CREDENTIALS_FILE)?;
        self.remove(PROFILE_FILE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn storage() -> (CredentialStorage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (CredentialStorage::with_dir(dir.path().join("docchat")), dir)
    }

    #[test]
    fn test_token_roundtrip() {
        let (storage, _guard) = storage();
        assert!(storage.load_token().unwrap().is_none());

        storage.save_token("tok-abc").unwrap();
        assert_eq!(storage.load_token().unwrap().as_deref(), Some("tok-abc"));
    }

    #[test]
    fn test_profile_roundtrip() {
        let (storage, _guard) = storage();
        let user = User {
            id: 3,
            email: "ada@example.com".to_string(),
            created_at: Utc::now(),
        };

        storage.save_profile(&user).unwrap();
        assert_eq!(storage.load_profile().unwrap(), Some(user));
    }

    #[test]
    fn test_clear_removes_both_files_and_is_idempotent() {
        let (storage, _guard) = storage();
        storage.save_token("tok").unwrap();
        storage
            .save_profile(&User {
                id: 1,
                email: "a@b.c".to_string(),
                created_at: Utc::now(),
            })
            .unwrap();

        storage.clear().unwrap();
        assert!(storage.load_token().unwrap().is_none());
        assert!(storage.load_profile().unwrap().is_none());

        // Clearing an empty store must also succeed.
        storage.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_surfaces_a_storage_error() {
        let (storage, _guard) = storage();
        fs::create_dir_all(&storage.dir).unwrap();
        fs::write(storage.dir.join(CREDENTIALS_FILE), "{not json").unwrap();

        assert!(storage.load_token().is_err());
    }
}
