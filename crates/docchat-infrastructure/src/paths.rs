//! Path management for docchat client files.
//!
//! All persisted client state (configuration, cached credentials) lives
//! under a single per-user configuration directory:
//!
//! ```text
//! ~/.config/docchat/           # Linux (platform-appropriate elsewhere)
//! ├── config.toml              # Client configuration
//! ├── credentials.json         # Persisted access token
//! └── profile.json             # Cached user profile
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find configuration directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path resolution for docchat.
pub struct DocchatPaths;

impl DocchatPaths {
    /// Returns the docchat configuration directory.
    ///
    /// Uses the platform config dir (XDG on Linux, the appropriate
    /// location on macOS/Windows).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("docchat"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path of the client configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
