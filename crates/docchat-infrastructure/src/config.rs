//! Client configuration.
//!
//! Loaded from `config.toml` in the docchat config directory, with an
//! environment-variable override for the backend URL. Missing or invalid
//! files fall back to defaults; a broken config file must never prevent
//! the client from starting.

use std::path::Path;

use docchat_core::document::{UploadPolicy, DEFAULT_MAX_UPLOAD_BYTES};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::paths::DocchatPaths;

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "DOCCHAT_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Client-side configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the REST backend.
    pub api_base_url: String,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the default location.
    ///
    /// Resolution order: `config.toml` if present and parseable, then the
    /// `DOCCHAT_API_URL` environment variable on top, then defaults.
    pub fn load() -> Self {
        let mut config = DocchatPaths::config_file()
            .ok()
            .filter(|path| path.exists())
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }
        config
    }

    /// Loads the configuration from a specific file, falling back to
    /// defaults when the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!("invalid config file {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                warn!("cannot read config file {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Builds the upload validation policy for this configuration.
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::with_max_bytes(self.max_upload_bytes)
    }
}
