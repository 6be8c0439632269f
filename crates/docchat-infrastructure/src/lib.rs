//! docchat-infrastructure: concrete adapters for the docchat client.
//!
//! Implements the seams declared in `docchat-core`:
//!
//! - [`credential_storage`]: file-based persisted token + cached profile
//! - [`config`]: client configuration (backend URL, upload limits)
//! - [`http`]: the reqwest-backed REST backend with normalized errors
//! - [`paths`]: per-user config directory resolution

pub mod config;
pub mod credential_storage;
pub mod http;
pub mod paths;

pub use config::ClientConfig;
pub use credential_storage::CredentialStorage;
pub use http::HttpBackend;
