//! Error types for the docchat client core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole client state layer.
///
/// Every fallible operation in the registries and stores returns this type.
/// It mirrors the normalized result contract of the backend boundary: an
/// error either happened before any network call (`Validation`, `Session`),
/// carries an HTTP status (`Http`), or is a transport failure (`Network`).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocchatError {
    /// Client-side validation failure, caught before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session/authentication state error (e.g. operating while signed out).
    #[error("Session error: {0}")]
    Session(String),

    /// HTTP error response from the backend.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Network/connectivity failure (offline, transport error).
    #[error("Network error: {0}")]
    Network(String),

    /// Local persistence error (credential cache, config files).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocchatError {
    /// Creates a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Session error.
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    /// Creates an Http error for the given status code.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a Network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend rejected the session (HTTP 401).
    ///
    /// Any component observing this must force an immediate logout.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True for connectivity failures, which are surfaced as persistent
    /// notifications rather than transient ones.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Maps the error to the message shown to the user.
    ///
    /// HTTP statuses follow a fixed classification; the server-provided
    /// detail is preferred for 400/422 responses where it is usually a
    /// concrete field-level explanation.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Session(message) => message.clone(),
            Self::Network(_) => {
                "Could not reach the server. Check your network connection.".to_string()
            }
            Self::Http { status, message } => match status {
                400 | 422 if !message.is_empty() => message.clone(),
                400 => "Invalid input.".to_string(),
                401 => "Session expired. Please sign in again.".to_string(),
                403 => "You do not have permission to perform this action.".to_string(),
                404 => "Resource not found.".to_string(),
                422 => "Validation error.".to_string(),
                500..=599 => "Internal server error.".to_string(),
                _ if !message.is_empty() => message.clone(),
                _ => "An unexpected error occurred.".to_string(),
            },
            Self::Storage(_) | Self::Serialization(_) | Self::Internal(_) => {
                "An unexpected error occurred.".to_string()
            }
        }
    }
}

impl From<std::io::Error> for DocchatError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for DocchatError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Convenient Result alias using [`DocchatError`].
pub type Result<T> = std::result::Result<T, DocchatError>;
