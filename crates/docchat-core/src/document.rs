//! Document domain model and upload validation policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{DocchatError, Result};

/// Unique identifier of a document.
pub type DocumentId = i64;

/// Server-side processing state of an uploaded document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

/// A document owned by the current user.
///
/// The server is the source of truth; the client-side registry cache is a
/// read replica updated after each mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub status: DocumentStatus,
    pub file_size: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update for a document's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DocumentPatch {
    /// Creates a patch that only changes the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Creates a patch that only changes the description.
    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }
}

/// A file selected for upload, before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Default maximum upload size: 100 MB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// MIME types the backend can process.
pub const SUPPORTED_CONTENT_TYPES: [&str; 4] = [
    "application/pdf",
    "text/plain",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/markdown",
];

/// Client-side upload constraints, checked before any network call.
///
/// The server may still reject an upload independently; this policy only
/// avoids round trips that are guaranteed to fail.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: SUPPORTED_CONTENT_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl UploadPolicy {
    /// Creates a policy with a custom size limit and the default allow-list.
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            ..Self::default()
        }
    }

    /// Validates a file against this policy.
    pub fn validate(&self, file: &FileUpload) -> Result<()> {
        if file.data.is_empty() {
            return Err(DocchatError::validation("The selected file is empty."));
        }
        if !self.allowed_types.iter().any(|t| t == &file.content_type) {
            return Err(DocchatError::validation(
                "Unsupported file type. Only PDF, TXT, DOCX and Markdown files are allowed.",
            ));
        }
        if file.data.len() as u64 > self.max_bytes {
            return Err(DocchatError::validation(format!(
                "The file is too large. Maximum size is {} MB.",
                self.max_bytes / (1024 * 1024)
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(bytes: usize) -> FileUpload {
        FileUpload {
            file_name: "report.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![0u8; bytes],
        }
    }

    #[test]
    fn test_accepts_valid_pdf() {
        let policy = UploadPolicy::default();
        assert!(policy.validate(&pdf(1024)).is_ok());
    }

    #[test]
    fn test_rejects_empty_file() {
        let policy = UploadPolicy::default();
        let err = policy.validate(&pdf(0)).unwrap_err();
        assert!(matches!(err, DocchatError::Validation(_)));
    }

    #[test]
    fn test_rejects_oversized_file() {
        let policy = UploadPolicy::with_max_bytes(1024);
        let err = policy.validate(&pdf(2048)).unwrap_err();
        assert!(err.user_message().contains("too large"));
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let policy = UploadPolicy::default();
        let file = FileUpload {
            file_name: "movie.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            data: vec![1, 2, 3],
        };
        let err = policy.validate(&file).unwrap_err();
        assert!(err.user_message().contains("Unsupported file type"));
    }

    #[test]
    fn test_status_wire_format() {
        let doc: Document = serde_json::from_str(
            r#"{
                "id": 1,
                "filename": "notes.md",
                "status": "processing",
                "file_size": 512,
                "created_at": "2026-02-01T08:30:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(doc.status, DocumentStatus::Processing);
        assert_eq!(doc.status.to_string(), "processing");
        assert!(doc.title.is_none());
    }
}
