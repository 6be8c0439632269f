//! Conversation domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::DocumentId;

/// Unique identifier of a conversation.
pub type ConversationId = i64;

/// A conversation scoped to exactly one document.
///
/// The `document_id` foreign key is the basis of the selection invariant:
/// a conversation may only be active while its document is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub document_id: DocumentId,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConversation {
    pub title: String,
    pub document_id: DocumentId,
}
