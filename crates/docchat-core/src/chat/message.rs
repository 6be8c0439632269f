//! Message domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::chat::ConversationId;

/// Unique identifier of a message.
///
/// Server-assigned ids are positive. Optimistically inserted local
/// messages use negative ids, so the two can never collide.
pub type MessageId = i64;

/// The author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single message in a conversation.
///
/// Messages form an append-only sequence ordered by creation time; there
/// is no reordering or editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Synthesizes a local user message for the optimistic send path.
    ///
    /// The caller is responsible for passing a locally unique negative id.
    pub fn local(id: MessageId, conversation_id: ConversationId, content: impl Into<String>) -> Self {
        Self {
            id,
            conversation_id,
            role: MessageRole::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// True for optimistically inserted messages not yet confirmed by the
    /// server.
    pub fn is_local(&self) -> bool {
        self.id < 0
    }
}

/// Request body for sending a message, including optional model parameters
/// forwarded to the generation backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
}

impl SendMessageRequest {
    /// Creates a request with no model overrides.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}
