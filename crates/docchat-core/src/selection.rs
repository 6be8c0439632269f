//! Document/conversation selection state.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::chat::{Conversation, ConversationId};
use crate::document::DocumentId;
use crate::error::{DocchatError, Result};

/// Snapshot of the current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub document_id: Option<DocumentId>,
    pub conversation_id: Option<ConversationId>,
}

/// Owns "which document is selected" and "which conversation is active".
///
/// Pure state holder, no I/O. Maintains the invariant that the active
/// conversation, when set, belongs to the selected document:
///
/// - changing the selected document always clears the active conversation
/// - activating a conversation requires its `document_id` to match the
///   current selection; mismatches are rejected here, centrally, rather
///   than being left to fail silently at fetch time
pub struct SelectionState {
    inner: RwLock<Selection>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Selection::default()),
        }
    }

    /// Returns a snapshot of the current selection.
    pub async fn snapshot(&self) -> Selection {
        *self.inner.read().await
    }

    /// The currently selected document, if any.
    pub async fn document_id(&self) -> Option<DocumentId> {
        self.inner.read().await.document_id
    }

    /// The currently active conversation, if any.
    pub async fn conversation_id(&self) -> Option<ConversationId> {
        self.inner.read().await.conversation_id
    }

    /// Selects a document (or clears the selection with `None`).
    ///
    /// Always clears the active conversation, including when re-selecting
    /// the same document.
    pub async fn select_document(&self, id: Option<DocumentId>) {
        let mut inner = self.inner.write().await;
        inner.document_id = id;
        inner.conversation_id = None;
    }

    /// Activates a conversation.
    ///
    /// # Errors
    ///
    /// Returns `Validation` and leaves the selection untouched when the
    /// conversation does not belong to the selected document.
    pub async fn select_conversation(&self, conversation: &Conversation) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.document_id != Some(conversation.document_id) {
            return Err(DocchatError::validation(
                "The conversation does not belong to the selected document.",
            ));
        }
        inner.conversation_id = Some(conversation.id);
        Ok(())
    }

    /// Clears the active conversation, keeping the document selection.
    pub async fn clear_conversation(&self) {
        self.inner.write().await.conversation_id = None;
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn conversation(id: ConversationId, document_id: DocumentId) -> Conversation {
        Conversation {
            id,
            title: format!("Conversation {id}"),
            document_id,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_selecting_document_clears_active_conversation() {
        let selection = SelectionState::new();
        selection.select_document(Some(1)).await;
        selection
            .select_conversation(&conversation(10, 1))
            .await
            .unwrap();

        selection.select_document(Some(2)).await;
        let snap = selection.snapshot().await;
        assert_eq!(snap.document_id, Some(2));
        assert_eq!(snap.conversation_id, None);
    }

    #[tokio::test]
    async fn test_clearing_document_clears_conversation_too() {
        let selection = SelectionState::new();
        selection.select_document(Some(1)).await;
        selection
            .select_conversation(&conversation(10, 1))
            .await
            .unwrap();

        selection.select_document(None).await;
        assert_eq!(selection.snapshot().await, Selection::default());
    }

    #[tokio::test]
    async fn test_reselecting_same_document_still_clears_conversation() {
        let selection = SelectionState::new();
        selection.select_document(Some(1)).await;
        selection
            .select_conversation(&conversation(10, 1))
            .await
            .unwrap();

        selection.select_document(Some(1)).await;
        assert_eq!(selection.conversation_id().await, None);
    }

    #[tokio::test]
    async fn test_foreign_conversation_is_rejected() {
        let selection = SelectionState::new();
        selection.select_document(Some(1)).await;

        let err = selection
            .select_conversation(&conversation(10, 99))
            .await
            .unwrap_err();
        assert!(matches!(err, DocchatError::Validation(_)));
        assert_eq!(selection.conversation_id().await, None);
    }

    #[tokio::test]
    async fn test_conversation_requires_a_selected_document() {
        let selection = SelectionState::new();
        assert!(selection
            .select_conversation(&conversation(10, 1))
            .await
            .is_err());
    }
}
