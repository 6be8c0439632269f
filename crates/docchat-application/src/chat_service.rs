//! Conversation/message registry.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use docchat_core::api::ChatApi;
use docchat_core::chat::{
    Conversation, ConversationId, Message, NewConversation, SendMessageRequest,
};
use docchat_core::notification::NotificationStore;
use docchat_core::selection::SelectionState;
use docchat_core::session::SessionManager;
use docchat_core::{DocchatError, Result};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::surface_error;

/// Client-side cache of the selected document's conversations and the
/// active conversation's messages, including the optimistic send path.
///
/// # Staleness guard
///
/// Fetches are keyed by a changing identifier (the selected document, the
/// active conversation), and nothing cancels an in-flight request when
/// the key changes. Each fetch therefore takes a generation token at
/// start; a response is applied only while its token is still current.
/// Superseded responses are discarded, never applied.
pub struct ChatService {
    api: Arc<dyn ChatApi>,
    session: Arc<SessionManager>,
    selection: Arc<SelectionState>,
    notifications: NotificationStore,
    conversations: RwLock<Vec<Conversation>>,
    messages: RwLock<Vec<Message>>,
    conversation_epoch: AtomicU64,
    message_epoch: AtomicU64,
    // Ids for optimistic local messages: negative and decreasing, so they
    // can never collide with server-assigned positive ids.
    next_local_id: AtomicI64,
}

impl ChatService {
    pub fn new(
        api: Arc<dyn ChatApi>,
        session: Arc<SessionManager>,
        selection: Arc<SelectionState>,
        notifications: NotificationStore,
    ) -> Self {
        Self {
            api,
            session,
            selection,
            notifications,
            conversations: RwLock::new(Vec::new()),
            messages: RwLock::new(Vec::new()),
            conversation_epoch: AtomicU64::new(0),
            message_epoch: AtomicU64::new(0),
            next_local_id: AtomicI64::new(-1),
        }
    }

    /// Returns a snapshot of the cached conversation list.
    pub async fn conversations(&self) -> Vec<Conversation> {
        self.conversations.read().await.clone()
    }

    /// Returns a snapshot of the active conversation's messages.
    pub async fn messages(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }

    /// Drops both caches and invalidates in-flight fetches.
    ///
    /// Called whenever the selected document changes or the session ends.
    pub async fn reset(&self) {
        self.conversation_epoch.fetch_add(1, Ordering::SeqCst);
        self.message_epoch.fetch_add(1, Ordering::SeqCst);
        self.conversations.write().await.clear();
        self.messages.write().await.clear();
    }

    /// Refetches the conversation list for the selected document.
    ///
    /// A no-op (empty list) when no document is selected.
    pub async fn refresh_conversations(&self) -> Result<()> {
        let Some(document_id) = self.selection.document_id().await else {
            self.conversations.write().await.clear();
            return Ok(());
        };

        let epoch = self.conversation_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.list_conversations(document_id).await;

        match result {
            Ok(conversations) => {
                // The epoch must be checked under the cache lock: a newer
                // fetch may apply between a bare check and the write.
                let mut cache = self.conversations.write().await;
                if self.conversation_epoch.load(Ordering::SeqCst) != epoch {
                    debug!(document_id, "discarding stale conversation list");
                    return Ok(());
                }
                *cache = conversations;
                Ok(())
            }
            Err(err) => {
                if self.conversation_epoch.load(Ordering::SeqCst) != epoch {
                    debug!(document_id, "discarding stale conversation list");
                    return Ok(());
                }
                surface_error(&self.session, &self.notifications, &err).await;
                Err(err)
            }
        }
    }

    /// Creates a conversation for the selected document and activates it.
    ///
    /// The title must be non-empty after trimming; the list is refetched
    /// after creation so the cache reflects server-side ordering.
    pub async fn create_conversation(&self, title: &str) -> Result<Conversation> {
        let Some(document_id) = self.selection.document_id().await else {
            return Err(DocchatError::validation("No document selected."));
        };
        let title = title.trim();
        if title.is_empty() {
            return Err(DocchatError::validation("A conversation title is required."));
        }

        let request = NewConversation {
            title: title.to_string(),
            document_id,
        };
        match self.api.create_conversation(&request).await {
            Ok(conversation) => {
                info!(id = conversation.id, document_id, "conversation created");
                let _ = self.refresh_conversations().await;
                self.selection.select_conversation(&conversation).await?;
                let _ = self.fetch_messages().await;
                Ok(conversation)
            }
            Err(err) => {
                surface_error(&self.session, &self.notifications, &err).await;
                Err(err)
            }
        }
    }

    /// Deletes a conversation.
    ///
    /// Deleting the active conversation clears the active selection and
    /// the message list; deleting any other conversation leaves the
    /// active state untouched.
    pub async fn delete_conversation(&self, id: ConversationId) -> Result<()> {
        match self.api.delete_conversation(id).await {
            Ok(()) => {
                info!(id, "conversation deleted");
                self.conversations.write().await.retain(|c| c.id != id);
                if self.selection.conversation_id().await == Some(id) {
                    self.selection.clear_conversation().await;
                    self.message_epoch.fetch_add(1, Ordering::SeqCst);
                    self.messages.write().await.clear();
                }
                Ok(())
            }
            Err(err) => {
                surface_error(&self.session, &self.notifications, &err).await;
                Err(err)
            }
        }
    }

    /// Activates a cached conversation and loads its messages.
    ///
    /// Ownership is validated by the selection state: a conversation
    /// belonging to another document is rejected here instead of failing
    /// silently at fetch time.
    pub async fn select_conversation(&self, id: ConversationId) -> Result<()> {
        let conversation = self
            .conversations
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| DocchatError::validation("Unknown conversation."))?;

        self.selection.select_conversation(&conversation).await?;
        self.fetch_messages().await
    }

    /// Refetches the message list for the active conversation.
    ///
    /// A no-op (empty list) when no conversation is active. Stale
    /// responses, superseded by a newer fetch or a reset, are discarded.
    pub async fn fetch_messages(&self) -> Result<()> {
        let Some(conversation_id) = self.selection.conversation_id().await else {
            self.messages.write().await.clear();
            return Ok(());
        };

        let epoch = self.message_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.list_messages(conversation_id).await;

        match result {
            Ok(messages) => {
                // Same atomicity requirement as the conversation list.
                let mut cache = self.messages.write().await;
                if self.message_epoch.load(Ordering::SeqCst) != epoch {
                    debug!(conversation_id, "discarding stale message list");
                    return Ok(());
                }
                *cache = messages;
                Ok(())
            }
            Err(err) => {
                if self.message_epoch.load(Ordering::SeqCst) != epoch {
                    debug!(conversation_id, "discarding stale message list");
                    return Ok(());
                }
                surface_error(&self.session, &self.notifications, &err).await;
                Err(err)
            }
        }
    }

    /// Sends a user message to the active conversation.
    ///
    /// Side-effect ordering:
    ///
    /// 1. a local user message with a temporary id is appended
    ///    immediately (optimistic UI)
    /// 2. the send call is issued
    /// 3. on success, the authoritative message list is refetched,
    ///    replacing the temporary message and picking up the assistant's
    ///    reply
    /// 4. on failure, the temporary message is removed by id and an error
    ///    notification is surfaced; there is no retry
    ///
    /// Empty or whitespace-only content is a no-op: no optimistic
    /// message, no network call.
    pub async fn send_message(&self, mut request: SendMessageRequest) -> Result<Message> {
        let Some(conversation_id) = self.selection.conversation_id().await else {
            return Err(DocchatError::validation("No active conversation."));
        };
        request.content = request.content.trim().to_string();
        if request.content.is_empty() {
            return Err(DocchatError::validation("A message is required."));
        }

        let local_id = self.next_local_id.fetch_sub(1, Ordering::SeqCst);
        self.messages
            .write()
            .await
            .push(Message::local(local_id, conversation_id, request.content.clone()));

        match self.api.send_message(conversation_id, &request).await {
            Ok(message) => {
                let _ = self.fetch_messages().await;
                Ok(message)
            }
            Err(err) => {
                self.messages.write().await.retain(|m| m.id != local_id);
                surface_error(&self.session, &self.notifications, &err).await;
                Err(err)
            }
        }
    }
}
