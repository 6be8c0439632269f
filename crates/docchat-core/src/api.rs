//! Backend seam traits.
//!
//! These traits define the contract between the state layer and its
//! collaborators: the REST backend (auth, documents, chat) and the local
//! credential cache. Concrete implementations live in
//! `docchat-infrastructure`; tests substitute in-memory mocks.
//!
//! Every method returns the normalized result the registries depend on:
//! `Ok(data)` or a [`DocchatError`](crate::error::DocchatError) carrying an
//! optional HTTP status and a human-readable message. Implementations must
//! not panic on expected failure modes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chat::{Conversation, ConversationId, Message, NewConversation, SendMessageRequest};
use crate::document::{Document, DocumentId, DocumentPatch, FileUpload};
use crate::error::Result;
use crate::user::User;

/// Response of a successful credential exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

/// Authentication endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for an access token.
    async fn login(&self, email: &str, password: &str) -> Result<AuthToken>;

    /// Fetches the profile of the user owning the current token.
    async fn current_user(&self) -> Result<User>;
}

/// Document CRUD endpoints.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Returns the user's full document list.
    async fn list_documents(&self) -> Result<Vec<Document>>;

    /// Uploads a file and returns the created document.
    async fn upload_document(&self, file: &FileUpload) -> Result<Document>;

    /// Applies a partial update and returns the updated document.
    async fn update_document(&self, id: DocumentId, patch: &DocumentPatch) -> Result<Document>;

    /// Deletes a document by id.
    async fn delete_document(&self, id: DocumentId) -> Result<()>;
}

/// Conversation and message endpoints.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Lists the conversations belonging to a document.
    async fn list_conversations(&self, document_id: DocumentId) -> Result<Vec<Conversation>>;

    /// Creates a conversation and returns it.
    async fn create_conversation(&self, request: &NewConversation) -> Result<Conversation>;

    /// Deletes a conversation by id.
    async fn delete_conversation(&self, id: ConversationId) -> Result<()>;

    /// Lists a conversation's messages in creation order.
    async fn list_messages(&self, conversation_id: ConversationId) -> Result<Vec<Message>>;

    /// Sends a user message and returns the stored message.
    ///
    /// The assistant's reply is produced asynchronously server-side; the
    /// registry reconciles by refetching the full message list.
    async fn send_message(
        &self,
        conversation_id: ConversationId,
        request: &SendMessageRequest,
    ) -> Result<Message>;
}

/// Persisted client credentials: the access token and a cached profile,
/// surviving across process restarts.
///
/// Operations are synchronous; implementations are expected to be cheap
/// local reads/writes. `clear` must succeed even when nothing is stored.
pub trait CredentialStore: Send + Sync {
    fn save_token(&self, token: &str) -> Result<()>;
    fn load_token(&self) -> Result<Option<String>>;
    fn save_profile(&self, user: &User) -> Result<()>;
    fn load_profile(&self) -> Result<Option<User>>;
    fn clear(&self) -> Result<()>;
}
