//! Top-level orchestrator wiring the session, selection, registries,
//! modal stack, and notification store together.

use std::sync::Arc;

use docchat_core::api::{AuthApi, ChatApi, CredentialStore, DocumentApi};
use docchat_core::chat::{Conversation, ConversationId, Message, SendMessageRequest};
use docchat_core::document::{Document, DocumentId, DocumentPatch, FileUpload, UploadPolicy};
use docchat_core::modal::ModalStack;
use docchat_core::notification::NotificationStore;
use docchat_core::selection::SelectionState;
use docchat_core::session::SessionManager;
use docchat_core::user::User;
use docchat_core::{DocchatError, Result};
use docchat_infrastructure::{ClientConfig, CredentialStorage, HttpBackend};
use tracing::info;

use crate::chat_service::ChatService;
use crate::document_service::DocumentService;

/// The assembled client state layer.
///
/// Owns every store and enforces the cross-store invariants the stores
/// cannot enforce alone: authentication gating on mutating operations,
/// the selection cascade (document change resets conversation state),
/// and the teardown order on logout.
pub struct App {
    session: Arc<SessionManager>,
    selection: Arc<SelectionState>,
    modals: ModalStack,
    notifications: NotificationStore,
    documents: Arc<DocumentService>,
    chat: Arc<ChatService>,
}

impl App {
    pub fn new(
        auth: Arc<dyn AuthApi>,
        document_api: Arc<dyn DocumentApi>,
        chat_api: Arc<dyn ChatApi>,
        credentials: Arc<dyn CredentialStore>,
        policy: UploadPolicy,
    ) -> Self {
        let session = Arc::new(SessionManager::new(auth, credentials));
        let selection = Arc::new(SelectionState::new());
        let notifications = NotificationStore::new();
        let documents = Arc::new(DocumentService::new(
            document_api,
            session.clone(),
            selection.clone(),
            notifications.clone(),
            policy,
        ));
        let chat = Arc::new(ChatService::new(
            chat_api,
            session.clone(),
            selection.clone(),
            notifications.clone(),
        ));
        Self {
            session,
            selection,
            modals: ModalStack::new(),
            notifications,
            documents,
            chat,
        }
    }

    /// Assembles the app over the HTTP backend described by `config`.
    ///
    /// # Errors
    ///
    /// Fails when the per-user config directory cannot be resolved.
    pub fn with_http_backend(config: &ClientConfig) -> Result<Self> {
        let credentials: Arc<dyn CredentialStore> = Arc::new(
            CredentialStorage::new().map_err(|e| DocchatError::storage(e.to_string()))?,
        );
        let backend = Arc::new(HttpBackend::new(config, credentials.clone()));
        Ok(Self::new(
            backend.clone(),
            backend.clone(),
            backend,
            credentials,
            config.upload_policy(),
        ))
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn modals(&self) -> &ModalStack {
        &self.modals
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn documents(&self) -> &DocumentService {
        &self.documents
    }

    pub fn chat(&self) -> &ChatService {
        &self.chat
    }

    /// Startup sequence: restore a persisted session and, when one was
    /// restored, load the document list.
    pub async fn start(&self) -> Result<()> {
        if self.session.restore().await? {
            info!("session restored");
            self.documents.refresh().await?;
        }
        Ok(())
    }

    /// Signs in and loads the document list on success.
    ///
    /// Login failures are recorded in the session state (for the form to
    /// display inline) rather than the notification store. A failing
    /// document refresh after a successful sign-in does not fail the
    /// login: the registry has already surfaced it as a notification.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self.session.login(email, password).await?;
        let _ = self.documents.refresh().await;
        Ok(user)
    }

    /// Signs out and tears down all per-session state.
    pub async fn logout(&self) {
        self.session.logout().await;
        self.selection.select_document(None).await;
        self.chat.reset().await;
        self.documents.clear().await;
        self.modals.close_all().await;
    }

    /// Selects a document (or clears the selection with `None`).
    ///
    /// The active conversation is always cleared; when a document is
    /// selected its conversation list is fetched.
    pub async fn select_document(&self, id: Option<DocumentId>) -> Result<()> {
        self.require_auth().await?;
        self.selection.select_document(id).await;
        self.chat.reset().await;
        if id.is_some() {
            self.chat.refresh_conversations().await?;
        }
        Ok(())
    }

    pub async fn upload_document(&self, file: FileUpload) -> Result<Document> {
        self.require_auth().await?;
        let document = self.documents.upload(file).await?;
        // The upload moved the selection to the new document.
        self.chat.reset().await;
        self.chat.refresh_conversations().await?;
        Ok(document)
    }

    pub async fn update_document(&self, id: DocumentId, patch: DocumentPatch) -> Result<Document> {
        self.require_auth().await?;
        self.documents.update(id, patch).await
    }

    /// Deletes a document; deleting the selected one cascades to the
    /// conversation state.
    pub async fn delete_document(&self, id: DocumentId) -> Result<()> {
        self.require_auth().await?;
        let was_selected = self.selection.document_id().await == Some(id);
        self.documents.delete(id).await?;
        if was_selected {
            self.chat.reset().await;
        }
        Ok(())
    }

    pub async fn create_conversation(&self, title: &str) -> Result<Conversation> {
        self.require_auth().await?;
        self.chat.create_conversation(title).await
    }

    pub async fn open_conversation(&self, id: ConversationId) -> Result<()> {
        self.require_auth().await?;
        self.chat.select_conversation(id).await
    }

    pub async fn delete_conversation(&self, id: ConversationId) -> Result<()> {
        self.require_auth().await?;
        self.chat.delete_conversation(id).await
    }

    pub async fn send_message(&self, request: SendMessageRequest) -> Result<Message> {
        self.require_auth().await?;
        self.chat.send_message(request).await
    }

    async fn require_auth(&self) -> Result<()> {
        if self.session.is_authenticated().await {
            Ok(())
        } else {
            Err(DocchatError::session("Sign in to continue."))
        }
    }
}
