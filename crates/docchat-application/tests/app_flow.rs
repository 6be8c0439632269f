//! End-to-end flows over an in-memory backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use docchat_application::App;
use docchat_core::api::{AuthApi, AuthToken, ChatApi, CredentialStore, DocumentApi};
use docchat_core::chat::{
    Conversation, ConversationId, Message, MessageRole, NewConversation, SendMessageRequest,
};
use docchat_core::document::{
    Document, DocumentId, DocumentPatch, DocumentStatus, FileUpload, UploadPolicy,
};
use docchat_core::user::User;
use docchat_core::{DocchatError, Result};

/// In-memory stand-in for the whole REST backend.
#[derive(Default)]
struct FakeBackend {
    documents: Mutex<Vec<Document>>,
    conversations: Mutex<Vec<Conversation>>,
    messages: Mutex<HashMap<ConversationId, Vec<Message>>>,
    reject_login: bool,
    fail_document_list: bool,
}

impl FakeBackend {
    fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Mutex::new(documents),
            ..Self::default()
        }
    }

    fn rejecting_logins() -> Self {
        Self {
            reject_login: true,
            ..Self::default()
        }
    }
}

fn document(id: DocumentId, filename: &str) -> Document {
    Document {
        id,
        filename: filename.to_string(),
        title: None,
        status: DocumentStatus::Completed,
        file_size: 2048,
        created_at: Utc::now(),
        description: None,
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, _email: &str, _password: &str) -> Result<AuthToken> {
        if self.reject_login {
            return Err(DocchatError::http(401, "Incorrect email or password"));
        }
        Ok(AuthToken {
            access_token: "tok-flow".to_string(),
            expires_in: Some(3600),
        })
    }

    async fn current_user(&self) -> Result<User> {
        Ok(User {
            id: 1,
            email: "ada@example.com".to_string(),
            created_at: Utc::now(),
        })
    }
}

#[async_trait]
impl DocumentApi for FakeBackend {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        if self.fail_document_list {
            return Err(DocchatError::http(500, ""));
        }
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn upload_document(&self, file: &FileUpload) -> Result<Document> {
        let mut documents = self.documents.lock().unwrap();
        let id = documents.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        let created = Document {
            id,
            filename: file.file_name.clone(),
            title: None,
            status: DocumentStatus::Pending,
            file_size: file.data.len() as u64,
            created_at: Utc::now(),
            description: None,
        };
        documents.push(created.clone());
        Ok(created)
    }

    async fn update_document(&self, id: DocumentId, patch: &DocumentPatch) -> Result<Document> {
        let mut documents = self.documents.lock().unwrap();
        let doc = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| DocchatError::http(404, ""))?;
        if let Some(title) = &patch.title {
            doc.title = Some(title.clone());
        }
        if let Some(description) = &patch.description {
            doc.description = Some(description.clone());
        }
        Ok(doc.clone())
    }

    async fn delete_document(&self, id: DocumentId) -> Result<()> {
        self.documents.lock().unwrap().retain(|d| d.id != id);
        self.conversations
            .lock()
            .unwrap()
            .retain(|c| c.document_id != id);
        Ok(())
    }
}

#[async_trait]
impl ChatApi for FakeBackend {
    async fn list_conversations(&self, document_id: DocumentId) -> Result<Vec<Conversation>> {
        Ok(self
            .conversations
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.document_id == document_id)
            .cloned()
            .collect())
    }

    async fn create_conversation(&self, request: &NewConversation) -> Result<Conversation> {
        let mut conversations = self.conversations.lock().unwrap();
        let id = conversations.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let created = Conversation {
            id,
            title: request.title.clone(),
            document_id: request.document_id,
            created_at: Utc::now(),
        };
        conversations.push(created.clone());
        Ok(created)
    }

    async fn delete_conversation(&self, id: ConversationId) -> Result<()> {
        self.conversations.lock().unwrap().retain(|c| c.id != id);
        self.messages.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn list_messages(&self, conversation_id: ConversationId) -> Result<Vec<Message>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(
        &self,
        conversation_id: ConversationId,
        request: &SendMessageRequest,
    ) -> Result<Message> {
        let mut messages = self.messages.lock().unwrap();
        let list = messages.entry(conversation_id).or_default();
        let base = list.iter().map(|m| m.id).max().unwrap_or(0);
        let stored = Message {
            id: base + 1,
            conversation_id,
            role: MessageRole::User,
            content: request.content.clone(),
            created_at: Utc::now(),
        };
        list.push(stored.clone());
        list.push(Message {
            id: base + 2,
            conversation_id,
            role: MessageRole::Assistant,
            content: format!("About \"{}\": see page 3.", request.content),
            created_at: Utc::now(),
        });
        Ok(stored)
    }
}

#[derive(Default)]
struct MemoryCredentialStore {
    inner: Mutex<HashMap<&'static str, String>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn save_token(&self, token: &str) -> Result<()> {
        self.inner.lock().unwrap().insert("token", token.to_string());
        Ok(())
    }

    fn load_token(&self) -> Result<Option<String>> {
        Ok(self.inner.lock().unwrap().get("token").cloned())
    }

    fn save_profile(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user)?;
        self.inner.lock().unwrap().insert("profile", json);
        Ok(())
    }

    fn load_profile(&self) -> Result<Option<User>> {
        match self.inner.lock().unwrap().get("profile") {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<()> {
        self.inner.lock().unwrap().clear();
        Ok(())
    }
}

fn app(backend: Arc<FakeBackend>) -> App {
    App::new(
        backend.clone(),
        backend.clone(),
        backend,
        Arc::new(MemoryCredentialStore::default()),
        UploadPolicy::default(),
    )
}

fn pdf(name: &str) -> FileUpload {
    FileUpload {
        file_name: name.to_string(),
        content_type: "application/pdf".to_string(),
        data: vec![0u8; 512],
    }
}

#[tokio::test]
async fn test_login_loads_documents() {
    let backend = Arc::new(FakeBackend::with_documents(vec![
        document(1, "lease.pdf"),
        document(2, "notes.md"),
    ]));
    let app = app(backend);

    app.login("ada@example.com", "secret").await.unwrap();

    assert!(app.session().is_authenticated().await);
    assert_eq!(app.documents().documents().await.len(), 2);
}

#[tokio::test]
async fn test_failed_login_records_error_in_session_state() {
    let app = app(Arc::new(FakeBackend::rejecting_logins()));

    let err = app.login("ada@example.com", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());

    let state = app.session().state().await;
    assert!(!state.is_authenticated());
    assert_eq!(state.error.as_deref(), Some("Incorrect email or password"));
    // The form shows the error inline; nothing reaches the toast store.
    assert!(app.notifications().notifications().await.is_empty());
}

#[tokio::test]
async fn test_login_survives_a_failing_document_refresh() {
    let app = app(Arc::new(FakeBackend {
        fail_document_list: true,
        ..FakeBackend::default()
    }));

    // The sign-in itself succeeded; the list failure is a toast, not a
    // login error.
    let user = app.login("ada@example.com", "secret").await.unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert!(app.session().is_authenticated().await);
    assert!(app.session().state().await.error.is_none());

    let toasts = app.notifications().notifications().await;
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Internal server error.");
}

#[tokio::test]
async fn test_mutations_require_a_session() {
    let app = app(Arc::new(FakeBackend::default()));

    let err = app.select_document(Some(1)).await.unwrap_err();
    assert!(matches!(err, DocchatError::Session(_)));
    app.upload_document(pdf("draft.pdf")).await.unwrap_err();
    app.create_conversation("Test").await.unwrap_err();
    assert!(app.documents().documents().await.is_empty());
}

#[tokio::test]
async fn test_upload_selects_the_new_document() {
    let backend = Arc::new(FakeBackend::with_documents(vec![document(1, "lease.pdf")]));
    let app = app(backend);
    app.login("ada@example.com", "secret").await.unwrap();
    app.select_document(Some(1)).await.unwrap();

    let created = app.upload_document(pdf("report.pdf")).await.unwrap();

    assert_eq!(app.documents().documents().await.len(), 2);
    assert_eq!(app.selection().document_id().await, Some(created.id));
    assert_eq!(app.selection().conversation_id().await, None);
    assert!(app.chat().conversations().await.is_empty());
}

#[tokio::test]
async fn test_conversation_lifecycle_is_scoped_to_its_document() {
    let backend = Arc::new(FakeBackend::with_documents(vec![
        document(1, "lease.pdf"),
        document(2, "notes.md"),
    ]));
    let app = app(backend);
    app.login("ada@example.com", "secret").await.unwrap();
    app.select_document(Some(1)).await.unwrap();

    let created = app.create_conversation("Test").await.unwrap();
    assert_eq!(created.document_id, 1);
    assert_eq!(app.selection().conversation_id().await, Some(created.id));

    // Switching documents drops the conversation state entirely.
    app.select_document(Some(2)).await.unwrap();
    assert_eq!(app.selection().conversation_id().await, None);
    assert!(app.chat().conversations().await.is_empty());

    // Switching back shows the conversation again and reopens it.
    app.select_document(Some(1)).await.unwrap();
    assert_eq!(app.chat().conversations().await.len(), 1);
    app.open_conversation(created.id).await.unwrap();
    assert_eq!(app.selection().conversation_id().await, Some(created.id));
}

#[tokio::test]
async fn test_send_message_round_trip() {
    let backend = Arc::new(FakeBackend::with_documents(vec![document(1, "lease.pdf")]));
    let app = app(backend);
    app.login("ada@example.com", "secret").await.unwrap();
    app.select_document(Some(1)).await.unwrap();
    app.create_conversation("Rent questions").await.unwrap();

    app.send_message(SendMessageRequest::new("When is rent due?"))
        .await
        .unwrap();

    let messages = app.chat().messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert!(messages.iter().all(|m| !m.is_local()));
}

#[tokio::test]
async fn test_deleting_the_selected_document_cascades() {
    let backend = Arc::new(FakeBackend::with_documents(vec![document(1, "lease.pdf")]));
    let app = app(backend);
    app.login("ada@example.com", "secret").await.unwrap();
    app.select_document(Some(1)).await.unwrap();
    app.create_conversation("Test").await.unwrap();

    app.delete_document(1).await.unwrap();

    assert_eq!(app.selection().document_id().await, None);
    assert_eq!(app.selection().conversation_id().await, None);
    assert!(app.documents().documents().await.is_empty());
    assert!(app.chat().messages().await.is_empty());
}

#[tokio::test]
async fn test_logout_tears_down_everything() {
    let backend = Arc::new(FakeBackend::with_documents(vec![document(1, "lease.pdf")]));
    let app = app(backend);
    app.login("ada@example.com", "secret").await.unwrap();
    app.select_document(Some(1)).await.unwrap();
    app.create_conversation("Test").await.unwrap();
    app.modals()
        .open(docchat_core::modal::ModalConfig::dialog("settings"))
        .await;

    app.logout().await;

    assert!(!app.session().is_authenticated().await);
    assert_eq!(app.selection().document_id().await, None);
    assert!(app.documents().documents().await.is_empty());
    assert!(app.chat().conversations().await.is_empty());
    assert!(app.chat().messages().await.is_empty());
    assert!(app.modals().stack().await.is_empty());
}

#[tokio::test]
async fn test_start_restores_a_persisted_session() {
    let backend = Arc::new(FakeBackend::with_documents(vec![document(1, "lease.pdf")]));
    let credentials = Arc::new(MemoryCredentialStore::default());
    credentials.save_token("tok-flow").unwrap();

    let app = App::new(
        backend.clone(),
        backend.clone(),
        backend,
        credentials,
        UploadPolicy::default(),
    );
    app.start().await.unwrap();

    assert!(app.session().is_authenticated().await);
    assert_eq!(app.documents().documents().await.len(), 1);
}

#[tokio::test]
async fn test_start_without_credentials_stays_anonymous() {
    let app = app(Arc::new(FakeBackend::default()));

    app.start().await.unwrap();

    assert!(!app.session().is_authenticated().await);
    assert!(app.documents().documents().await.is_empty());
}
