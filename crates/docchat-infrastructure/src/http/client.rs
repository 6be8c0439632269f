//! Reqwest-backed implementation of the backend seam traits.
//!
//! Every response is normalized at this boundary into the contract the
//! registries depend on: a success value, or a `DocchatError` carrying
//! the HTTP status and the server's `detail` message (FastAPI style)
//! when one is present. Transport failures become `Network` errors.
//!
//! The bearer token is read from the credential store on every request,
//! so a login or logout is picked up without rebuilding the client.

use std::sync::Arc;

use async_trait::async_trait;
use docchat_core::api::{AuthApi, AuthToken, ChatApi, CredentialStore, DocumentApi};
use docchat_core::chat::{
    Conversation, ConversationId, Message, NewConversation, SendMessageRequest,
};
use docchat_core::document::{Document, DocumentId, DocumentPatch, FileUpload};
use docchat_core::user::User;
use docchat_core::{DocchatError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::config::ClientConfig;

// Page size for list endpoints; the client always fetches the full first
// page, matching the backend's pagination defaults.
const LIST_LIMIT: u32 = 100;

/// HTTP client for the docchat REST backend.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpBackend {
    /// Creates a backend for the configured base URL.
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.credentials.load_token() {
            Ok(Some(token)) => builder.bearer_auth(token),
            _ => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| DocchatError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_detail(&body).unwrap_or_default();
        debug!(status = status.as_u16(), "backend returned an error response");
        Err(DocchatError::http(status.as_u16(), message))
    }

    async fn fetch_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        response
            .json()
            .await
            .map_err(|e| DocchatError::Serialization(e.to_string()))
    }

    async fn fetch_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await?;
        Ok(())
    }
}

/// Extracts the `detail` field of a FastAPI-style error body, if any.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl AuthApi for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> Result<AuthToken> {
        debug!("POST /api/auth/login");
        let builder = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        self.fetch_json(builder).await
    }

    async fn current_user(&self) -> Result<User> {
        debug!("GET /api/auth/me");
        let builder = self.authorize(self.client.get(self.url("/api/auth/me")));
        self.fetch_json(builder).await
    }
}

#[async_trait]
impl DocumentApi for HttpBackend {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        debug!("GET /api/documents/");
        let builder = self.authorize(self.client.get(self.url("/api/documents/")));
        self.fetch_json(builder).await
    }

    async fn upload_document(&self, file: &FileUpload) -> Result<Document> {
        debug!(filename = %file.file_name, size = file.data.len(), "POST /api/documents/upload");
        let part = Part::bytes(file.data.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| DocchatError::validation(format!("Invalid MIME type: {e}")))?;
        let form = Form::new().part("file", part);
        let builder = self.authorize(
            self.client
                .post(self.url("/api/documents/upload"))
                .multipart(form),
        );
        self.fetch_json(builder).await
    }

    async fn update_document(&self, id: DocumentId, patch: &DocumentPatch) -> Result<Document> {
        debug!(id, "PUT /api/documents/{{id}}");
        let builder = self.authorize(
            self.client
                .put(self.url(&format!("/api/documents/{id}")))
                .json(patch),
        );
        self.fetch_json(builder).await
    }

    async fn delete_document(&self, id: DocumentId) -> Result<()> {
        debug!(id, "DELETE /api/documents/{{id}}");
        let builder = self.authorize(self.client.delete(self.url(&format!("/api/documents/{id}"))));
        self.fetch_empty(builder).await
    }
}

#[async_trait]
impl ChatApi for HttpBackend {
    async fn list_conversations(&self, document_id: DocumentId) -> Result<Vec<Conversation>> {
        debug!(document_id, "GET /api/chat/conversations/");
        let builder = self.authorize(
            self.client
                .get(self.url("/api/chat/conversations/"))
                .query(&[
                    ("document_id", document_id.to_string()),
                    ("skip", "0".to_string()),
                    ("limit", LIST_LIMIT.to_string()),
                ]),
        );
        self.fetch_json(builder).await
    }

    async fn create_conversation(&self, request: &NewConversation) -> Result<Conversation> {
        debug!(document_id = request.document_id, "POST /api/chat/conversations/");
        let builder = self.authorize(
            self.client
                .post(self.url("/api/chat/conversations/"))
                .json(request),
        );
        self.fetch_json(builder).await
    }

    async fn delete_conversation(&self, id: ConversationId) -> Result<()> {
        debug!(id, "DELETE /api/chat/conversations/{{id}}");
        let builder = self.authorize(
            self.client
                .delete(self.url(&format!("/api/chat/conversations/{id}"))),
        );
        self.fetch_empty(builder).await
    }

    async fn list_messages(&self, conversation_id: ConversationId) -> Result<Vec<Message>> {
        debug!(conversation_id, "GET /api/chat/conversations/{{id}}/messages/");
        let builder = self.authorize(
            self.client
                .get(self.url(&format!(
                    "/api/chat/conversations/{conversation_id}/messages/"
                )))
                .query(&[
                    ("skip", "0".to_string()),
                    ("limit", LIST_LIMIT.to_string()),
                ]),
        );
        self.fetch_json(builder).await
    }

    async fn send_message(
        &self,
        conversation_id: ConversationId,
        request: &SendMessageRequest,
    ) -> Result<Message> {
        debug!(conversation_id, "POST /api/chat/conversations/{{id}}/messages/");
        let builder = self.authorize(
            self.client
                .post(self.url(&format!(
                    "/api/chat/conversations/{conversation_id}/messages/"
                )))
                .json(request),
        );
        self.fetch_json(builder).await
    }
}
