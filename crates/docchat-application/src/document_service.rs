//! Document registry.

use std::sync::Arc;

use docchat_core::api::DocumentApi;
use docchat_core::document::{Document, DocumentId, DocumentPatch, FileUpload, UploadPolicy};
use docchat_core::notification::NotificationStore;
use docchat_core::selection::SelectionState;
use docchat_core::session::SessionManager;
use docchat_core::Result;
use tokio::sync::RwLock;
use tracing::info;

use crate::surface_error;

/// Client-side cache of the user's document list, synchronized with the
/// backend via CRUD calls.
///
/// The server is the source of truth. The cache is replaced wholesale by
/// [`refresh`](Self::refresh), patched in place after updates, and
/// appended to after uploads (the upload endpoint returns the created
/// document). Every failed call surfaces a categorized notification; no
/// call is retried automatically.
pub struct DocumentService {
    api: Arc<dyn DocumentApi>,
    session: Arc<SessionManager>,
    selection: Arc<SelectionState>,
    notifications: NotificationStore,
    policy: UploadPolicy,
    documents: RwLock<Vec<Document>>,
}

impl DocumentService {
    pub fn new(
        api: Arc<dyn DocumentApi>,
        session: Arc<SessionManager>,
        selection: Arc<SelectionState>,
        notifications: NotificationStore,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            api,
            session,
            selection,
            notifications,
            policy,
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Returns a snapshot of the cached document list.
    pub async fn documents(&self) -> Vec<Document> {
        self.documents.read().await.clone()
    }

    /// Replaces the cache with the server's full list.
    pub async fn refresh(&self) -> Result<()> {
        match self.api.list_documents().await {
            Ok(documents) => {
                *self.documents.write().await = documents;
                Ok(())
            }
            Err(err) => {
                surface_error(&self.session, &self.notifications, &err).await;
                Err(err)
            }
        }
    }

    /// Uploads a file after client-side validation.
    ///
    /// On success the created document is appended to the cache and the
    /// selection moves to it (clearing the active conversation per the
    /// selection invariant).
    pub async fn upload(&self, file: FileUpload) -> Result<Document> {
        if let Err(err) = self.policy.validate(&file) {
            self.notifications.error(err.user_message()).await;
            return Err(err);
        }

        match self.api.upload_document(&file).await {
            Ok(document) => {
                info!(id = document.id, filename = %document.filename, "document uploaded");
                self.documents.write().await.push(document.clone());
                self.selection.select_document(Some(document.id)).await;
                Ok(document)
            }
            Err(err) => {
                surface_error(&self.session, &self.notifications, &err).await;
                Err(err)
            }
        }
    }

    /// Applies a partial update; the cache entry is replaced in place.
    pub async fn update(&self, id: DocumentId, patch: DocumentPatch) -> Result<Document> {
        match self.api.update_document(id, &patch).await {
            Ok(updated) => {
                let mut documents = self.documents.write().await;
                if let Some(slot) = documents.iter_mut().find(|d| d.id == id) {
                    *slot = updated.clone();
                }
                Ok(updated)
            }
            Err(err) => {
                surface_error(&self.session, &self.notifications, &err).await;
                Err(err)
            }
        }
    }

    /// Deletes a document.
    ///
    /// When the deleted document was selected, the selection is cleared,
    /// which cascades to the active conversation.
    pub async fn delete(&self, id: DocumentId) -> Result<()> {
        match self.api.delete_document(id).await {
            Ok(()) => {
                info!(id, "document deleted");
                self.documents.write().await.retain(|d| d.id != id);
                if self.selection.document_id().await == Some(id) {
                    self.selection.select_document(None).await;
                }
                Ok(())
            }
            Err(err) => {
                surface_error(&self.session, &self.notifications, &err).await;
                Err(err)
            }
        }
    }

    /// Drops the cached list (used on logout).
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }
}
