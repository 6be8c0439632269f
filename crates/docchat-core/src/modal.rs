//! Modal overlay stack.
//!
//! Modals form an ordered stack (insertion order is stacking order). Each
//! entry is independently closable and carries its own behavior flags, so
//! e.g. a confirmation dialog can refuse to close on an overlay click
//! while a plain dialog above it does not.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Unique identifier of an open modal, generated per open call.
pub type ModalId = Uuid;

/// Visual size hint for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalSize {
    Sm,
    Md,
    Lg,
}

/// Content of a modal, possibly deferred until its id is known.
///
/// The deferred form lets dialog content reference its own id (e.g. a
/// button that closes the dialog it lives in). It is resolved exactly once
/// during [`ModalStack::open`]; the stack never stores an unresolved
/// closure.
pub enum ModalContent {
    Static(String),
    WithId(Box<dyn FnOnce(ModalId) -> String + Send>),
}

impl ModalContent {
    fn resolve(self, id: ModalId) -> String {
        match self {
            Self::Static(content) => content,
            Self::WithId(f) => f(id),
        }
    }
}

impl std::fmt::Debug for ModalContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(content) => f.debug_tuple("Static").field(content).finish(),
            Self::WithId(_) => f.debug_tuple("WithId").field(&"<deferred>").finish(),
        }
    }
}

/// Configuration for opening a modal.
#[derive(Debug)]
pub struct ModalConfig {
    pub title: Option<String>,
    pub size: ModalSize,
    pub content: ModalContent,
    pub show_close_button: bool,
    pub close_on_overlay_click: bool,
    pub close_on_escape: bool,
}

impl ModalConfig {
    /// A plain dialog: medium size, dismissable every way.
    pub fn dialog(content: impl Into<String>) -> Self {
        Self {
            title: None,
            size: ModalSize::Md,
            content: ModalContent::Static(content.into()),
            show_close_button: true,
            close_on_overlay_click: true,
            close_on_escape: true,
        }
    }

    /// A confirmation dialog for destructive actions: small, and never
    /// dismissed by an accidental overlay click or escape press.
    pub fn confirmation(content: impl Into<String>) -> Self {
        Self {
            size: ModalSize::Sm,
            close_on_overlay_click: false,
            close_on_escape: false,
            ..Self::dialog(content)
        }
    }

    /// The document upload dialog: large, escape allowed, overlay click
    /// ignored so a stray click does not discard a selected file.
    pub fn upload(content: impl Into<String>) -> Self {
        Self {
            title: Some("Upload document".to_string()),
            size: ModalSize::Lg,
            close_on_overlay_click: false,
            ..Self::dialog(content)
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the content with a function of the modal's own id.
    pub fn with_content_fn(mut self, f: impl FnOnce(ModalId) -> String + Send + 'static) -> Self {
        self.content = ModalContent::WithId(Box::new(f));
        self
    }
}

/// An open modal as stored in the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modal {
    pub id: ModalId,
    pub title: Option<String>,
    pub size: ModalSize,
    pub content: String,
    pub show_close_button: bool,
    pub close_on_overlay_click: bool,
    pub close_on_escape: bool,
}

/// The ordered stack of currently open modals.
pub struct ModalStack {
    modals: RwLock<Vec<Modal>>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self {
            modals: RwLock::new(Vec::new()),
        }
    }

    /// Opens a modal and returns its id.
    ///
    /// Two-phase construction: the id is allocated first, then the content
    /// is resolved against it, then the entry is stored.
    pub async fn open(&self, config: ModalConfig) -> ModalId {
        let id = Uuid::new_v4();
        let modal = Modal {
            id,
            title: config.title,
            size: config.size,
            content: config.content.resolve(id),
            show_close_button: config.show_close_button,
            close_on_overlay_click: config.close_on_overlay_click,
            close_on_escape: config.close_on_escape,
        };
        self.modals.write().await.push(modal);
        id
    }

    /// Closes exactly the matching modal. Unknown ids are a no-op.
    pub async fn close(&self, id: ModalId) {
        self.modals.write().await.retain(|m| m.id != id);
    }

    /// Closes every open modal.
    pub async fn close_all(&self) {
        self.modals.write().await.clear();
    }

    /// Returns the open modals in stacking order (bottom first).
    pub async fn stack(&self) -> Vec<Modal> {
        self.modals.read().await.clone()
    }

    /// True when the given modal is open.
    pub async fn is_open(&self, id: ModalId) -> bool {
        self.modals.read().await.iter().any(|m| m.id == id)
    }
}

impl Default for ModalStack {
    fn default() -> Self {
        Self::new()
    }
}
