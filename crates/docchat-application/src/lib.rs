//! docchat-application: registries and orchestration for the docchat
//! client state layer.
//!
//! The crate composes the stores defined in `docchat-core` into a
//! working client:
//!
//! - [`DocumentService`]: the document registry (list, upload, update,
//!   delete) with client-side upload validation
//! - [`ChatService`]: the conversation and message registry, including
//!   the optimistic send path and stale-response guards
//! - [`App`]: the assembled state layer enforcing cross-store invariants
//!
//! Failures from the REST backend funnel through a single policy: a 401
//! invalidates the session, a transport failure raises the persistent
//! connection-lost notification, and everything else surfaces its
//! user-facing message as a transient error notification.

pub mod app;
pub mod chat_service;
pub mod document_service;

#[cfg(test)]
mod testing;

pub use app::App;
pub use chat_service::ChatService;
pub use document_service::DocumentService;

use docchat_core::notification::NotificationStore;
use docchat_core::session::SessionManager;
use docchat_core::DocchatError;
use tracing::warn;

/// Applies the shared failure policy for a backend error.
pub(crate) async fn surface_error(
    session: &SessionManager,
    notifications: &NotificationStore,
    err: &DocchatError,
) {
    warn!(%err, "api call failed");
    if err.is_unauthorized() {
        session.force_logout().await;
    }
    if err.is_network() {
        notifications.network_error().await;
    } else {
        notifications.error(err.user_message()).await;
    }
}
