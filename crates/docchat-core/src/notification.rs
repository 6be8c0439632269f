//! Transient toast notification store.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::Display;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Unique identifier of a notification.
pub type NotificationId = Uuid;

/// Category of a notification, driving its visual treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Auto-removal delay in milliseconds; `0` means persistent until
    /// explicitly dismissed.
    pub duration_ms: u64,
}

/// Parameters for a new notification.
///
/// Defaults match the most common call site: an error toast that
/// disappears after five seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub duration_ms: u64,
}

impl Default for NewNotification {
    fn default() -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Error".to_string(),
            message: String::new(),
            duration_ms: 5_000,
        }
    }
}

/// Holds the list of live notifications and schedules their expiry.
///
/// Cloning is cheap and shares the underlying list, so expiry timers and
/// every component that surfaces errors can hold their own handle.
#[derive(Clone, Default)]
pub struct NotificationStore {
    inner: Arc<RwLock<Vec<Notification>>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a notification and returns its id.
    ///
    /// When `duration_ms > 0`, a timer task removes it after the delay;
    /// dismissing it earlier is fine, the late removal is then a no-op.
    pub async fn add(&self, notification: NewNotification) -> NotificationId {
        let id = Uuid::new_v4();
        let duration_ms = notification.duration_ms;
        self.inner.write().await.push(Notification {
            id,
            kind: notification.kind,
            title: notification.title,
            message: notification.message,
            duration_ms,
        });

        if duration_ms > 0 {
            let store = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(duration_ms)).await;
                store.remove(id).await;
            });
        }

        id
    }

    /// Removes a notification by id. Unknown ids are a no-op.
    pub async fn remove(&self, id: NotificationId) {
        self.inner.write().await.retain(|n| n.id != id);
    }

    /// Removes every notification.
    pub async fn clear_all(&self) {
        self.inner.write().await.clear();
    }

    /// Returns the live notifications in insertion order.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.inner.read().await.clone()
    }

    /// Shows a transient error toast (five seconds).
    pub async fn error(&self, message: impl Into<String>) -> NotificationId {
        self.add(NewNotification {
            message: message.into(),
            ..NewNotification::default()
        })
        .await
    }

    /// Shows a transient success toast (three seconds).
    pub async fn success(&self, message: impl Into<String>) -> NotificationId {
        self.add(NewNotification {
            kind: NotificationKind::Success,
            title: "Success".to_string(),
            message: message.into(),
            duration_ms: 3_000,
        })
        .await
    }

    /// Shows the persistent connectivity error toast.
    ///
    /// Stays until dismissed or connectivity is restored; duration 0
    /// disables auto-removal.
    pub async fn network_error(&self) -> NotificationId {
        self.add(NewNotification {
            title: "Connection lost".to_string(),
            message: "Could not reach the server. Check your network connection.".to_string(),
            duration_ms: 0,
            ..NewNotification::default()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_are_error_with_five_second_expiry() {
        let store = NotificationStore::new();
        store
            .add(NewNotification {
                message: "boom".to_string(),
                ..NewNotification::default()
            })
            .await;

        let live = store.notifications().await;
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].kind, NotificationKind::Error);
        assert_eq!(live[0].title, "Error");
        assert_eq!(live[0].duration_ms, 5_000);
    }

    #[tokio::test]
    async fn test_timed_notification_expires() {
        let store = NotificationStore::new();
        store
            .add(NewNotification {
                message: "soon gone".to_string(),
                duration_ms: 20,
                ..NewNotification::default()
            })
            .await;
        assert_eq!(store.notifications().await.len(), 1);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(store.notifications().await.is_empty());
    }

    #[tokio::test]
    async fn test_persistent_notification_is_never_auto_removed() {
        let store = NotificationStore::new();
        let id = store.network_error().await;

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(store.notifications().await.len(), 1);

        store.remove(id).await;
        assert!(store.notifications().await.is_empty());
    }

    #[tokio::test]
    async fn test_early_dismissal_beats_the_timer() {
        let store = NotificationStore::new();
        let id = store
            .add(NewNotification {
                message: "dismissed".to_string(),
                duration_ms: 5_000,
                ..NewNotification::default()
            })
            .await;

        store.remove(id).await;
        assert!(store.notifications().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_all() {
        let store = NotificationStore::new();
        store.error("one").await;
        store.success("two").await;
        assert_eq!(store.notifications().await.len(), 2);

        store.clear_all().await;
        assert!(store.notifications().await.is_empty());
    }
}
