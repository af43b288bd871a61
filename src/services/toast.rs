//! Toast notification hub
//!
//! A process-wide publish/subscribe holder for user notifications. The hub
//! is passed by explicit reference to whatever needs it; there is no global
//! singleton. Publishing never blocks and is fine with zero subscribers.

use crate::services::Notifier;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastKind {
    /// How long the presentation layer should keep the toast visible.
    pub const fn default_duration(&self) -> Duration {
        match self {
            Self::Success => Duration::from_millis(4000),
            Self::Error => Duration::from_millis(8000),
            Self::Info => Duration::from_millis(3000),
            Self::Warning => Duration::from_millis(6000),
        }
    }
}

/// A published notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub duration: Duration,
}

/// Broadcast hub for toasts.
pub struct ToastHub {
    tx: broadcast::Sender<Toast>,
    next_id: AtomicU64,
}

impl Default for ToastHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            tx,
            next_id: AtomicU64::new(0),
        }
    }

    /// Subscribe to published toasts; dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }

    /// Publish a toast with an explicit duration.
    pub fn show(&self, kind: ToastKind, message: &str, duration: Duration) {
        let toast = Toast {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            kind,
            message: message.to_string(),
            duration,
        };
        tracing::debug!(?kind, message, "publishing toast");
        // no subscribers is not an error
        let _ = self.tx.send(toast);
    }

    pub fn success(&self, message: &str) {
        self.show(ToastKind::Success, message, ToastKind::Success.default_duration());
    }

    pub fn error(&self, message: &str) {
        self.show(ToastKind::Error, message, ToastKind::Error.default_duration());
    }

    pub fn info(&self, message: &str) {
        self.show(ToastKind::Info, message, ToastKind::Info.default_duration());
    }

    pub fn warning(&self, message: &str) {
        self.show(ToastKind::Warning, message, ToastKind::Warning.default_duration());
    }
}

impl Notifier for ToastHub {
    fn notify(&self, kind: ToastKind, message: &str) {
        self.show(kind, message, kind.default_duration());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_subscribers_receive_published_toasts() {
        let hub = ToastHub::new();
        let mut rx = hub.subscribe();

        hub.success("¡Operación completada con éxito!");
        let toast = rx.recv().await.unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, "¡Operación completada con éxito!");
        assert_eq!(toast.duration, Duration::from_millis(4000));
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_increasing() {
        let hub = ToastHub::new();
        let mut rx = hub.subscribe();
        hub.info("uno");
        hub.warning("dos");

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let hub = ToastHub::new();
        hub.error("nobody listening");
    }

    #[test]
    fn test_per_kind_durations() {
        assert_eq!(ToastKind::Error.default_duration(), Duration::from_millis(8000));
        assert_eq!(ToastKind::Info.default_duration(), Duration::from_millis(3000));
        assert_eq!(ToastKind::Warning.default_duration(), Duration::from_millis(6000));
    }
}
