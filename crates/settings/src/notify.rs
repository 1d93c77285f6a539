//! User-visible notifications (toasts) raised by the synchronizer.
//!
//! A commit produces a `Loading` toast followed by exactly one `Success` or
//! `Error` toast with the same `toast_id`, so a UI can replace the loading
//! toast in place.

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub toast_id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn loading(toast_id: u64, message: impl Into<String>) -> Self {
        Self {
            toast_id,
            kind: NotificationKind::Loading,
            message: message.into(),
        }
    }

    pub fn success(toast_id: u64, message: impl Into<String>) -> Self {
        Self {
            toast_id,
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(toast_id: u64, message: impl Into<String>) -> Self {
        Self {
            toast_id,
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Sink for notifications. Must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Forward notifications to a UI event loop over a channel.
///
/// A closed receiver means the view is gone; the notification is dropped.
impl Notifier for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if self.send(notification).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }
}
