//! Toast Notifications
//!
//! Transient success and error messages shown to the user. Views push
//! toasts through a [`Notifier`]; front ends subscribe and render them.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Default number of undelivered toasts kept per subscriber
const DEFAULT_CAPACITY: usize = 64;

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✕",
        }
    }
}

/// A single notification
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Display for Toast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.icon(), self.message)
    }
}

/// Broadcasts toasts to every subscribed front end
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Toast>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive toasts pushed from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        match kind {
            ToastKind::Success => tracing::debug!(message = %message, "toast"),
            ToastKind::Error => tracing::debug!(message = %message, "error toast"),
        }

        // Nobody listening is fine: toasts are transient.
        let _ = self.sender.send(Toast {
            kind,
            message,
            created_at: Utc::now(),
        });
    }
}

/// Collect every toast currently queued on a receiver
pub fn drain(receiver: &mut broadcast::Receiver<Toast>) -> Vec<Toast> {
    let mut toasts = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(toast) => toasts.push(toast),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!("Dropped {} toasts", skipped);
            }
            Err(_) => break,
        }
    }
    toasts
}
