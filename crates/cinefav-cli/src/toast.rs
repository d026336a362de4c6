use std::time::Duration;

use tokio::time::Instant;

use cinefav_runtime::NotificationKind;

/// Kind of toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl From<NotificationKind> for ToastKind {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Added => Self::Success,
            NotificationKind::Removed => Self::Error,
        }
    }
}

/// A single toast notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    expires_at: Instant,
}

impl Toast {
    /// One-line rendering with a kind marker.
    pub fn render(&self) -> String {
        let marker = match self.kind {
            ToastKind::Success => "✓",
            ToastKind::Error => "✗",
        };
        format!("[{marker}] {}", self.message)
    }
}

/// Stack of live toasts, each dismissed after a fixed delay.
#[derive(Debug)]
pub struct Toasts {
    ttl: Duration,
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.push_at(message, kind, Instant::now());
    }

    fn push_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.items.push(Toast {
            message: message.into(),
            kind,
            expires_at: now + self.ttl,
        });
    }

    /// Drop expired toasts. Returns whether any were removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.expires_at > now);
        self.items.len() != before
    }

    /// When the oldest live toast goes away.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.items.iter().map(|t| t.expires_at).min()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
