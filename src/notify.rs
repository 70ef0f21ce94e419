//! Notifications
//!
//! Fire-and-forget reporting of state-change outcomes to whatever presents
//! them to a user (toasts, a terminal, logs).

use std::{cell::RefCell, fmt, rc::Rc};

use tracing::{error, info};

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The requested change happened.
    Success,

    /// Nothing went wrong but the user should know something.
    Info,

    /// The change could not be completed as asked.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        })
    }
}

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Human readable message
    pub message: String,

    /// Presentation severity
    pub severity: Severity,
}

/// Receives notifications. Implementations must not block and must swallow
/// their own failures.
pub trait NotificationSink {
    /// Deliver a message.
    fn notify(&self, message: &str, severity: Severity);
}

impl<N: NotificationSink + ?Sized> NotificationSink for &N {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity);
    }
}

impl<N: NotificationSink + ?Sized> NotificationSink for Rc<N> {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity);
    }
}

/// Delivers to both sinks, first then second.
impl<A: NotificationSink, B: NotificationSink> NotificationSink for (A, B) {
    fn notify(&self, message: &str, severity: Severity) {
        self.0.notify(message, severity);
        self.1.notify(message, severity);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn notify(&self, _message: &str, _severity: Severity) {}
}

/// Emits notifications as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success | Severity::Info => info!(%severity, "{message}"),
            Severity::Error => error!(%severity, "{message}"),
        }
    }
}

/// Buffers notifications until a presenter drains them.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: RefCell<Vec<Notification>>,
}

impl NotificationQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.pending.take()
    }

    /// Copy of the pending notifications without removing them.
    pub fn pending(&self) -> Vec<Notification> {
        self.pending.borrow().clone()
    }

    /// Number of pending notifications.
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Check if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl NotificationSink for NotificationQueue {
    fn notify(&self, message: &str, severity: Severity) {
        // A re-entrant notify while a drain holds the borrow would panic; drop instead.
        if let Ok(mut pending) = self.pending.try_borrow_mut() {
            pending.push(Notification {
                message: message.to_string(),
                severity,
            });
        }
    }
}
