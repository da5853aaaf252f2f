//! Transient user notifications.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Operation succeeded.
    Success,
    /// Informational.
    Info,
    /// Something needs attention.
    Warning,
    /// Something failed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// A message shown to the user, optionally with a list of detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub severity: Severity,
    /// First line.
    pub headline: String,
    /// Detail lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
}

impl Notification {
    /// An error notification.
    pub fn error(headline: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            headline: headline.into(),
            lines: Vec::new(),
        }
    }

    /// Attach detail lines.
    #[must_use]
    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline)?;
        for line in &self.lines {
            write!(f, "\n - {line}")?;
        }
        Ok(())
    }
}

/// A sink for notifications. Delivery is fire-and-forget.
pub trait Notifier: Send + Sync {
    /// Deliver a notification.
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far.
    pub fn received(&self) -> Vec<Notification> {
        self.received.lock().clone()
    }

    /// Take and clear the received notifications.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received.lock().push(notification);
    }
}

/// Emits notifications as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let lines = notification.lines.join("; ");
        match notification.severity {
            Severity::Error => error!(headline = %notification.headline, %lines, "notification"),
            Severity::Warning => warn!(headline = %notification.headline, %lines, "notification"),
            Severity::Success | Severity::Info => {
                info!(headline = %notification.headline, %lines, "notification");
            }
        }
    }
}
