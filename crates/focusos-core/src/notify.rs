//! User-facing signals raised by the engine.
//!
//! Delivery is fire-and-forget; a sink never reports back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub description: String,
}

impl Notification {
    pub fn success(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
            description: description.into(),
        }
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Sink that writes notifications to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::info!(
            severity = ?notification.severity,
            description = %notification.description,
            "{}",
            notification.message
        );
    }
}
