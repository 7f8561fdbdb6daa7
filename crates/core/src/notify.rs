//! User-facing notifications.
//!
//! The core never renders anything itself. It hands `(message, duration)`
//! pairs to a [`NotificationSink`]; display and auto-dismiss timing belong to
//! the sink, and nothing flows back.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Display duration used when a caller does not pick one.
pub const DEFAULT_DURATION_MS: u64 = 3_000;

/// A single toast-style message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub duration_ms: u64,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration_ms: DEFAULT_DURATION_MS,
        }
    }

    pub fn with_duration(message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            message: message.into(),
            duration_ms,
        }
    }
}

/// Receiver of notifications.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);

    fn show(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Notification::new(message));
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Sink for headless hosts: every notification is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _notification: Notification) {}
}

/// Sink that renders notifications through `tracing`.
#[derive(Debug, Default, Clone)]
pub struct TracingSink {
    emitted: u64,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications rendered so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl NotificationSink for TracingSink {
    fn notify(&mut self, notification: Notification) {
        self.emitted += 1;
        info!(
            target: "safespace::notification",
            duration_ms = notification.duration_ms,
            "{}",
            notification.message
        );
    }
}

/// Sink that keeps every notification, for tests and replay.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub notifications: Vec<Notification>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.notifications.iter().map(|n| n.message.as_str()).collect()
    }

    /// Count of notifications whose message contains `needle`
    pub fn count_containing(&self, needle: &str) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.message.contains(needle))
            .count()
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_duration() {
        let n = Notification::new("📍 Location shared");
        assert_eq!(n.duration_ms, 3_000);
    }

    #[test]
    fn test_recording_sink_through_reborrow() {
        let mut sink = RecordingSink::new();
        {
            let borrowed = &mut sink;
            borrowed.show("first");
            borrowed.notify(Notification::with_duration("second", 5_000));
        }
        assert_eq!(sink.messages(), vec!["first", "second"]);
        assert_eq!(sink.notifications[1].duration_ms, 5_000);
        assert_eq!(sink.count_containing("sec"), 1);
    }

    #[test]
    fn test_null_and_tracing_sinks() {
        let mut null = NullSink;
        null.show("dropped");

        let mut tracing_sink = TracingSink::new();
        tracing_sink.show("rendered");
        assert_eq!(tracing_sink.emitted(), 1);
    }
}
