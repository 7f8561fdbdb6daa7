//! Core functionality for the SafeSpace companion.
//!
//! This crate provides the error taxonomy, notification sinks, the deferred
//! work timeline, runtime configuration and logging used across the
//! SafeSpace workspace.

pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod timeline;
pub mod types;

pub use config::{ConfigError, RuntimeConfig};
pub use error::CoreError;
pub use notify::{Notification, NotificationSink, NullSink, RecordingSink, TracingSink};
pub use timeline::Timeline;
pub use types::{current_timestamp_ms, Location, TimestampMs};
