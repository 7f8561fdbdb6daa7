//! Log output for the companion host.
//!
//! Panic-mode transitions, fallbacks and telemetry ticks are all emitted with
//! `tracing`; this module installs the subscriber that prints them. The
//! filter comes from `RUST_LOG` and defaults to [`DEFAULT_FILTER`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Human-readable lines for an operator watching the terminal.
///
/// # Example
/// ```no_run
/// use safespace_core::logging;
///
/// logging::init();
/// tracing::info!(contacts = 3, "panic mode activated");
/// ```
pub fn init() {
    init_with(false);
}

/// One JSON object per event, for piping the node's output elsewhere.
///
/// # Example
/// ```no_run
/// use safespace_core::logging;
///
/// logging::init_json();
/// tracing::warn!(elapsed_ms = 1_800_001u64, "panic mode timed out");
/// ```
pub fn init_json() {
    init_with(true);
}

/// Install the subscriber picked by `json_logs` in the runtime config.
///
/// Only the first call in a process takes effect. Returns whether this call
/// installed the subscriber.
pub fn init_with(json: bool) -> bool {
    let registry = tracing_subscriber::registry().with(env_filter());
    let installed = if json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.is_ok()
}
