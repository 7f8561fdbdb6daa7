//! End-to-end scenarios for the SafeSpace companion
//!
//! This suite drives the host [`safespace_node::App`] the way the binary
//! does:
//! - Startup with the mock and failing profile providers
//! - Full panic-mode sessions including timed follow-ups
//! - Telemetry ticks feeding threats and assistant replies
//! - Settings persistence across restarts
//! - Chat, fake calls, route planning and logout

pub mod test_utils;

#[cfg(test)]
mod companion_tools_tests;

#[cfg(test)]
mod emergency_flow_tests;

#[cfg(test)]
mod startup_tests;

#[cfg(test)]
mod telemetry_flow_tests;
