//! Panic-mode state
//!
//! The mode is derived from `activated_at`, so "Active iff an activation time
//! is present" holds by construction.

use safespace_core::TimestampMs;
use serde::{Deserialize, Serialize};

/// Panic mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EmergencyMode {
    /// Normal operation
    Inactive,
    /// Ongoing self-reported emergency
    Active,
}

/// Outcome of a state-machine operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Activated,
    Deactivated,
    AutoDeactivated,
    Unchanged,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmergencyState {
    activated_at: Option<TimestampMs>,
    is_recording: bool,
    strobe_active: bool,
}

impl EmergencyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EmergencyMode {
        if self.activated_at.is_some() {
            EmergencyMode::Active
        } else {
            EmergencyMode::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        self.activated_at.is_some()
    }

    pub fn activated_at(&self) -> Option<TimestampMs> {
        self.activated_at
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn strobe_active(&self) -> bool {
        self.strobe_active
    }

    /// Milliseconds spent in panic mode at `now_ms`
    pub fn elapsed_ms(&self, now_ms: TimestampMs) -> Option<u64> {
        self.activated_at.map(|at| now_ms.saturating_sub(at))
    }

    pub(crate) fn enter(&mut self, now_ms: TimestampMs) {
        self.activated_at = Some(now_ms);
    }

    pub(crate) fn leave(&mut self) {
        self.activated_at = None;
    }

    pub(crate) fn set_recording(&mut self, recording: bool) {
        self.is_recording = recording;
    }

    pub(crate) fn set_strobe(&mut self, active: bool) {
        self.strobe_active = active;
    }
}
