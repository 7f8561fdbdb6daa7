//! SafeSpace Telemetry
//!
//! Simulated wearable vitals (heart rate, derived stress, battery) and the
//! bounded safety-score random walk.

pub mod simulator;
pub mod state;
pub mod threats;

pub use simulator::{ScoreFactors, TelemetrySimulator};
pub use state::{BatteryAlert, ScoreBand, StressLevel, TelemetryState};
pub use threats::{check_for_threats, Threat, ThreatKind, ThreatLevel};
