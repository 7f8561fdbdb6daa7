//! Wearable telemetry and safety score state.
//!
//! All mutation goes through the step methods below so that the bounds hold
//! after every call: heart rate stays in [55, 130], battery in [0, 100] and
//! the safety score in [30, 98]. Stress is never stored; it is derived from
//! the heart rate on read.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const HEART_RATE_MIN: u8 = 55;
pub const HEART_RATE_MAX: u8 = 130;
pub const SAFETY_SCORE_MIN: u8 = 30;
pub const SAFETY_SCORE_MAX: u8 = 98;
/// Battery value at which the "low" warning fires
pub const BATTERY_LOW: u8 = 15;
/// Battery value at which the "critical" warning fires
pub const BATTERY_CRITICAL: u8 = 5;

/// Stress level derived from heart rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

impl StressLevel {
    /// >100 bpm is High, >85 bpm is Medium, anything else Low.
    pub fn from_heart_rate(bpm: u8) -> Self {
        if bpm > 100 {
            StressLevel::High
        } else if bpm > 85 {
            StressLevel::Medium
        } else {
            StressLevel::Low
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            StressLevel::High => "😰",
            StressLevel::Medium => "😐",
            StressLevel::Low => "😌",
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StressLevel::Low => "Low",
            StressLevel::Medium => "Medium",
            StressLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// Display band for the safety score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Safe,
    Caution,
    Danger,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score < 60 {
            ScoreBand::Danger
        } else if score < 80 {
            ScoreBand::Caution
        } else {
            ScoreBand::Safe
        }
    }

    /// Dashboard colour for the band
    pub fn color(&self) -> &'static str {
        match self {
            ScoreBand::Safe => "#06d6a0",
            ScoreBand::Caution => "#ffd166",
            ScoreBand::Danger => "#ff6b6b",
        }
    }
}

/// Battery warning raised when the charge lands on a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryAlert {
    Low,
    Critical,
}

impl BatteryAlert {
    pub fn message(&self) -> &'static str {
        match self {
            BatteryAlert::Low => "⚠️ Your SafeWatch Pro battery is low. Please charge soon.",
            BatteryAlert::Critical => "🔋 Critical: SafeWatch Pro battery very low!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryState {
    heart_rate_bpm: u8,
    battery_percent: u8,
    connected: bool,
    safety_score: u8,
}

impl TelemetryState {
    /// Build a state, clamping every value into its domain.
    pub fn new(heart_rate_bpm: u8, battery_percent: u8, connected: bool, safety_score: u8) -> Self {
        Self {
            heart_rate_bpm: heart_rate_bpm.clamp(HEART_RATE_MIN, HEART_RATE_MAX),
            battery_percent: battery_percent.min(100),
            connected,
            safety_score: safety_score.clamp(SAFETY_SCORE_MIN, SAFETY_SCORE_MAX),
        }
    }

    pub fn heart_rate_bpm(&self) -> u8 {
        self.heart_rate_bpm
    }

    pub fn stress_level(&self) -> StressLevel {
        StressLevel::from_heart_rate(self.heart_rate_bpm)
    }

    pub fn battery_percent(&self) -> u8 {
        self.battery_percent
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn safety_score(&self) -> u8 {
        self.safety_score
    }

    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.safety_score)
    }

    /// Apply a signed heart-rate delta, clamped to [55, 130].
    pub fn step_heart_rate(&mut self, delta: i32) {
        let next = (self.heart_rate_bpm as i32 + delta)
            .clamp(HEART_RATE_MIN as i32, HEART_RATE_MAX as i32);
        self.heart_rate_bpm = next as u8;
    }

    /// Drain one percent when `drain` is set.
    ///
    /// A warning is returned only when the charge changes onto a threshold,
    /// so resting on 15 or 5 across ticks does not repeat it.
    pub fn drain_battery(&mut self, drain: bool) -> Option<BatteryAlert> {
        if !drain || self.battery_percent == 0 {
            return None;
        }
        self.battery_percent -= 1;
        match self.battery_percent {
            BATTERY_LOW => Some(BatteryAlert::Low),
            BATTERY_CRITICAL => Some(BatteryAlert::Critical),
            _ => None,
        }
    }

    /// External recharge event
    pub fn recharge(&mut self, battery_percent: u8) {
        self.battery_percent = battery_percent.min(100);
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Apply a proposed score delta.
    ///
    /// The unclamped delta must exceed 1 in magnitude for the new score to be
    /// committed; the committed value is clamped to [30, 98]. Returns the new
    /// score when committed.
    pub fn apply_score_delta(&mut self, delta: i32) -> Option<u8> {
        if delta.abs() <= 1 {
            return None;
        }
        let next = (self.safety_score as i32 + delta)
            .clamp(SAFETY_SCORE_MIN as i32, SAFETY_SCORE_MAX as i32);
        self.safety_score = next as u8;
        Some(self.safety_score)
    }
}

impl Default for TelemetryState {
    fn default() -> Self {
        Self::new(72, 84, true, 87)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stress_examples() {
        assert_eq!(StressLevel::from_heart_rate(105), StressLevel::High);
        assert_eq!(StressLevel::from_heart_rate(90), StressLevel::Medium);
        assert_eq!(StressLevel::from_heart_rate(70), StressLevel::Low);
    }

    #[test]
    fn test_stress_boundaries() {
        assert_eq!(StressLevel::from_heart_rate(100), StressLevel::Medium);
        assert_eq!(StressLevel::from_heart_rate(101), StressLevel::High);
        assert_eq!(StressLevel::from_heart_rate(85), StressLevel::Low);
        assert_eq!(StressLevel::from_heart_rate(86), StressLevel::Medium);
    }

    #[test]
    fn test_new_clamps_inputs() {
        let state = TelemetryState::new(0, 250, false, 10);
        assert_eq!(state.heart_rate_bpm(), HEART_RATE_MIN);
        assert_eq!(state.battery_percent(), 100);
        assert_eq!(state.safety_score(), SAFETY_SCORE_MIN);
    }

    #[test]
    fn test_heart_rate_clamped() {
        let mut state = TelemetryState::new(128, 50, true, 80);
        state.step_heart_rate(4);
        assert_eq!(state.heart_rate_bpm(), 130);
        assert_eq!(state.stress_level(), StressLevel::High);

        let mut state = TelemetryState::new(57, 50, true, 80);
        state.step_heart_rate(-4);
        assert_eq!(state.heart_rate_bpm(), 55);
        assert_eq!(state.stress_level(), StressLevel::Low);
    }

    #[test]
    fn test_battery_warning_once_per_crossing() {
        // 17 -> 16 -> 15 -> 15 -> 14
        let mut state = TelemetryState::new(72, 17, true, 80);
        let alerts: Vec<_> = [true, true, false, true]
            .into_iter()
            .map(|drain| state.drain_battery(drain))
            .collect();

        assert_eq!(alerts, vec![None, Some(BatteryAlert::Low), None, None]);
        assert_eq!(state.battery_percent(), 14);
    }

    #[test]
    fn test_battery_critical_and_floor() {
        let mut state = TelemetryState::new(72, 6, true, 80);
        assert_eq!(state.drain_battery(true), Some(BatteryAlert::Critical));
        for _ in 0..10 {
            state.drain_battery(true);
        }
        assert_eq!(state.battery_percent(), 0);
        assert_eq!(state.drain_battery(true), None);
    }

    #[test]
    fn test_recharge_allows_new_crossing() {
        let mut state = TelemetryState::new(72, 16, true, 80);
        assert_eq!(state.drain_battery(true), Some(BatteryAlert::Low));
        state.recharge(16);
        assert_eq!(state.drain_battery(true), Some(BatteryAlert::Low));
    }

    #[test]
    fn test_small_score_jitter_suppressed() {
        let mut state = TelemetryState::new(72, 50, true, 80);
        assert_eq!(state.apply_score_delta(1), None);
        assert_eq!(state.apply_score_delta(-1), None);
        assert_eq!(state.safety_score(), 80);
        assert_eq!(state.apply_score_delta(-2), Some(78));
    }

    #[test]
    fn test_score_clamped_on_commit() {
        let mut state = TelemetryState::new(72, 50, true, 97);
        assert_eq!(state.apply_score_delta(6), Some(98));

        let mut state = TelemetryState::new(72, 50, true, 31);
        assert_eq!(state.apply_score_delta(-16), Some(30));
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(87), ScoreBand::Safe);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Safe);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::Caution);
        assert_eq!(ScoreBand::from_score(59), ScoreBand::Danger);
    }
}
