//! Randomised wearable and safety-score simulation.
//!
//! The simulator owns a [`TelemetryState`] and an injected random source.
//! Production hosts seed it from entropy; tests pass a seeded [`StdRng`] so
//! the walk is reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use safespace_core::NotificationSink;
use tracing::debug;

use crate::state::{StressLevel, TelemetryState};

/// Chance of losing one percent of battery per tick
pub const BATTERY_DRAIN_PROBABILITY: f64 = 0.3;
/// Scores below this raise an advisory after a committed update
pub const LOW_SCORE_ADVISORY: u8 = 50;

const LOW_SCORE_MESSAGE: &str = "⚠️ Safety score is low. Consider extra precautions.";

/// Breakdown of one proposed score change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreFactors {
    pub time_of_day: i32,
    pub stress: i32,
    pub location_sharing: i32,
}

impl ScoreFactors {
    pub fn total(&self) -> i32 {
        self.time_of_day + self.stress + self.location_sharing
    }
}

pub struct TelemetrySimulator<R = StdRng> {
    state: TelemetryState,
    rng: R,
}

impl TelemetrySimulator<StdRng> {
    pub fn seeded(state: TelemetryState, seed: u64) -> Self {
        Self::with_rng(state, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(state: TelemetryState) -> Self {
        Self::with_rng(state, StdRng::from_entropy())
    }
}

impl<R: Rng> TelemetrySimulator<R> {
    pub fn with_rng(state: TelemetryState, rng: R) -> Self {
        Self { state, rng }
    }

    pub fn state(&self) -> &TelemetryState {
        &self.state
    }

    /// External recharge event
    pub fn recharge(&mut self, battery_percent: u8) {
        self.state.recharge(battery_percent);
    }

    /// Advance the wearable vitals by one interval.
    ///
    /// Does nothing while the wearable is disconnected.
    pub fn tick<S: NotificationSink>(&mut self, sink: &mut S) {
        if !self.state.connected() {
            debug!("wearable disconnected, skipping vitals tick");
            return;
        }

        let delta = self.rng.gen_range(-4..=4);
        self.state.step_heart_rate(delta);

        let drain = self.rng.gen_bool(BATTERY_DRAIN_PROBABILITY);
        let alert = self.state.drain_battery(drain);

        debug!(
            heart_rate_bpm = self.state.heart_rate_bpm(),
            stress = %self.state.stress_level(),
            battery_percent = self.state.battery_percent(),
            "vitals tick"
        );

        if let Some(alert) = alert {
            sink.show(alert.message());
        }
    }

    /// Draw the score adjustments for the given local hour.
    ///
    /// Stress only counts while the wearable is connected; a disconnected
    /// device reports no stress reading.
    pub fn draw_score_factors(&mut self, hour: u32, location_sharing: bool) -> ScoreFactors {
        let time_of_day = if hour > 22 || hour < 5 {
            -self.rng.gen_range(2..=9)
        } else if hour > 6 && hour < 18 {
            self.rng.gen_range(1..=4)
        } else {
            0
        };

        let stress = match self.state.stress_level() {
            _ if !self.state.connected() => 0,
            StressLevel::High => -self.rng.gen_range(3..=7),
            StressLevel::Low => self.rng.gen_range(1..=3),
            StressLevel::Medium => 0,
        };

        ScoreFactors {
            time_of_day,
            stress,
            location_sharing: if location_sharing { 2 } else { 0 },
        }
    }

    /// Re-evaluate the safety score.
    ///
    /// Returns the committed score when the change was large enough to be
    /// published.
    pub fn update_safety_score<S: NotificationSink>(
        &mut self,
        hour: u32,
        location_sharing: bool,
        sink: &mut S,
    ) -> Option<u8> {
        let factors = self.draw_score_factors(hour, location_sharing);
        let committed = self.state.apply_score_delta(factors.total());

        match committed {
            Some(score) => {
                debug!(score, delta = factors.total(), "safety score updated");
                if score < LOW_SCORE_ADVISORY {
                    sink.show(LOW_SCORE_MESSAGE);
                }
            }
            None => debug!(delta = factors.total(), "safety score jitter suppressed"),
        }

        committed
    }
}
