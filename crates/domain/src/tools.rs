//! Fake calls and safe-route planning.
//!
//! Both finish later: the host schedules the follow-up returned here and
//! resolves it once the delay has passed.

use std::fmt;

use rand::Rng;
use serde::Serialize;

/// Ringing before the fake call screen shows
pub const FAKE_CALL_RING_MS: u64 = 1_000;
/// Simulated route calculation time
pub const ROUTE_CALCULATION_MS: u64 = 2_000;

/// Preset callers for a fake incoming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FakeCaller {
    Mom,
    Boss,
    Emergency,
}

impl FakeCaller {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mom" => Some(Self::Mom),
            "boss" | "work" => Some(Self::Boss),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }

    /// Name shown on the incoming call
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mom => "Mom",
            Self::Boss => "Work",
            Self::Emergency => "Emergency Contact",
        }
    }

    pub fn ringtone(&self) -> &'static str {
        match self {
            Self::Mom => "family_ringtone.mp3",
            Self::Boss => "professional_ringtone.mp3",
            Self::Emergency => "urgent_ringtone.mp3",
        }
    }

    pub fn incoming_notice(&self) -> String {
        format!("📞 Incoming call from {} (simulated)", self.display_name())
    }

    pub fn active_notice(&self) -> String {
        format!("📞 Fake call from {} active", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteKind {
    Safest,
    Fastest,
    WellLit,
}

impl RouteKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "safest" => Some(Self::Safest),
            "fastest" => Some(Self::Fastest),
            "well-lit" | "welllit" | "lit" => Some(Self::WellLit),
            _ => None,
        }
    }

    pub fn calculating_notice(&self) -> &'static str {
        match self {
            Self::Safest => "🗺️ Calculating safest route based on community reports and well-lit paths...",
            Self::Fastest => "🗺️ Calculating fastest route with safety considerations...",
            Self::WellLit => "🗺️ Finding route with best lighting and visibility...",
        }
    }
}

/// Result of a route calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteEstimate {
    pub minutes: u8,
    /// Safety rating in tenths, 70..=100 for 7.0..=10.0
    pub rating_tenths: u8,
}

impl RouteEstimate {
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        Self {
            minutes: rng.gen_range(5..=19),
            rating_tenths: rng.gen_range(70..=100),
        }
    }

    pub fn notice(&self) -> String {
        format!(
            "✅ Route calculated! {} min, Safety: {}/10",
            self.minutes,
            SafetyRating(self.rating_tenths)
        )
    }
}

struct SafetyRating(u8);

impl fmt::Display for SafetyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}
