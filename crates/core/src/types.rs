//! Shared value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub type TimestampMs = u64;

/// Get current timestamp in milliseconds
pub fn current_timestamp_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Location snapshot supplied by the location provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    /// Human-readable area label
    pub area_label: String,
}

impl Location {
    /// Create a location snapshot
    pub fn new(lat: f64, lng: f64, area_label: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            area_label: area_label.into(),
        }
    }

    /// Coordinates rendered to 4 decimal places, e.g. `(40.7128, -74.0060)`.
    pub fn coordinates(&self) -> String {
        format!("({:.4}, {:.4})", self.lat, self.lng)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(40.7128, -74.0060, "Safe Zone")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.area_label, self.coordinates())
    }
}
