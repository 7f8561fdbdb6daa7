//! Situational advisories derived from the current telemetry.

use serde::{Deserialize, Serialize};

use crate::state::{StressLevel, TelemetryState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatKind {
    Time,
    Stress,
    Battery,
    Safety,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreatLevel {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Threat {
    pub kind: ThreatKind,
    pub level: ThreatLevel,
    pub message: &'static str,
}

/// Collect the advisories that apply at local `hour`.
pub fn check_for_threats(hour: u32, telemetry: &TelemetryState) -> Vec<Threat> {
    let mut threats = Vec::new();

    if hour >= 22 || hour <= 5 {
        threats.push(Threat {
            kind: ThreatKind::Time,
            level: ThreatLevel::Medium,
            message: "Late night hours - increased vigilance recommended",
        });
    }

    if telemetry.stress_level() == StressLevel::High {
        threats.push(Threat {
            kind: ThreatKind::Stress,
            level: ThreatLevel::High,
            message: "High stress detected - consider using calming techniques",
        });
    }

    if telemetry.battery_percent() < 20 {
        threats.push(Threat {
            kind: ThreatKind::Battery,
            level: ThreatLevel::Medium,
            message: "Low device battery - charge soon",
        });
    }

    if telemetry.safety_score() < 50 {
        threats.push(Threat {
            kind: ThreatKind::Safety,
            level: ThreatLevel::High,
            message: "Low safety score - extra precautions advised",
        });
    }

    threats
}
