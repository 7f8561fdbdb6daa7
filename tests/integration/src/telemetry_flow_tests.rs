//! Telemetry ticks feeding threats, status and the assistant.

use crate::test_utils::{seeded_config, Harness};
use safespace_domain::{MemorySettingsStore, ProfileContact, UserProfile, WearableProfile};
use safespace_node::Event;
use safespace_telemetry::{StressLevel, TelemetryState};

fn connected_profile(heart_rate: u8, battery: u8, score: u8) -> UserProfile {
    UserProfile {
        user_name: "Sarah Johnson".to_string(),
        user_status: "Premium User".to_string(),
        safety_score: score,
        wearable: WearableProfile {
            connected: true,
            battery,
            heart_rate,
            stress_level: "Low".to_string(),
        },
        emergency_contacts: vec![ProfileContact {
            name: "Mom".to_string(),
            number: "+1 234 567 8901".to_string(),
            avatar: "👩".to_string(),
        }],
    }
}

fn assert_in_bounds(state: &TelemetryState) {
    assert!((55..=130).contains(&state.heart_rate_bpm()));
    assert!((30..=98).contains(&state.safety_score()));
    assert_eq!(
        state.stress_level(),
        StressLevel::from_heart_rate(state.heart_rate_bpm())
    );
}

#[test]
fn test_long_run_stays_in_bounds() {
    for seed in 0..8 {
        let mut h = Harness::with_config(
            connected_profile(72, 100, 87),
            MemorySettingsStore::new(),
            seeded_config(seed),
        );
        for step in 0..400 {
            h.hour = step % 24;
            h.advance_by(15_000);
            h.event(Event::WearableTick);
            if step % 2 == 0 {
                h.event(Event::ScoreTick);
            }
            assert_in_bounds(h.app.telemetry().state());
        }
    }
}

#[test]
fn test_battery_warnings_fire_once_per_threshold() {
    let mut h = Harness::new(connected_profile(72, 20, 87), MemorySettingsStore::new());
    for _ in 0..500 {
        h.event(Event::WearableTick);
    }
    assert_eq!(h.app.telemetry().state().battery_percent(), 0);
    assert_eq!(h.count("battery is low"), 1);
    assert_eq!(h.count("battery very low"), 1);
}

#[test]
fn test_threats_reflect_current_state() {
    let mut h = Harness::new(connected_profile(120, 10, 40), MemorySettingsStore::new());
    h.hour = 23;
    let response = h.input("threats");
    assert_eq!(response.lines.len(), 4);
    assert!(response.lines[0].contains("Late night hours"));
    assert!(response.lines[3].contains("Low safety score"));

    let mut calm = Harness::new(connected_profile(72, 84, 87), MemorySettingsStore::new());
    calm.hour = 12;
    assert_eq!(calm.input("threats").lines, vec!["No active threats."]);
}

#[test]
fn test_assistant_sees_live_telemetry() {
    let mut h = Harness::new(connected_profile(110, 84, 87), MemorySettingsStore::new());
    let reply = h.input("chat I'm worried");
    assert!(reply.lines[0].contains("stress level is showing as High"));

    h.input("toggle location");
    let reply = h.input("chat where am I");
    assert!(reply.lines[0].contains("sharing is disabled"));

    let reply = h.input("quick 4");
    assert!(reply.lines[0].contains("safety score is 87%"));
    assert_eq!(h.app.assistant().log().len(), 7);
}

#[test]
fn test_low_score_advisory_at_night() {
    let mut h = Harness::new(connected_profile(125, 84, 52), MemorySettingsStore::new());
    h.hour = 2;
    h.input("toggle location");
    for _ in 0..20 {
        h.event(Event::ScoreTick);
    }
    assert_eq!(h.app.telemetry().state().safety_score(), 30);
    assert!(h.count("Safety score is low") >= 1);
}
