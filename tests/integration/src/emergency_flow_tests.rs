//! Panic-mode sessions driven through the host command surface.

use crate::test_utils::{Harness, T0};
use safespace_domain::{fallback_profile, MemorySettingsStore};
use safespace_node::Event;

#[test]
fn test_full_panic_session_timeline() {
    let mut h = Harness::guest();

    h.input("panic");
    assert_eq!(
        h.messages(),
        vec![
            "📍 Location shared: Safe Zone (40.7128, -74.0060)",
            "📱 Sending alerts to emergency contacts...",
            "📱 Alert sent to Mom",
            "🚨 Emergency mode activated! Help is on the way.",
        ]
    );

    h.advance_to(T0 + 999);
    assert_eq!(h.count("Alert sent to"), 1);
    h.advance_to(T0 + 1_000);
    assert_eq!(h.count("Alert sent to Sister"), 1);
    h.advance_to(T0 + 2_000);
    assert_eq!(h.count("Alert sent to Best Friend"), 1);
    h.advance_to(T0 + 2_999);
    assert_eq!(h.count("services have been notified"), 0);
    h.advance_to(T0 + 3_000);
    assert_eq!(h.count("services have been notified"), 1);
    h.advance_to(T0 + 5_000);
    assert_eq!(h.count("contacts have been notified"), 1);

    let tail: Vec<String> = h.messages().into_iter().skip(4).collect();
    assert_eq!(
        tail,
        vec![
            "📱 Alert sent to Sister",
            "📱 Alert sent to Best Friend",
            "👮 Emergency services have been notified",
            "📱 Emergency contacts have been notified",
        ]
    );
}

#[test]
fn test_deactivate_before_follow_ups_still_delivers_them() {
    let mut h = Harness::guest();
    h.input("panic");
    h.advance_by(500);
    h.input("deactivate");
    assert!(!h.app.emergency().state().is_active());

    h.advance_to(T0 + 6_000);
    assert_eq!(h.count("Alert sent to"), 3);
    assert_eq!(h.count("have been notified"), 2);
    assert_eq!(h.count("Emergency mode deactivated"), 1);
}

#[test]
fn test_recording_and_strobe_during_panic() {
    let store = MemorySettingsStore::with_record(r#"{"recordingEnabled":true}"#);
    let mut h = Harness::new(fallback_profile(), store);

    h.input("panic");
    assert!(h.app.emergency().state().is_recording());
    h.input("record");
    assert_eq!(h.count("Audio recording started"), 1);

    h.input("strobe");
    h.advance_by(30_000);
    assert_eq!(h.count("Recording continues"), 1);
    assert!(h.app.emergency().state().strobe_active());

    h.advance_by(30_000);
    assert!(!h.app.emergency().state().strobe_active());
    assert_eq!(h.count("Strobe light deactivated"), 1);

    h.input("deactivate");
    assert!(!h.app.emergency().state().is_recording());
    assert_eq!(h.count("Audio recording stopped and saved"), 1);
    // strobe already expired, so no second strobe notice
    assert_eq!(h.count("Strobe light deactivated"), 1);
}

#[test]
fn test_auto_timeout_through_periodic_checks() {
    let mut h = Harness::guest();
    h.input("panic");

    let mut checks = 0;
    while h.app.emergency().state().is_active() {
        h.advance_by(5_000);
        h.event(Event::TimeoutCheck);
        checks += 1;
        assert!(checks <= 361, "panic mode never timed out");
    }

    // 1_800_000 is not enough; the first check past it fires
    assert_eq!(h.now_ms - T0, 1_805_000);
    assert_eq!(
        h.count("⏰ Emergency mode auto-deactivated after 30 minutes of inactivity."),
        1
    );
}

#[test]
fn test_emergency_flag_style_start_and_restart() {
    let mut h = Harness::guest();
    h.input("panic");
    h.input("panic yes");
    assert!(!h.app.emergency().state().is_active());

    h.clear();
    h.advance_by(10_000);
    h.input("panic");
    assert!(h.app.emergency().state().is_active());
    assert_eq!(h.app.emergency().state().activated_at(), Some(T0 + 10_000));
    assert_eq!(h.count("Alert sent to Mom"), 1);
}

#[test]
fn test_contact_management_round_trip() {
    let mut h = Harness::guest();
    h.input("add-contact Aunt May +1 555 0199");
    assert_eq!(h.app.emergency().contacts().len(), 4);

    h.input("panic");
    h.advance_by(3_000);
    assert_eq!(h.count("Alert sent to Aunt May"), 1);

    let id = h
        .app
        .emergency()
        .contacts()
        .find_by_name("aunt")
        .map(|c| c.id.clone())
        .unwrap();
    h.input(&format!("remove-contact {id}"));
    assert_eq!(h.app.emergency().contacts().len(), 3);
    assert_eq!(h.count("🗑️ Aunt May removed from emergency contacts"), 1);

    let response = h.input(&format!("remove-contact {id}"));
    assert!(response.lines[0].contains("no contact"));
}

#[test]
fn test_calls_and_messages_complete_later() {
    let mut h = Harness::guest();
    h.input("call sister");
    h.input("message mom");
    h.input("call-emergency");
    h.input("call uncle");

    h.advance_by(2_000);
    assert_eq!(
        h.messages(),
        vec![
            "📞 Calling Sister...",
            "💬 Messaging Mom...",
            "📞 Calling emergency services...",
            "❌ Contact not found",
            "💬 Message sent to Mom",
            "📞 Connected to Sister",
            "📞 Connected to emergency services",
        ]
    );
}
