//! Chat, fake calls, route planning and logout through the host.

use crate::test_utils::{Harness, T0};
use safespace_node::Event;

#[test]
fn test_chat_reply_does_not_leave_unread_badge() {
    let mut h = Harness::guest();
    h.input("chat hello there");

    let status = h.input("status");
    assert!(status.lines[0].ends_with("unread 0"));
    assert_eq!(h.app.assistant().unread(), 0);
}

#[test]
fn test_closed_chat_collects_panic_updates() {
    let mut h = Harness::guest();
    h.input("chat-open");
    h.input("chat-close");

    h.input("panic");
    h.advance_by(5_000);
    h.input("deactivate");
    assert_eq!(h.app.assistant().unread(), 3);

    let transcript = h.input("chat-open");
    assert_eq!(
        &transcript.lines[1..],
        [
            "🤖 🚨 Emergency services have been alerted and are being dispatched to your location.",
            "🤖 📱 Your emergency contacts have been notified and are receiving your location updates.",
            "🤖 🟢 Emergency mode has been deactivated. I hope you're safe now.",
        ]
    );
    assert!(h.input("status").lines[0].ends_with("unread 0"));
}

#[test]
fn test_auto_timeout_posts_deactivation_to_chat() {
    let mut h = Harness::guest();
    h.input("panic");
    h.advance_by(1_800_001);
    h.event(Event::TimeoutCheck);

    let last = h.app.assistant().log().last().map(|m| m.content.clone());
    assert_eq!(
        last.as_deref(),
        Some("🟢 Emergency mode has been deactivated. I hope you're safe now.")
    );
}

#[test]
fn test_fake_call_rings_then_connects() {
    let mut h = Harness::guest();
    h.input("fake-call boss");
    assert_eq!(h.messages(), vec!["📞 Incoming call from Work (simulated)"]);

    h.advance_to(T0 + 999);
    assert_eq!(h.count("Fake call from"), 0);
    h.advance_to(T0 + 1_000);
    assert_eq!(h.messages()[1], "📞 Fake call from Work active");

    let response = h.input("fake-call dad");
    assert!(response.lines[0].contains("mom, boss, emergency"));
}

#[test]
fn test_route_result_arrives_after_calculation() {
    let mut h = Harness::guest();
    h.input("route well-lit");
    assert_eq!(
        h.messages(),
        vec!["🗺️ Finding route with best lighting and visibility..."]
    );

    h.advance_by(1_999);
    assert_eq!(h.count("Route calculated"), 0);
    h.advance_by(1);
    assert_eq!(h.count("✅ Route calculated! "), 1);

    // same seed, same route
    let mut again = Harness::guest();
    again.input("route well-lit");
    again.advance_by(2_000);
    assert_eq!(again.messages(), h.messages());
}

#[test]
fn test_logout_leaves_panic_mode_and_ends_session() {
    let mut h = Harness::guest();
    h.input("panic");
    let response = h.input("logout");
    assert!(!response.quit);
    assert!(!h.app.emergency().state().is_active());
    assert_eq!(h.count("🚪 Logging out..."), 1);
    assert_eq!(h.count("Emergency mode deactivated"), 1);

    h.now_ms = T0 + 1_499;
    assert!(!h.event(Event::Deadline).quit);
    h.now_ms = T0 + 1_500;
    assert!(h.event(Event::Deadline).quit);
}
