//! Startup paths: profile loading, settings restore and configuration.

use std::time::Duration;

use crate::test_utils::{init_test_logging, seeded_config, Harness, T0};
use safespace_core::{RecordingSink, RuntimeConfig};
use safespace_domain::{
    fallback_profile, load_profile, FailingProfileProvider, MemorySettingsStore, MockProfileProvider,
    SettingsManager,
};
use safespace_node::App;

#[tokio::test(start_paused = true)]
async fn test_startup_with_mock_profile() {
    init_test_logging();
    let config = seeded_config(9);
    let mut sink = RecordingSink::new();

    let profile = load_profile(&MockProfileProvider::new(), config.profile_timeout(), &mut sink).await;
    let settings = SettingsManager::load(MemorySettingsStore::new(), &mut sink);
    let app = App::new(&config, profile, settings, sink, T0);

    assert_eq!(app.profile().user_name, "Sarah Johnson");
    assert!(app.telemetry().state().connected());
    assert_eq!(app.telemetry().state().safety_score(), 87);
    assert_eq!(app.emergency().contacts().len(), 3);
    assert!(app.sink().notifications.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_profile_timeout_falls_back_to_guest() {
    let config = RuntimeConfig {
        profile_timeout_ms: 500,
        ..seeded_config(9)
    };
    let mut sink = RecordingSink::new();

    let profile = load_profile(&MockProfileProvider::new(), config.profile_timeout(), &mut sink).await;

    assert_eq!(profile, fallback_profile());
    assert_eq!(sink.notifications.len(), 1);
    assert_eq!(
        sink.notifications[0].message,
        "⚠️ Couldn't load profile data. Using default profile."
    );
}

#[tokio::test]
async fn test_failing_provider_still_yields_working_app() {
    let mut sink = RecordingSink::new();
    let provider = FailingProfileProvider {
        reason: "503".to_string(),
    };
    let profile = load_profile(&provider, Duration::from_secs(5), &mut sink).await;
    let settings = SettingsManager::load(MemorySettingsStore::new(), &mut sink);
    let mut app = App::new(&seeded_config(1), profile, settings, sink, T0);

    let response = app.handle(
        safespace_node::Event::Input("status".to_string()),
        safespace_node::Now::at(T0, 10),
    );
    assert!(response.lines[0].starts_with("Guest User"));
    assert_eq!(app.sink().count_containing("Couldn't load profile data"), 1);
}

#[test]
fn test_settings_survive_restart() {
    let mut h = Harness::guest();
    h.input("toggle location");
    h.input("toggle fingerprint");
    h.input("toggle recording");
    let store = h.app.settings().store().clone();

    let mut restarted = Harness::new(fallback_profile(), store);
    let settings = restarted.app.settings().settings().clone();
    assert!(!settings.location_sharing);
    assert!(!settings.biometrics.fingerprint);
    assert!(settings.recording_enabled);
    assert!(restarted.messages().is_empty());

    restarted.input("panic");
    assert!(restarted.app.emergency().state().is_recording());
}

#[test]
fn test_corrupt_settings_notify_once_at_startup() {
    let h = Harness::new(fallback_profile(), MemorySettingsStore::with_record("]]"));
    assert_eq!(
        h.messages(),
        vec!["⚠️ Error loading saved settings. Using defaults."]
    );
    assert!(h.app.settings().settings().location_sharing);
}

#[test]
fn test_toml_configuration_reaches_the_app() {
    let config = RuntimeConfig::from_toml_str(
        r#"
        rng_seed = 5

        [emergency]
        panic_timeout_ms = 60000
        strobe_duration_ms = 10000

        [location]
        lat = 51.5074
        lng = -0.1278
        area_label = "Westminster"
        "#,
    )
    .unwrap();

    let mut h = Harness::with_config(fallback_profile(), MemorySettingsStore::new(), config);
    h.input("location");
    assert_eq!(
        h.messages(),
        vec!["📍 Location shared: Westminster (51.5074, -0.1278)"]
    );

    h.input("strobe");
    h.advance_by(10_000);
    assert!(!h.app.emergency().state().strobe_active());

    h.input("panic");
    h.advance_by(60_001);
    h.event(safespace_node::Event::TimeoutCheck);
    assert_eq!(h.count("auto-deactivated after 1 minutes"), 1);
}
