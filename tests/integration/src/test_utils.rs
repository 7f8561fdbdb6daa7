//! Test utilities for end-to-end scenarios

use safespace_core::{RecordingSink, RuntimeConfig, TimestampMs};
use safespace_domain::{fallback_profile, MemorySettingsStore, SettingsManager, UserProfile};
use safespace_node::{App, Event, Now, Response};

/// Arbitrary fixed epoch for scenario clocks
pub const T0: TimestampMs = 1_700_000_000_000;

/// Install a test subscriber once; later calls are ignored.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

pub type TestApp = App<RecordingSink, MemorySettingsStore>;

/// Host app on a manual clock
pub struct Harness {
    pub app: TestApp,
    pub now_ms: TimestampMs,
    pub hour: u32,
}

impl Harness {
    pub fn new(profile: UserProfile, store: MemorySettingsStore) -> Self {
        Self::with_config(profile, store, seeded_config(42))
    }

    pub fn with_config(profile: UserProfile, store: MemorySettingsStore, config: RuntimeConfig) -> Self {
        init_test_logging();
        let mut sink = RecordingSink::new();
        let settings = SettingsManager::load(store, &mut sink);
        let app = App::new(&config, profile, settings, sink, T0);
        Self {
            app,
            now_ms: T0,
            hour: 14,
        }
    }

    /// Guest profile with default settings
    pub fn guest() -> Self {
        Self::new(fallback_profile(), MemorySettingsStore::new())
    }

    pub fn now(&self) -> Now {
        Now::at(self.now_ms, self.hour)
    }

    pub fn input(&mut self, line: &str) -> Response {
        let now = self.now();
        self.app.handle(Event::Input(line.to_string()), now)
    }

    pub fn event(&mut self, event: Event) -> Response {
        let now = self.now();
        self.app.handle(event, now)
    }

    /// Move the clock forward, waking at every scheduled deadline on the way.
    pub fn advance_to(&mut self, target_ms: TimestampMs) {
        while let Some(due) = self.app.next_deadline().filter(|d| *d <= target_ms) {
            self.now_ms = self.now_ms.max(due);
            self.event(Event::Deadline);
        }
        self.now_ms = target_ms;
    }

    pub fn advance_by(&mut self, ms: u64) {
        self.advance_to(self.now_ms + ms);
    }

    pub fn messages(&self) -> Vec<String> {
        self.app
            .sink()
            .notifications
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    /// Drop everything notified so far
    pub fn clear(&mut self) {
        self.app.sink_mut().clear();
    }

    pub fn count(&self, needle: &str) -> usize {
        self.app.sink().count_containing(needle)
    }
}

pub fn seeded_config(seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        rng_seed: Some(seed),
        ..RuntimeConfig::default()
    }
}
