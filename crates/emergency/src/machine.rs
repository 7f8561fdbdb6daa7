//! Panic-mode state machine
//!
//! Two states, `Inactive` and `Active`. User calls move between them; the
//! only spontaneous transition is [`EmergencyStateMachine::timeout_check`].
//! Delayed effects (staggered contact alerts, dispatch confirmations, strobe
//! expiry, recording checkpoints) are parked on a [`Timeline`] and released
//! by [`EmergencyStateMachine::advance`]; deactivation leaves already
//! scheduled notifications in place.

use safespace_core::config::EmergencyConfig;
use safespace_core::{Location, Notification, NotificationSink, Timeline, TimestampMs};
use safespace_telemetry::TelemetryState;
use tracing::{debug, info, warn};

use crate::contacts::{ContactBook, ContactError, EmergencyContact};
use crate::state::{EmergencyMode, EmergencyState, Transition};

/// Spacing between consecutive per-contact alerts
pub const ALERT_SPACING_MS: u64 = 1_000;
/// Delay of the "services notified" confirmation after activation
pub const SERVICES_NOTICE_DELAY_MS: u64 = 3_000;
/// Delay of the "contacts notified" confirmation after activation
pub const CONTACTS_NOTICE_DELAY_MS: u64 = 5_000;
/// Delay of the "recording continues" checkpoint
pub const RECORDING_CHECKPOINT_MS: u64 = 30_000;
/// Simulated call connection latency
pub const CALL_CONNECT_DELAY_MS: u64 = 2_000;
/// Simulated message delivery latency
pub const MESSAGE_DELIVERY_DELAY_MS: u64 = 1_000;

const ACTIVATION_DISPLAY_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Scheduled {
    Notify(Notification),
    StrobeExpiry { session: u64 },
    RecordingCheckpoint { session: u64 },
}

pub struct EmergencyStateMachine {
    state: EmergencyState,
    contacts: ContactBook,
    location: Location,
    recording_enabled: bool,
    config: EmergencyConfig,
    timeline: Timeline<Scheduled>,
    next_session: u64,
    recording_session: Option<u64>,
    strobe_session: Option<u64>,
}

impl EmergencyStateMachine {
    pub fn new(contacts: ContactBook, location: Location, config: EmergencyConfig) -> Self {
        Self {
            state: EmergencyState::new(),
            contacts,
            location,
            recording_enabled: false,
            config,
            timeline: Timeline::new(),
            next_session: 0,
            recording_session: None,
            strobe_session: None,
        }
    }

    pub fn state(&self) -> &EmergencyState {
        &self.state
    }

    pub fn mode(&self) -> EmergencyMode {
        self.state.mode()
    }

    pub fn contacts(&self) -> &ContactBook {
        &self.contacts
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    /// Whether activation starts an audio recording
    pub fn set_recording_enabled(&mut self, enabled: bool) {
        self.recording_enabled = enabled;
    }

    /// Earliest pending deadline, for the host to sleep on
    pub fn next_deadline(&self) -> Option<TimestampMs> {
        self.timeline.next_due()
    }

    pub fn pending_count(&self) -> usize {
        self.timeline.len()
    }

    /// Panic button.
    ///
    /// From `Inactive` this runs the emergency protocol. From `Active` it asks
    /// `confirm_deactivation` and deactivates only on a yes.
    pub fn activate<S, F>(
        &mut self,
        now_ms: TimestampMs,
        vitals: &TelemetryState,
        sink: &mut S,
        confirm_deactivation: F,
    ) -> Transition
    where
        S: NotificationSink,
        F: FnOnce() -> bool,
    {
        if self.state.is_active() {
            if confirm_deactivation() {
                self.deactivate(sink);
                return Transition::Deactivated;
            }
            return Transition::Unchanged;
        }

        self.state.enter(now_ms);
        info!(
            contacts = self.contacts.len(),
            recording = self.recording_enabled,
            stress = %vitals.stress_level(),
            safety_score = vitals.safety_score(),
            location = %self.location,
            "panic mode activated"
        );

        self.send_location(sink);
        self.send_alert(now_ms, sink);
        if self.recording_enabled {
            self.start_recording(now_ms, sink);
        }

        sink.notify(Notification::with_duration(
            "🚨 Emergency mode activated! Help is on the way.",
            ACTIVATION_DISPLAY_MS,
        ));

        self.schedule_notice(
            now_ms + SERVICES_NOTICE_DELAY_MS,
            "👮 Emergency services have been notified",
        );
        self.schedule_notice(
            now_ms + CONTACTS_NOTICE_DELAY_MS,
            "📱 Emergency contacts have been notified",
        );

        Transition::Activated
    }

    /// Leave panic mode. A no-op while already `Inactive`.
    pub fn deactivate<S: NotificationSink>(&mut self, sink: &mut S) -> Transition {
        if !self.state.is_active() {
            debug!("deactivate ignored, panic mode not active");
            return Transition::Unchanged;
        }

        self.state.leave();
        self.stop_recording(sink);
        self.deactivate_strobe(sink);
        info!("panic mode deactivated");
        sink.show("🟢 Emergency mode deactivated");
        Transition::Deactivated
    }

    /// Auto-deactivate once panic mode has run longer than the timeout.
    ///
    /// Exactly the timeout does not trigger; it must be exceeded.
    pub fn timeout_check<S: NotificationSink>(&mut self, now_ms: TimestampMs, sink: &mut S) -> Transition {
        let Some(elapsed) = self.state.elapsed_ms(now_ms) else {
            return Transition::Unchanged;
        };
        if elapsed <= self.config.panic_timeout_ms {
            return Transition::Unchanged;
        }

        warn!(elapsed_ms = elapsed, "panic mode timed out");
        sink.show(format!(
            "⏰ Emergency mode auto-deactivated after {} minutes of inactivity.",
            self.config.panic_timeout_ms / 60_000
        ));
        self.deactivate(sink);
        Transition::AutoDeactivated
    }

    /// Release everything scheduled at or before `now_ms`. Returns how many
    /// entries were processed.
    pub fn advance<S: NotificationSink>(&mut self, now_ms: TimestampMs, sink: &mut S) -> usize {
        let due = self.timeline.drain_due(now_ms);
        let count = due.len();
        for (_, item) in due {
            match item {
                Scheduled::Notify(notification) => sink.notify(notification),
                Scheduled::StrobeExpiry { session } => {
                    if self.strobe_session == Some(session) {
                        debug!(session, "strobe duration elapsed");
                        self.deactivate_strobe(sink);
                    }
                }
                Scheduled::RecordingCheckpoint { session } => {
                    if self.recording_session == Some(session) {
                        sink.show("🎤 Recording continues... Evidence secured");
                    }
                }
            }
        }
        count
    }

    /// Start recording. Idempotent, and only meaningful in panic mode.
    pub fn start_recording<S: NotificationSink>(&mut self, now_ms: TimestampMs, sink: &mut S) -> bool {
        if self.state.is_recording() {
            return false;
        }
        if !self.state.is_active() {
            debug!("recording requested outside panic mode, ignored");
            return false;
        }

        let session = self.new_session();
        self.recording_session = Some(session);
        self.state.set_recording(true);
        info!(session, "audio recording started");
        sink.show("🎤 Audio recording started - evidence being saved");
        self.timeline.schedule(
            now_ms + RECORDING_CHECKPOINT_MS,
            Scheduled::RecordingCheckpoint { session },
        );
        true
    }

    pub fn stop_recording<S: NotificationSink>(&mut self, sink: &mut S) -> bool {
        if !self.state.is_recording() {
            return false;
        }
        self.recording_session = None;
        self.state.set_recording(false);
        info!("audio recording stopped");
        sink.show("🎤 Audio recording stopped and saved");
        true
    }

    /// Turn the strobe on for the configured duration. Idempotent.
    pub fn activate_strobe<S: NotificationSink>(&mut self, now_ms: TimestampMs, sink: &mut S) -> bool {
        if self.state.strobe_active() {
            return false;
        }
        let session = self.new_session();
        self.strobe_session = Some(session);
        self.state.set_strobe(true);
        sink.show("💡 Strobe light activated - look for flashing light");
        self.timeline.schedule(
            now_ms + self.config.strobe_duration_ms,
            Scheduled::StrobeExpiry { session },
        );
        true
    }

    pub fn deactivate_strobe<S: NotificationSink>(&mut self, sink: &mut S) -> bool {
        if !self.state.strobe_active() {
            return false;
        }
        self.strobe_session = None;
        self.state.set_strobe(false);
        sink.show("💡 Strobe light deactivated");
        true
    }

    /// Alert every contact, one per second in list order.
    ///
    /// Returns the composed alert text. The first contact is notified
    /// immediately; the rest are left on the timeline.
    pub fn send_alert<S: NotificationSink>(&mut self, now_ms: TimestampMs, sink: &mut S) -> String {
        let message = format!(
            "🚨 EMERGENCY ALERT: I need help! My location: {} {}",
            self.location.area_label,
            self.location.coordinates()
        );
        info!(contacts = self.contacts.len(), %message, "emergency alert composed");
        sink.show("📱 Sending alerts to emergency contacts...");

        let notices: Vec<(u64, String)> = self
            .contacts
            .iter()
            .enumerate()
            .map(|(index, contact)| {
                (
                    now_ms + index as u64 * ALERT_SPACING_MS,
                    format!("📱 Alert sent to {}", contact.name),
                )
            })
            .collect();
        for (due, notice) in notices {
            self.schedule_notice(due, notice);
        }

        self.advance(now_ms, sink);
        message
    }

    pub fn send_location<S: NotificationSink>(&mut self, sink: &mut S) {
        info!(location = %self.location, "location shared");
        sink.show(format!(
            "📍 Location shared: {} {}",
            self.location.area_label,
            self.location.coordinates()
        ));
    }

    pub fn add_contact<S: NotificationSink>(
        &mut self,
        name: &str,
        phone_number: &str,
        sink: &mut S,
    ) -> Result<String, ContactError> {
        let contact = self.contacts.add(name, phone_number)?;
        let id = contact.id.clone();
        sink.show(format!("✅ {} added to emergency contacts", contact.name));
        Ok(id)
    }

    /// Remove by id; unknown ids are ignored.
    pub fn remove_contact<S: NotificationSink>(&mut self, id: &str, sink: &mut S) -> Option<EmergencyContact> {
        let removed = self.contacts.remove(id)?;
        sink.show(format!("🗑️ {} removed from emergency contacts", removed.name));
        Some(removed)
    }

    pub fn call_contact<S: NotificationSink>(&mut self, name: &str, now_ms: TimestampMs, sink: &mut S) -> bool {
        let Some(contact) = self.contacts.find_by_name(name) else {
            sink.show("❌ Contact not found");
            return false;
        };
        let contact_name = contact.name.clone();
        debug!(contact = %contact_name, number = %contact.phone_number, "simulated call");
        sink.show(format!("📞 Calling {}...", contact_name));
        self.schedule_notice(
            now_ms + CALL_CONNECT_DELAY_MS,
            format!("📞 Connected to {}", contact_name),
        );
        true
    }

    pub fn message_contact<S: NotificationSink>(&mut self, name: &str, now_ms: TimestampMs, sink: &mut S) -> bool {
        let Some(contact) = self.contacts.find_by_name(name) else {
            sink.show("❌ Contact not found");
            return false;
        };
        let contact_name = contact.name.clone();
        sink.show(format!("💬 Messaging {}...", contact_name));
        self.schedule_notice(
            now_ms + MESSAGE_DELIVERY_DELAY_MS,
            format!("💬 Message sent to {}", contact_name),
        );
        true
    }

    pub fn share_location_with<S: NotificationSink>(&mut self, name: &str, sink: &mut S) -> bool {
        let Some(contact) = self.contacts.find_by_name(name) else {
            sink.show("❌ Contact not found");
            return false;
        };
        sink.show(format!(
            "📍 Location shared with {}: {}",
            contact.name, self.location.area_label
        ));
        true
    }

    pub fn call_emergency_services<S: NotificationSink>(&mut self, now_ms: TimestampMs, sink: &mut S) {
        info!("calling emergency services");
        sink.show("📞 Calling emergency services...");
        self.schedule_notice(
            now_ms + CALL_CONNECT_DELAY_MS,
            "📞 Connected to emergency services",
        );
    }

    fn schedule_notice(&mut self, due_ms: TimestampMs, message: impl Into<String>) {
        self.timeline
            .schedule(due_ms, Scheduled::Notify(Notification::new(message)));
    }

    fn new_session(&mut self) -> u64 {
        self.next_session += 1;
        self.next_session
    }
}
