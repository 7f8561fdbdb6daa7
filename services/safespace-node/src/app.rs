//! Host application state.
//!
//! [`App`] owns every component and applies one [`Event`] at a time. Timer
//! tasks and the stdin reader only produce events, so nothing here is
//! shared across tasks.

use chrono::{Local, Timelike};
use rand::rngs::StdRng;
use rand::SeedableRng;
use safespace_core::{NotificationSink, RuntimeConfig, Timeline, TimestampMs};
use safespace_domain::{
    Assistant, AssistantContext, FakeCaller, RouteEstimate, RouteKind, Sender, SettingKey,
    SettingsManager, SettingsStore, UserProfile, FAKE_CALL_RING_MS, ROUTE_CALCULATION_MS,
};
use safespace_emergency::machine::{CONTACTS_NOTICE_DELAY_MS, SERVICES_NOTICE_DELAY_MS};
use safespace_emergency::{EmergencyMode, EmergencyStateMachine, Transition};
use safespace_telemetry::{check_for_threats, TelemetrySimulator};
use tracing::{debug, info};

use crate::commands::{self, Command, ToggleTarget, HELP};

/// Wall-clock reading handed to [`App::handle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Now {
    pub ms: TimestampMs,
    /// Local hour of day, 0-23
    pub hour: u32,
}

impl Now {
    pub fn local() -> Self {
        let now = Local::now();
        Self {
            ms: now.timestamp_millis().max(0) as u64,
            hour: now.hour(),
        }
    }

    pub fn at(ms: TimestampMs, hour: u32) -> Self {
        Self { ms, hour }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    WearableTick,
    ScoreTick,
    TimeoutCheck,
    /// A scheduled deadline on the emergency timeline has passed
    Deadline,
    Input(String),
    InputClosed,
}

/// Delay between `logout` and the end of the session
pub const LOGOUT_GRACE_MS: u64 = 1_500;

const SERVICES_DISPATCHED_CHAT: &str =
    "🚨 Emergency services have been alerted and are being dispatched to your location.";
const CONTACTS_UPDATED_CHAT: &str =
    "📱 Your emergency contacts have been notified and are receiving your location updates.";
const DEACTIVATED_CHAT: &str = "🟢 Emergency mode has been deactivated. I hope you're safe now.";

/// Host-level work left for later, next to the emergency timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FollowUp {
    BotMessage(&'static str),
    FakeCallActive(FakeCaller),
    RouteReady,
    SessionEnd,
}

/// Lines for the operator plus whether to stop.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Response {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Response {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }

    fn quit() -> Self {
        Self {
            lines: Vec::new(),
            quit: true,
        }
    }
}

pub struct App<S: NotificationSink, St: SettingsStore> {
    profile: UserProfile,
    telemetry: TelemetrySimulator,
    emergency: EmergencyStateMachine,
    settings: SettingsManager<St>,
    assistant: Assistant,
    follow_ups: Timeline<FollowUp>,
    rng: StdRng,
    sink: S,
}

impl<S: NotificationSink, St: SettingsStore> App<S, St> {
    pub fn new(
        config: &RuntimeConfig,
        profile: UserProfile,
        settings: SettingsManager<St>,
        sink: S,
        now_ms: TimestampMs,
    ) -> Self {
        let (telemetry, assistant, rng) = match config.rng_seed {
            Some(seed) => (
                TelemetrySimulator::seeded(profile.telemetry(), seed),
                Assistant::seeded(seed.wrapping_add(1), now_ms),
                StdRng::seed_from_u64(seed.wrapping_add(2)),
            ),
            None => (
                TelemetrySimulator::from_entropy(profile.telemetry()),
                Assistant::from_entropy(now_ms),
                StdRng::from_entropy(),
            ),
        };

        let mut emergency = EmergencyStateMachine::new(
            profile.contact_book(),
            config.location.clone(),
            config.emergency.clone(),
        );
        emergency.set_recording_enabled(settings.settings().recording_enabled);

        info!(
            user = %profile.user_name,
            status = %profile.user_status,
            contacts = emergency.contacts().len(),
            seeded = config.rng_seed.is_some(),
            "companion ready"
        );

        Self {
            profile,
            telemetry,
            emergency,
            settings,
            assistant,
            follow_ups: Timeline::new(),
            rng,
            sink,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn telemetry(&self) -> &TelemetrySimulator {
        &self.telemetry
    }

    pub fn emergency(&self) -> &EmergencyStateMachine {
        &self.emergency
    }

    pub fn settings(&self) -> &SettingsManager<St> {
        &self.settings
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn next_deadline(&self) -> Option<TimestampMs> {
        match (self.emergency.next_deadline(), self.follow_ups.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Apply one event. Scheduled follow-ups that came due are released
    /// after the event itself.
    pub fn handle(&mut self, event: Event, now: Now) -> Response {
        let mut response = match event {
            Event::WearableTick => {
                self.telemetry.tick(&mut self.sink);
                Response::default()
            }
            Event::ScoreTick => {
                let sharing = self.settings.settings().location_sharing;
                self.telemetry
                    .update_safety_score(now.hour, sharing, &mut self.sink);
                Response::default()
            }
            Event::TimeoutCheck => {
                let transition = self.emergency.timeout_check(now.ms, &mut self.sink);
                self.after_transition(transition, now);
                Response::default()
            }
            Event::Deadline => Response::default(),
            Event::Input(line) => match commands::parse(&line) {
                Ok(command) => self.execute(command, now),
                Err(err) => Response::line(format!("error: {err}")),
            },
            Event::InputClosed => {
                debug!("input closed");
                Response::quit()
            }
        };

        let released = self.emergency.advance(now.ms, &mut self.sink);
        if released > 0 {
            debug!(released, "scheduled follow-ups released");
        }
        if self.release_follow_ups(now) {
            response.quit = true;
        }
        response
    }

    /// Resolve host follow-ups due at `now`. Returns true once the session
    /// should end.
    fn release_follow_ups(&mut self, now: Now) -> bool {
        let mut end = false;
        for (_, follow_up) in self.follow_ups.drain_due(now.ms) {
            match follow_up {
                FollowUp::BotMessage(text) => self.assistant.post(text, now.ms),
                FollowUp::FakeCallActive(caller) => self.sink.show(caller.active_notice()),
                FollowUp::RouteReady => {
                    let estimate = RouteEstimate::draw(&mut self.rng);
                    info!(minutes = estimate.minutes, rating = estimate.rating_tenths, "route calculated");
                    self.sink.show(estimate.notice());
                }
                FollowUp::SessionEnd => {
                    info!("logged out");
                    end = true;
                }
            }
        }
        end
    }

    /// Chat side of a panic-mode transition.
    fn after_transition(&mut self, transition: Transition, now: Now) {
        match transition {
            Transition::Activated => {
                self.follow_ups.schedule(
                    now.ms + SERVICES_NOTICE_DELAY_MS,
                    FollowUp::BotMessage(SERVICES_DISPATCHED_CHAT),
                );
                self.follow_ups.schedule(
                    now.ms + CONTACTS_NOTICE_DELAY_MS,
                    FollowUp::BotMessage(CONTACTS_UPDATED_CHAT),
                );
            }
            Transition::Deactivated | Transition::AutoDeactivated => {
                self.assistant.post(DEACTIVATED_CHAT, now.ms);
            }
            Transition::Unchanged => {}
        }
    }

    fn execute(&mut self, command: Command, now: Now) -> Response {
        let sink = &mut self.sink;
        match command {
            Command::Panic { confirm } => {
                let transition =
                    self.emergency
                        .activate(now.ms, self.telemetry.state(), sink, || confirm);
                if transition == Transition::Unchanged {
                    return Response::line("Panic mode is active. Send `panic yes` to deactivate.");
                }
                self.after_transition(transition, now);
            }
            Command::Deactivate => {
                let transition = self.emergency.deactivate(sink);
                self.after_transition(transition, now);
            }
            Command::Alert => {
                let text = self.emergency.send_alert(now.ms, sink);
                return Response::line(text);
            }
            Command::Location => self.emergency.send_location(sink),
            Command::Record => {
                if !self.emergency.start_recording(now.ms, sink)
                    && self.emergency.mode() == EmergencyMode::Inactive
                {
                    return Response::line("Recording is only available in panic mode.");
                }
            }
            Command::StopRecord => {
                self.emergency.stop_recording(sink);
            }
            Command::Strobe => {
                self.emergency.activate_strobe(now.ms, sink);
            }
            Command::StrobeOff => {
                self.emergency.deactivate_strobe(sink);
            }
            Command::Call(name) => {
                self.emergency.call_contact(&name, now.ms, sink);
            }
            Command::Message(name) => {
                self.emergency.message_contact(&name, now.ms, sink);
            }
            Command::Share(name) => {
                self.emergency.share_location_with(&name, sink);
            }
            Command::CallEmergency => self.emergency.call_emergency_services(now.ms, sink),
            Command::AddContact { name, number } => {
                if let Err(err) = self.emergency.add_contact(&name, &number, sink) {
                    return Response::line(format!("error: {err}"));
                }
            }
            Command::RemoveContact(id) => {
                if self.emergency.remove_contact(&id, sink).is_none() {
                    return Response::line(format!("no contact with id {id}"));
                }
            }
            Command::Contacts => {
                let lines = self
                    .emergency
                    .contacts()
                    .iter()
                    .map(|c| format!("{} {} {} [{}]", c.avatar_glyph, c.name, c.phone_number, c.id))
                    .collect();
                return Response { lines, quit: false };
            }
            Command::Toggle(target) => self.toggle(target),
            Command::Chat(text) => {
                self.assistant.open();
                let ctx = AssistantContext {
                    telemetry: self.telemetry.state(),
                    location: self.emergency.location(),
                    location_sharing: self.settings.settings().location_sharing,
                };
                if let Some(reply) = self.assistant.send(&text, &ctx, now.ms) {
                    return Response::line(format!("🤖 {reply}"));
                }
            }
            Command::Quick(quick) => {
                self.assistant.open();
                let ctx = AssistantContext {
                    telemetry: self.telemetry.state(),
                    location: self.emergency.location(),
                    location_sharing: self.settings.settings().location_sharing,
                };
                let reply = self.assistant.send_quick(quick, &ctx, now.ms);
                return Response::line(format!("🤖 {reply}"));
            }
            Command::ChatOpen => {
                self.assistant.open();
                let lines = self
                    .assistant
                    .log()
                    .iter()
                    .map(|m| match m.sender {
                        Sender::Bot => format!("🤖 {}", m.content),
                        Sender::User => format!("🙋 {}", m.content),
                    })
                    .collect();
                return Response { lines, quit: false };
            }
            Command::ChatClose => self.assistant.close(),
            Command::FakeCall(caller) => {
                debug!(ringtone = caller.ringtone(), "fake call ringing");
                sink.show(caller.incoming_notice());
                self.follow_ups
                    .schedule(now.ms + FAKE_CALL_RING_MS, FollowUp::FakeCallActive(caller));
            }
            Command::Route(kind) => self.plan_route(kind, now),
            Command::Logout => {
                sink.show("🚪 Logging out...");
                let transition = self.emergency.deactivate(sink);
                self.after_transition(transition, now);
                self.follow_ups
                    .schedule(now.ms + LOGOUT_GRACE_MS, FollowUp::SessionEnd);
            }
            Command::Threats => {
                let threats = check_for_threats(now.hour, self.telemetry.state());
                if threats.is_empty() {
                    return Response::line("No active threats.");
                }
                let lines = threats
                    .iter()
                    .map(|t| format!("[{:?}] {:?}: {}", t.level, t.kind, t.message))
                    .collect();
                return Response { lines, quit: false };
            }
            Command::Status => return Response::line(self.status_line(now)),
            Command::Help => return Response::line(HELP),
            Command::Quit => return Response::quit(),
        }
        Response::default()
    }

    fn plan_route(&mut self, kind: RouteKind, now: Now) {
        self.sink.show(kind.calculating_notice());
        self.follow_ups
            .schedule(now.ms + ROUTE_CALCULATION_MS, FollowUp::RouteReady);
    }

    fn toggle(&mut self, target: ToggleTarget) {
        let sink = &mut self.sink;
        match target {
            ToggleTarget::LocationSharing => {
                self.settings.toggle_location_sharing(sink);
            }
            ToggleTarget::VoiceGuardian => {
                self.settings.toggle_voice_guardian(sink);
            }
            ToggleTarget::Biometric(kind) => {
                self.settings.toggle_biometric(kind, sink);
            }
            ToggleTarget::Setting(key) => {
                let on = self.settings.toggle(key, sink);
                if key == SettingKey::RecordingEnabled {
                    self.emergency.set_recording_enabled(on);
                }
            }
        }
    }

    pub fn status_line(&self, now: Now) -> String {
        let vitals = self.telemetry.state();
        let state = self.emergency.state();
        let mode = match state.elapsed_ms(now.ms) {
            Some(elapsed) => format!("ACTIVE {}s", elapsed / 1_000),
            None => "inactive".to_string(),
        };
        format!(
            "{} | panic {} | ❤️ {} bpm {} {} | 🔋 {}% {} | score {} ({:?}) | rec {} | strobe {} | unread {}",
            self.profile.user_name,
            mode,
            vitals.heart_rate_bpm(),
            vitals.stress_level().emoji(),
            vitals.stress_level(),
            vitals.battery_percent(),
            if vitals.connected() { "connected" } else { "disconnected" },
            vitals.safety_score(),
            vitals.score_band(),
            if state.is_recording() { "on" } else { "off" },
            if state.strobe_active() { "on" } else { "off" },
            self.assistant.unread(),
        )
    }
}
