//! Rule-based safety assistant.
//!
//! Replies come from a keyword table checked in order; anything unmatched
//! gets one of the general replies, picked by the injected RNG.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use safespace_core::{Location, TimestampMs};
use safespace_telemetry::TelemetryState;
use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Hi! I'm here to help 24/7. How are you feeling today? If you're in immediate danger, please use the panic button or call emergency services.";

const GENERAL_REPLIES: [&str; 8] = [
    "I'm here to support you 24/7. How can I help keep you safe today?",
    "Your safety score is currently {score}%. Is there anything specific you'd like to discuss?",
    "I'm monitoring your wellbeing. Feel free to share anything that's concerning you.",
    "Remember, you're not alone. I'm here whenever you need support or safety assistance.",
    "Your safety network is active and ready. How are you feeling right now?",
    "I'm glad you reached out. What would you like to talk about or get help with?",
    "Your location is being monitored for safety. Is there anything specific you need help with today?",
    "I'm here to listen and help. Whether it's safety planning or just someone to talk to, I've got you covered.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub content: String,
    pub timestamp_ms: TimestampMs,
}

/// Canned replies offered as buttons under the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickResponse {
    NeedHelp,
    FeelUnsafe,
    Emergency,
    OkayNow,
}

impl QuickResponse {
    pub const ALL: [QuickResponse; 4] = [
        QuickResponse::NeedHelp,
        QuickResponse::FeelUnsafe,
        QuickResponse::Emergency,
        QuickResponse::OkayNow,
    ];

    /// 1-based index as listed to the user
    pub fn from_index(index: usize) -> Option<Self> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NeedHelp => "I need help",
            Self::FeelUnsafe => "I feel unsafe",
            Self::Emergency => "Emergency",
            Self::OkayNow => "I'm okay now",
        }
    }
}

/// What the assistant may mention about the user's situation.
#[derive(Debug, Clone, Copy)]
pub struct AssistantContext<'a> {
    pub telemetry: &'a TelemetryState,
    pub location: &'a Location,
    pub location_sharing: bool,
}

pub struct Assistant<R = StdRng> {
    rng: R,
    log: Vec<ChatMessage>,
    unread: u32,
    open: bool,
}

impl Assistant<StdRng> {
    pub fn seeded(seed: u64, now_ms: TimestampMs) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), now_ms)
    }

    pub fn from_entropy(now_ms: TimestampMs) -> Self {
        Self::with_rng(StdRng::from_entropy(), now_ms)
    }
}

impl<R: Rng> Assistant<R> {
    /// New chat holding only the greeting, which counts as unread.
    pub fn with_rng(rng: R, now_ms: TimestampMs) -> Self {
        Self {
            rng,
            log: vec![ChatMessage {
                sender: Sender::Bot,
                content: GREETING.to_string(),
                timestamp_ms: now_ms,
            }],
            unread: 1,
            open: false,
        }
    }

    pub fn log(&self) -> &[ChatMessage] {
        &self.log
    }

    pub fn unread(&self) -> u32 {
        self.unread
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the chat, marking everything read.
    pub fn open(&mut self) {
        self.open = true;
        self.unread = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Append a bot message that was not prompted by the user.
    pub fn post(&mut self, content: impl Into<String>, now_ms: TimestampMs) {
        self.push(Sender::Bot, content.into(), now_ms);
    }

    /// Record a user message and the reply. Blank input is ignored.
    pub fn send(&mut self, text: &str, ctx: &AssistantContext<'_>, now_ms: TimestampMs) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.push(Sender::User, text.to_string(), now_ms);
        let reply = self.respond(text, ctx);
        self.push(Sender::Bot, reply.clone(), now_ms);
        Some(reply)
    }

    pub fn send_quick(&mut self, quick: QuickResponse, ctx: &AssistantContext<'_>, now_ms: TimestampMs) -> String {
        self.push(Sender::User, quick.label().to_string(), now_ms);
        let reply = quick_response(quick, ctx);
        self.push(Sender::Bot, reply.clone(), now_ms);
        reply
    }

    /// Reply to `message` without touching the log.
    pub fn respond(&mut self, message: &str, ctx: &AssistantContext<'_>) -> String {
        let lower = message.to_lowercase();

        if contains_any(&lower, &["help", "emergency", "danger", "scared"]) {
            return "I'm here to help! If you're in immediate danger, please use the panic button or call emergency services. Would you like me to guide you through the safety features?".to_string();
        }
        if contains_any(&lower, &["safe", "security"]) {
            return "Your safety is my priority! I can help you with route planning, emergency contacts, or safety tips. What would you like to know about?".to_string();
        }
        if contains_any(&lower, &["location", "where"]) {
            return format!(
                "You're currently in {}. Your location sharing is {}. Would you like me to help you find safe spaces nearby?",
                ctx.location.area_label,
                if ctx.location_sharing { "enabled" } else { "disabled" }
            );
        }
        if contains_any(&lower, &["stress", "anxious", "worried", "afraid"]) {
            return format!(
                "I understand you're feeling stressed. Try taking slow, deep breaths. Remember, you have safety tools available. Your current stress level is showing as {}. Would you like some calming techniques?",
                ctx.telemetry.stress_level()
            );
        }
        if contains_any(&lower, &["watch", "device", "battery"]) {
            return format!(
                "Your SafeWatch Pro is {} with {}% battery. Heart rate: {} BPM. Everything looks normal!",
                if ctx.telemetry.connected() { "connected" } else { "disconnected" },
                ctx.telemetry.battery_percent(),
                ctx.telemetry.heart_rate_bpm()
            );
        }

        let template = GENERAL_REPLIES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(GENERAL_REPLIES[0]);
        template.replace("{score}", &ctx.telemetry.safety_score().to_string())
    }

    fn push(&mut self, sender: Sender, content: String, timestamp_ms: TimestampMs) {
        if sender == Sender::Bot && !self.open {
            self.unread += 1;
        }
        self.log.push(ChatMessage {
            sender,
            content,
            timestamp_ms,
        });
    }
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

pub fn quick_response(quick: QuickResponse, ctx: &AssistantContext<'_>) -> String {
    match quick {
        QuickResponse::NeedHelp => "I'm here to help! I can assist with emergency contacts, route planning, safety tips, or activate emergency protocols. What kind of help do you need?".to_string(),
        QuickResponse::FeelUnsafe => "I'm sorry to hear that. Your safety is my priority. I can help you find the nearest safe space, contact emergency services, or reach out to your emergency contacts. What would help you feel safer right now?".to_string(),
        QuickResponse::Emergency => "If you're in immediate danger, please activate the panic button. I can also alert your emergency contacts and emergency services. What action would you like to take?".to_string(),
        QuickResponse::OkayNow => format!(
            "I'm glad to hear you're okay! I'm still here monitoring your safety. Your current safety score is {}%. Is there anything I can help you with?",
            ctx.telemetry.safety_score()
        ),
    }
}
