//! Line commands accepted on stdin.

use safespace_domain::{BiometricKind, FakeCaller, QuickResponse, RouteKind, SettingKey};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("unknown setting `{0}`")]
    UnknownSetting(String),

    #[error("quick reply must be 1-4, got `{0}`")]
    BadQuickIndex(String),

    #[error("`{command}` expects one of {expected}, got `{value}`")]
    UnknownChoice {
        command: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Which switch a `toggle` flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleTarget {
    LocationSharing,
    VoiceGuardian,
    Biometric(BiometricKind),
    Setting(SettingKey),
}

impl ToggleTarget {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "location" | "location-sharing" | "locationsharing" => Some(Self::LocationSharing),
            "voice-guardian" | "voiceguardian" | "guardian" => Some(Self::VoiceGuardian),
            other => BiometricKind::parse(other)
                .map(Self::Biometric)
                .or_else(|| SettingKey::parse(other).map(Self::Setting)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Panic button; `panic yes` also confirms deactivation when active
    Panic { confirm: bool },
    Deactivate,
    Alert,
    Location,
    Record,
    StopRecord,
    Strobe,
    StrobeOff,
    Call(String),
    Message(String),
    Share(String),
    CallEmergency,
    AddContact { name: String, number: String },
    RemoveContact(String),
    Contacts,
    Toggle(ToggleTarget),
    Chat(String),
    Quick(QuickResponse),
    /// Show the chat transcript and mark it read
    ChatOpen,
    ChatClose,
    FakeCall(FakeCaller),
    Route(RouteKind),
    Logout,
    Threats,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  panic [yes]               activate panic mode (yes confirms deactivation)
  deactivate                leave panic mode
  alert | location          send alert to contacts | share location
  record | stop-record      audio recording
  strobe | strobe-off       strobe light
  call|message|share <name> contact actions
  call-emergency            call emergency services
  add-contact <name> <num>  add a contact
  remove-contact <id>       remove a contact
  contacts | threats | status
  toggle <setting>          location, voice-guardian, fingerprint, face, voice,
                            fake-call-auto-trigger, recording, anonymous,
                            alerts, tips, emergency
  chat <text> | quick <1-4> talk to the assistant
  chat-open | chat-close    show the chat transcript | hide it
  fake-call <mom|boss|emergency>
  route <safest|fastest|well-lit>
  logout | quit";

fn rest_required(
    command: &'static str,
    rest: &str,
    expected: &'static str,
) -> Result<String, CommandError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command, expected });
    }
    Ok(rest.to_string())
}

fn choice<T>(
    command: &'static str,
    rest: &str,
    expected: &'static str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, CommandError> {
    let value = rest_required(command, rest, expected)?;
    parse(&value).ok_or(CommandError::UnknownChoice {
        command,
        expected,
        value,
    })
}

/// Split `Aunt May +1 555 0199` at the first token that starts like a
/// phone number.
fn split_name_number(rest: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let at = tokens
        .iter()
        .position(|t| t.starts_with('+') || t.starts_with(|c: char| c.is_ascii_digit()))?;
    if at == 0 {
        return None;
    }
    Some((tokens[..at].join(" "), tokens[at..].join(" ")))
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "" => return Err(CommandError::Empty),
        "panic" | "sos" => Command::Panic {
            confirm: matches!(rest.to_ascii_lowercase().as_str(), "yes" | "y"),
        },
        "deactivate" => Command::Deactivate,
        "alert" => Command::Alert,
        "location" => Command::Location,
        "record" => Command::Record,
        "stop-record" => Command::StopRecord,
        "strobe" => Command::Strobe,
        "strobe-off" => Command::StrobeOff,
        "call" => Command::Call(rest_required("call", rest, "a contact name")?),
        "message" => Command::Message(rest_required("message", rest, "a contact name")?),
        "share" => Command::Share(rest_required("share", rest, "a contact name")?),
        "call-emergency" => Command::CallEmergency,
        "add-contact" => {
            let (name, number) = split_name_number(rest).ok_or(CommandError::MissingArgument {
                command: "add-contact",
                expected: "a name and a number",
            })?;
            Command::AddContact { name, number }
        }
        "remove-contact" => Command::RemoveContact(rest_required("remove-contact", rest, "a contact id")?),
        "contacts" => Command::Contacts,
        "toggle" => {
            let name = rest_required("toggle", rest, "a setting name")?;
            let target = ToggleTarget::parse(&name).ok_or(CommandError::UnknownSetting(name))?;
            Command::Toggle(target)
        }
        "chat" => Command::Chat(rest_required("chat", rest, "a message")?),
        "quick" => {
            let index = rest
                .parse::<usize>()
                .ok()
                .and_then(QuickResponse::from_index)
                .ok_or_else(|| CommandError::BadQuickIndex(rest.to_string()))?;
            Command::Quick(index)
        }
        "chat-open" => Command::ChatOpen,
        "chat-close" => Command::ChatClose,
        "fake-call" => Command::FakeCall(choice(
            "fake-call",
            rest,
            "mom, boss, emergency",
            FakeCaller::parse,
        )?),
        "route" => Command::Route(choice(
            "route",
            rest,
            "safest, fastest, well-lit",
            RouteKind::parse,
        )?),
        "logout" => Command::Logout,
        "threats" => Command::Threats,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}
