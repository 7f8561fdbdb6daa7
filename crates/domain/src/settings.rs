//! Persisted user settings
//!
//! Settings are stored as one flat JSON record with camelCase keys. Missing
//! keys take their defaults; an unreadable record is replaced by defaults
//! after telling the user once.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use safespace_core::{CoreError, NotificationSink};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Stored settings are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Settings store rejected the write")]
    Rejected,
}

impl From<SettingsError> for CoreError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Io(e) => CoreError::Io(e),
            SettingsError::Corrupt(e) => CoreError::SettingsCorrupt(e.to_string()),
            SettingsError::Rejected => CoreError::StoreRejected,
        }
    }
}

/// Log a settings failure at a level matching whether defaults cover it.
fn log_failure(err: &CoreError, action: &str) {
    if err.has_fallback() {
        warn!(error = %err, action, "settings fallback");
    } else {
        error!(error = %err, action, "settings store failure");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Biometrics {
    pub fingerprint: bool,
    pub face: bool,
    pub voice: bool,
}

impl Default for Biometrics {
    fn default() -> Self {
        Self {
            fingerprint: true,
            face: true,
            voice: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricKind {
    Fingerprint,
    Face,
    Voice,
}

impl BiometricKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "fingerprint" => Some(Self::Fingerprint),
            "face" => Some(Self::Face),
            "voice" => Some(Self::Voice),
            _ => None,
        }
    }
}

impl fmt::Display for BiometricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fingerprint => "Fingerprint",
            Self::Face => "Face",
            Self::Voice => "Voice",
        };
        f.write_str(name)
    }
}

/// Boolean flags toggled through the generic settings switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    FakeCallAutoTrigger,
    RecordingEnabled,
    Anonymous,
    Alerts,
    Tips,
    Emergency,
}

impl SettingKey {
    /// Accepts the stored camelCase key or a dashed form.
    pub fn parse(name: &str) -> Option<Self> {
        let folded: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "fakecallautotrigger" => Some(Self::FakeCallAutoTrigger),
            "recordingenabled" | "recording" => Some(Self::RecordingEnabled),
            "anonymous" => Some(Self::Anonymous),
            "alerts" => Some(Self::Alerts),
            "tips" => Some(Self::Tips),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }

    /// Lower-case words, e.g. `recording enabled`
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FakeCallAutoTrigger => "fake call auto trigger",
            Self::RecordingEnabled => "recording enabled",
            Self::Anonymous => "anonymous",
            Self::Alerts => "alerts",
            Self::Tips => "tips",
            Self::Emergency => "emergency",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub location_sharing: bool,
    pub voice_guardian_active: bool,
    pub biometrics: Biometrics,
    pub fake_call_auto_trigger: bool,
    pub recording_enabled: bool,
    pub anonymous: bool,
    pub alerts: bool,
    pub tips: bool,
    pub emergency: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            location_sharing: true,
            voice_guardian_active: true,
            biometrics: Biometrics::default(),
            fake_call_auto_trigger: false,
            recording_enabled: false,
            anonymous: true,
            alerts: true,
            tips: true,
            emergency: true,
        }
    }
}

impl Settings {
    pub fn flag(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::FakeCallAutoTrigger => self.fake_call_auto_trigger,
            SettingKey::RecordingEnabled => self.recording_enabled,
            SettingKey::Anonymous => self.anonymous,
            SettingKey::Alerts => self.alerts,
            SettingKey::Tips => self.tips,
            SettingKey::Emergency => self.emergency,
        }
    }

    fn flag_mut(&mut self, key: SettingKey) -> &mut bool {
        match key {
            SettingKey::FakeCallAutoTrigger => &mut self.fake_call_auto_trigger,
            SettingKey::RecordingEnabled => &mut self.recording_enabled,
            SettingKey::Anonymous => &mut self.anonymous,
            SettingKey::Alerts => &mut self.alerts,
            SettingKey::Tips => &mut self.tips,
            SettingKey::Emergency => &mut self.emergency,
        }
    }

    pub fn biometric(&self, kind: BiometricKind) -> bool {
        match kind {
            BiometricKind::Fingerprint => self.biometrics.fingerprint,
            BiometricKind::Face => self.biometrics.face,
            BiometricKind::Voice => self.biometrics.voice,
        }
    }

    fn biometric_mut(&mut self, kind: BiometricKind) -> &mut bool {
        match kind {
            BiometricKind::Fingerprint => &mut self.biometrics.fingerprint,
            BiometricKind::Face => &mut self.biometrics.face,
            BiometricKind::Voice => &mut self.biometrics.voice,
        }
    }
}

/// Backing store for the settings record.
pub trait SettingsStore {
    /// Raw record, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, SettingsError>;

    fn save(&mut self, raw: &str) -> Result<(), SettingsError>;
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Option<String>, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, raw: &str) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Store kept in memory. Used headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    raw: Option<String>,
    reject_writes: bool,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            reject_writes: false,
        }
    }

    /// Make every subsequent save fail.
    pub fn reject_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<String>, SettingsError> {
        Ok(self.raw.clone())
    }

    fn save(&mut self, raw: &str) -> Result<(), SettingsError> {
        if self.reject_writes {
            return Err(SettingsError::Rejected);
        }
        self.raw = Some(raw.to_string());
        Ok(())
    }
}

/// Owns the live settings and writes every change through to the store.
pub struct SettingsManager<St: SettingsStore> {
    settings: Settings,
    store: St,
}

impl<St: SettingsStore> SettingsManager<St> {
    /// Read the stored record. Corrupt or unreadable records fall back to
    /// defaults with a single notification.
    pub fn load<S: NotificationSink>(store: St, sink: &mut S) -> Self {
        let settings = match Self::read(&store) {
            Ok(Some(settings)) => {
                debug!("settings loaded");
                settings
            }
            Ok(None) => Settings::default(),
            Err(err) => {
                log_failure(&CoreError::from(err), "load");
                sink.show("⚠️ Error loading saved settings. Using defaults.");
                Settings::default()
            }
        };
        Self { settings, store }
    }

    fn read(store: &St) -> Result<Option<Settings>, SettingsError> {
        match store.load()? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Persist the current settings. A failed write keeps the in-memory
    /// value and tells the user.
    pub fn save<S: NotificationSink>(&mut self, sink: &mut S) -> bool {
        let outcome = serde_json::to_string(&self.settings)
            .map_err(SettingsError::from)
            .and_then(|raw| self.store.save(&raw));
        match outcome {
            Ok(()) => true,
            Err(err) => {
                log_failure(&CoreError::from(err), "save");
                sink.show("⚠️ Error saving settings. Changes may not persist.");
                false
            }
        }
    }

    pub fn toggle_location_sharing<S: NotificationSink>(&mut self, sink: &mut S) -> bool {
        self.settings.location_sharing = !self.settings.location_sharing;
        self.save(sink);
        let on = self.settings.location_sharing;
        sink.show(format!(
            "📍 Location sharing {}",
            if on { "enabled" } else { "disabled" }
        ));
        on
    }

    pub fn toggle_voice_guardian<S: NotificationSink>(&mut self, sink: &mut S) -> bool {
        self.settings.voice_guardian_active = !self.settings.voice_guardian_active;
        self.save(sink);
        let on = self.settings.voice_guardian_active;
        sink.show(format!(
            "🎤 Voice Guardian {}",
            if on { "activated" } else { "deactivated" }
        ));
        on
    }

    pub fn toggle_biometric<S: NotificationSink>(&mut self, kind: BiometricKind, sink: &mut S) -> bool {
        let flag = self.settings.biometric_mut(kind);
        *flag = !*flag;
        let on = *flag;
        self.save(sink);
        sink.show(format!(
            "{} biometric {}",
            kind,
            if on { "enabled" } else { "disabled" }
        ));
        on
    }

    pub fn toggle<S: NotificationSink>(&mut self, key: SettingKey, sink: &mut S) -> bool {
        let flag = self.settings.flag_mut(key);
        *flag = !*flag;
        let on = *flag;
        self.save(sink);
        let message = match key {
            SettingKey::FakeCallAutoTrigger => format!(
                "📞 Auto fake call {}",
                if on { "enabled" } else { "disabled" }
            ),
            _ => format!(
                "{} {}",
                key.display_name(),
                if on { "enabled" } else { "disabled" }
            ),
        };
        sink.show(message);
        on
    }
}
