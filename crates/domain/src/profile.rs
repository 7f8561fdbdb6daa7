//! User profile loading
//!
//! The profile is fetched once at startup. A failed or slow fetch never
//! blocks the app: the fixed guest profile is used instead and the user is
//! told once.

use std::future::Future;
use std::time::Duration;

use safespace_core::{CoreError, Notification, NotificationSink};
use safespace_emergency::{ContactBook, EmergencyContact};
use safespace_telemetry::TelemetryState;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Simulated network latency of [`MockProfileProvider`]
pub const MOCK_LATENCY: Duration = Duration::from_millis(800);

const FALLBACK_NOTICE_MS: u64 = 5_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Profile service unavailable: {0}")]
    Unavailable(String),

    #[error("Profile fetch timed out after {0:?}")]
    Timeout(Duration),
}

impl From<ProfileError> for CoreError {
    fn from(err: ProfileError) -> Self {
        CoreError::DataUnavailable(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileContact {
    pub name: String,
    pub number: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WearableProfile {
    pub connected: bool,
    pub battery: u8,
    pub heart_rate: u8,
    pub stress_level: String,
}

/// Profile record as served by the profile provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_name: String,
    pub user_status: String,
    pub safety_score: u8,
    pub wearable: WearableProfile,
    pub emergency_contacts: Vec<ProfileContact>,
}

impl UserProfile {
    /// Initial telemetry seeded from the profile. Out-of-range values are
    /// clamped into the simulator's bounds.
    pub fn telemetry(&self) -> TelemetryState {
        TelemetryState::new(
            self.wearable.heart_rate,
            self.wearable.battery,
            self.wearable.connected,
            self.safety_score,
        )
    }

    pub fn contact_book(&self) -> ContactBook {
        ContactBook::from_contacts(
            self.emergency_contacts
                .iter()
                .map(|c| EmergencyContact::new(c.name.as_str(), c.number.as_str(), c.avatar.as_str())),
        )
    }
}

fn family_contacts() -> Vec<ProfileContact> {
    [
        ("Mom", "+1 234 567 8901", "👩"),
        ("Sister", "+1 234 567 8902", "👧"),
        ("Best Friend", "+1 234 567 8903", "👭"),
    ]
    .into_iter()
    .map(|(name, number, avatar)| ProfileContact {
        name: name.to_string(),
        number: number.to_string(),
        avatar: avatar.to_string(),
    })
    .collect()
}

/// Profile used when the provider cannot be reached.
pub fn fallback_profile() -> UserProfile {
    UserProfile {
        user_name: "Guest User".to_string(),
        user_status: "Limited Access".to_string(),
        safety_score: 50,
        wearable: WearableProfile {
            connected: false,
            battery: 0,
            heart_rate: 0,
            stress_level: "Unknown".to_string(),
        },
        emergency_contacts: family_contacts(),
    }
}

/// Source of the user profile.
pub trait ProfileProvider {
    fn fetch_profile(&self) -> impl Future<Output = Result<UserProfile, ProfileError>> + Send;
}

/// In-process stand-in for the profile backend.
#[derive(Debug, Clone)]
pub struct MockProfileProvider {
    latency: Duration,
}

impl MockProfileProvider {
    pub fn new() -> Self {
        Self {
            latency: MOCK_LATENCY,
        }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockProfileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileProvider for MockProfileProvider {
    fn fetch_profile(&self) -> impl Future<Output = Result<UserProfile, ProfileError>> + Send {
        let latency = self.latency;
        async move {
            tokio::time::sleep(latency).await;
            Ok(UserProfile {
                user_name: "Sarah Johnson".to_string(),
                user_status: "Premium User".to_string(),
                safety_score: 87,
                wearable: WearableProfile {
                    connected: true,
                    battery: 84,
                    heart_rate: 72,
                    stress_level: "Low".to_string(),
                },
                emergency_contacts: family_contacts(),
            })
        }
    }
}

/// Provider that always fails, for exercising the fallback path.
#[derive(Debug, Clone)]
pub struct FailingProfileProvider {
    pub reason: String,
}

impl ProfileProvider for FailingProfileProvider {
    fn fetch_profile(&self) -> impl Future<Output = Result<UserProfile, ProfileError>> + Send {
        let reason = self.reason.clone();
        async move { Err(ProfileError::Unavailable(reason)) }
    }
}

/// Fetch the profile within `limit`, falling back to [`fallback_profile`].
///
/// Never fails. On error or timeout the user gets one notification.
pub async fn load_profile<P, S>(provider: &P, limit: Duration, sink: &mut S) -> UserProfile
where
    P: ProfileProvider,
    S: NotificationSink,
{
    let outcome = match tokio::time::timeout(limit, provider.fetch_profile()).await {
        Ok(result) => result,
        Err(_) => Err(ProfileError::Timeout(limit)),
    };

    match outcome {
        Ok(profile) => {
            info!(user = %profile.user_name, contacts = profile.emergency_contacts.len(), "profile loaded");
            profile
        }
        Err(err) => {
            let err = CoreError::from(err);
            warn!(error = %err, fallback = err.has_fallback(), "profile unavailable, using fallback");
            sink.notify(Notification::with_duration(
                "⚠️ Couldn't load profile data. Using default profile.",
                FALLBACK_NOTICE_MS,
            ));
            fallback_profile()
        }
    }
}
