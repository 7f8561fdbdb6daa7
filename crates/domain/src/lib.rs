//! SafeSpace domain services
//!
//! Everything around the two core components that the host wires together:
//! - Profile loading with a guest fallback
//! - Persisted settings and their toggles
//! - The rule-based safety assistant
//! - Fake calls and route planning

pub mod assistant;
pub mod profile;
pub mod settings;
pub mod tools;

pub use assistant::{quick_response, Assistant, AssistantContext, ChatMessage, QuickResponse, Sender};
pub use profile::{
    fallback_profile, load_profile, FailingProfileProvider, MockProfileProvider, ProfileError,
    ProfileContact, ProfileProvider, UserProfile, WearableProfile,
};
pub use settings::{
    BiometricKind, FileSettingsStore, MemorySettingsStore, SettingKey, Settings, SettingsError,
    SettingsManager, SettingsStore,
};
pub use tools::{FakeCaller, RouteEstimate, RouteKind, FAKE_CALL_RING_MS, ROUTE_CALCULATION_MS};
