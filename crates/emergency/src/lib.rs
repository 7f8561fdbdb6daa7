//! Panic mode for the SafeSpace companion.
//!
//! [`EmergencyStateMachine`] owns the panic-mode state, the emergency contact
//! book and every delayed effect the emergency protocol schedules.

pub mod contacts;
pub mod machine;
pub mod state;

pub use contacts::{ContactBook, ContactError, EmergencyContact, DEFAULT_AVATAR};
pub use machine::EmergencyStateMachine;
pub use state::{EmergencyMode, EmergencyState, Transition};
