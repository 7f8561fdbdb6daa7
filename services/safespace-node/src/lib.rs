//! SafeSpace host process
//!
//! The binary wires timers and stdin into [`app::App`]; the library half
//! exists so the integration suite can drive the same application state.

pub mod app;
pub mod commands;

pub use app::{App, Event, Now, Response};
pub use commands::{Command, CommandError, ToggleTarget};
