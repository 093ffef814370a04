//! # CalPilot App
//!
//! The embedding surface for the UI shell: application context wiring,
//! session handling, and the command functions the screens call.
//!
//! The crate is a library on purpose - this core owns no CLI, no listening
//! port and no binary; it is an outbound API client embedded in a UI.

pub mod commands;
pub mod context;
pub mod utils;

pub use context::{AppContext, AppContextBuilder};
pub use utils::logging::init_tracing;
