//! Command-surface utilities

pub mod logging;
