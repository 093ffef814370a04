//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for CalPilot
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CalPilotError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model response could not be decoded into candidate events.
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// A single parse request exceeded the fixed per-request token cap.
    #[error("Token safeguard exceeded: {0}")]
    SafeguardExceeded(String),

    /// The user's cumulative token budget would be exceeded.
    #[error("Token limit exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for CalPilot operations
pub type Result<T> = std::result::Result<T, CalPilotError>;
