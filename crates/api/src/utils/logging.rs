use std::time::Duration;

use calpilot_domain::CalPilotError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialise structured logging for the embedding shell.
///
/// Respects `RUST_LOG`, defaulting to `info`. Safe to call more than once;
/// only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"parse::parse_text"`).
/// * `elapsed` - Duration the command execution took.
/// * `success` - Whether the command completed successfully.
///
/// The helper keeps the command wrappers concise and the log shape uniform.
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `CalPilotError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &CalPilotError) -> &'static str {
    match error {
        CalPilotError::Database(_) => "database",
        CalPilotError::Config(_) => "config",
        CalPilotError::Network(_) => "network",
        CalPilotError::Auth(_) => "auth",
        CalPilotError::NotFound(_) => "not_found",
        CalPilotError::InvalidInput(_) => "invalid_input",
        CalPilotError::ParseFailure(_) => "parse_failure",
        CalPilotError::SafeguardExceeded(_) => "safeguard_exceeded",
        CalPilotError::QuotaExceeded(_) => "quota_exceeded",
        CalPilotError::Internal(_) => "internal",
    }
}
