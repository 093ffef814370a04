//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CALPILOT_DATABASE_URL`: Remote store connection string (required)
//! - `CALPILOT_OPENAI_API_KEY`: Language model API key (required)
//! - `CALPILOT_TEXT_MODEL`: Model for free-text parsing (optional)
//! - `CALPILOT_VISION_MODEL`: Model for schedule-photo parsing (optional)
//! - `CALPILOT_PARSER_TIMEOUT_SECONDS`: Parse call timeout (optional)
//! - `CALPILOT_DB_CONNECT_TIMEOUT_SECONDS`: Store connect timeout (optional)
//! - `CALPILOT_TOKEN_LIMIT`: Default token budget for new users (optional)
//! - `CALPILOT_UPLOAD_LIMIT`: Default upload budget for new users (optional)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./calpilot.json` or `./calpilot.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use calpilot_domain::{CalPilotError, Config, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `CalPilotError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The two required variables must be present; everything else falls back to
/// the defaults in [`Config::default`].
///
/// # Errors
/// Returns `CalPilotError::Config` if required variables are missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.url = env_var("CALPILOT_DATABASE_URL")?;
    config.parser.api_key = env_var("CALPILOT_OPENAI_API_KEY")?;

    if let Ok(model) = std::env::var("CALPILOT_TEXT_MODEL") {
        config.parser.text_model = model;
    }
    if let Ok(model) = std::env::var("CALPILOT_VISION_MODEL") {
        config.parser.vision_model = model;
    }
    if let Some(timeout) = env_parse::<u64>("CALPILOT_PARSER_TIMEOUT_SECONDS")? {
        config.parser.timeout_seconds = timeout;
    }
    if let Some(timeout) = env_parse::<u64>("CALPILOT_DB_CONNECT_TIMEOUT_SECONDS")? {
        config.database.connect_timeout_seconds = timeout;
    }
    if let Some(limit) = env_parse::<i64>("CALPILOT_TOKEN_LIMIT")? {
        config.quota.default_token_limit = limit;
    }
    if let Some(limit) = env_parse::<i64>("CALPILOT_UPLOAD_LIMIT")? {
        config.quota.default_upload_limit = limit;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CalPilotError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CalPilotError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CalPilotError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CalPilotError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CalPilotError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CalPilotError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CalPilotError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("calpilot.json"),
            cwd.join("calpilot.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("calpilot.json"),
                exe_dir.join("calpilot.toml"),
            ]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        CalPilotError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional numeric environment variable
///
/// Returns `Ok(None)` when the variable is not set, an error when it is set
/// but does not parse.
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| CalPilotError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}
