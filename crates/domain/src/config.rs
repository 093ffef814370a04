//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TOKEN_LIMIT, DEFAULT_UPLOAD_LIMIT};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub parser: ParserConfig,
    pub quota: QuotaConfig,
}

/// Remote relational store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string (carries credentials, never serialized back out)
    #[serde(skip_serializing)]
    pub url: String,
    pub connect_timeout_seconds: u64,
}

/// Language model parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Model used for free-text parsing
    pub text_model: String,
    /// Model used for schedule-photo parsing
    pub vision_model: String,
    pub timeout_seconds: u64,
}

/// Quota defaults applied when the store has no record for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    pub default_token_limit: i64,
    pub default_upload_limit: i64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_token_limit: DEFAULT_TOKEN_LIMIT,
            default_upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: String::new(),
                connect_timeout_seconds: 30,
            },
            parser: ParserConfig {
                api_key: String::new(),
                text_model: "gpt-4o-mini".to_string(),
                vision_model: "gpt-4o".to_string(),
                timeout_seconds: 30,
            },
            quota: QuotaConfig::default(),
        }
    }
}
