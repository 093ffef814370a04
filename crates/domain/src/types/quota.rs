//! Token and upload quota records
//!
//! One record per user in the remote store. Absence of a record is not an
//! error: callers treat it as zero usage under the default limit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TOKEN_LIMIT, DEFAULT_UPLOAD_LIMIT};

/// Per-user language-model token budget.
///
/// `tokens_used` is monotonically non-decreasing; resets happen through an
/// external process outside this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsageLedger {
    #[serde(rename = "user_id")]
    pub owner_id: String,
    pub tokens_used: i64,
    pub tokens_limit: i64,
    pub reset_at: Option<DateTime<Utc>>,
}

impl TokenUsageLedger {
    /// The ledger callers assume when the store has no record for the user.
    pub fn absent(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            tokens_used: 0,
            tokens_limit: DEFAULT_TOKEN_LIMIT,
            reset_at: None,
        }
    }

    pub fn remaining(&self) -> i64 {
        (self.tokens_limit - self.tokens_used).max(0)
    }
}

/// Per-user schedule-photo upload budget, consumed by the image parse path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadQuota {
    #[serde(rename = "user_id")]
    pub owner_id: String,
    pub uploads_used: i64,
    pub uploads_limit: i64,
    pub reset_at: Option<DateTime<Utc>>,
}

impl UploadQuota {
    /// The quota callers assume when the store has no record for the user.
    pub fn absent(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            uploads_used: 0,
            uploads_limit: DEFAULT_UPLOAD_LIMIT,
            reset_at: None,
        }
    }

    pub fn has_remaining(&self) -> bool {
        self.uploads_used < self.uploads_limit
    }
}
