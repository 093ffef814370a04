//! Port interfaces for quota records

use async_trait::async_trait;
use calpilot_domain::{Result, TokenUsageLedger, UploadQuota};

/// Trait for reading and committing token usage
///
/// `update_token_usage` is a read-then-increment pair, not a compare-and-swap:
/// concurrent publishes by the same user can race and lose updates. This is an
/// accepted limitation of the design, not a guarantee.
#[async_trait]
pub trait TokenLedgerRepository: Send + Sync {
    /// Get the ledger for a user, `None` when no record exists yet
    async fn get_token_usage(&self, owner_id: &str) -> Result<Option<TokenUsageLedger>>;

    /// Add `delta` tokens to the user's usage and return the updated ledger
    async fn update_token_usage(&self, owner_id: &str, delta: i64) -> Result<TokenUsageLedger>;
}

/// Trait for the schedule-photo upload budget
#[async_trait]
pub trait UploadQuotaRepository: Send + Sync {
    /// Get the upload quota for a user, `None` when no record exists yet
    async fn get_upload_quota(&self, owner_id: &str) -> Result<Option<UploadQuota>>;

    /// Consume one upload and return the updated quota
    async fn increment_upload_usage(&self, owner_id: &str) -> Result<UploadQuota>;
}
