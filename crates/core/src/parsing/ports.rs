//! Port interfaces for language-model parsing

use async_trait::async_trait;
use calpilot_domain::{ParsedBatch, Result};

/// Trait for turning free text or a schedule photo into candidate events
///
/// Implementations make exactly one network attempt per call: transient
/// failures propagate to the caller unchanged, and nothing is retried.
#[async_trait]
pub trait EventParser: Send + Sync {
    /// Parse free text into candidate events plus the call's token cost
    async fn parse_text(&self, text: &str) -> Result<ParsedBatch>;

    /// Parse a photographed schedule into candidate events plus token cost
    async fn parse_image(&self, image: &[u8]) -> Result<ParsedBatch>;
}
