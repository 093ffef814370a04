//! Parse pipeline - core business logic
//!
//! Drives the whole flow: free text (or a schedule photo) through the parser,
//! the limit guard, the confirmation buffer, and finally the event store plus
//! the usage ledger. One model call per batch: the token cost reported at
//! preview time is carried in the buffer and charged at publish time.

use std::sync::Arc;

use calpilot_domain::{
    CalPilotError, ParsedBatch, PersistedEvent, QuotaConfig, Result, Session, TokenUsageLedger,
    UploadQuota,
};
use tracing::{debug, info};

use super::ports::EventParser;
use crate::buffer::ConfirmationBuffer;
use crate::events::ports::EventRepository;
use crate::quota::guard::check_limit;
use crate::quota::ports::{TokenLedgerRepository, UploadQuotaRepository};

/// Parse pipeline service for converting user input into persisted events
pub struct ParsePipeline {
    parser: Arc<dyn EventParser>,
    events: Arc<dyn EventRepository>,
    ledger: Arc<dyn TokenLedgerRepository>,
    uploads: Arc<dyn UploadQuotaRepository>,
    quota: QuotaConfig,
}

impl ParsePipeline {
    /// Create a new parse pipeline
    pub fn new(
        parser: Arc<dyn EventParser>,
        events: Arc<dyn EventRepository>,
        ledger: Arc<dyn TokenLedgerRepository>,
        uploads: Arc<dyn UploadQuotaRepository>,
    ) -> Self {
        Self { parser, events, ledger, uploads, quota: QuotaConfig::default() }
    }

    /// Override the quota defaults assumed for users without a ledger record.
    pub fn with_quota(mut self, quota: QuotaConfig) -> Self {
        self.quota = quota;
        self
    }

    /// Parse free text into a candidate batch, gated by the limit guard.
    ///
    /// Empty or whitespace-only text never reaches the model. On a guard
    /// failure no buffer is populated and the event store is never called;
    /// an abandoned preview is never charged.
    pub async fn preview_text(&self, session: &Session, text: &str) -> Result<ParsedBatch> {
        if text.trim().is_empty() {
            return Err(CalPilotError::InvalidInput(
                "cannot parse empty or whitespace-only text".into(),
            ));
        }

        let ledger = self.current_ledger(&session.owner_id).await?;
        let batch = self.parser.parse_text(text).await?;
        check_limit(batch.tokens_used, ledger.tokens_used, ledger.tokens_limit)?;

        info!(
            owner_id = %session.owner_id,
            events = batch.events.len(),
            tokens = batch.tokens_used,
            "text preview parsed"
        );

        Ok(batch)
    }

    /// Parse a schedule photo into a candidate batch.
    ///
    /// In addition to the token guard, the image path requires remaining
    /// upload quota and consumes one upload once the guard has passed.
    pub async fn preview_image(&self, session: &Session, image: &[u8]) -> Result<ParsedBatch> {
        if image.is_empty() {
            return Err(CalPilotError::InvalidInput("cannot parse an empty image".into()));
        }

        let quota = self.current_upload_quota(&session.owner_id).await?;
        if !quota.has_remaining() {
            return Err(CalPilotError::QuotaExceeded(format!(
                "all {} schedule uploads used",
                quota.uploads_limit
            )));
        }

        let ledger = self.current_ledger(&session.owner_id).await?;
        let batch = self.parser.parse_image(image).await?;
        check_limit(batch.tokens_used, ledger.tokens_used, ledger.tokens_limit)?;

        let quota = self.uploads.increment_upload_usage(&session.owner_id).await?;
        info!(
            owner_id = %session.owner_id,
            events = batch.events.len(),
            tokens = batch.tokens_used,
            uploads_used = quota.uploads_used,
            "image preview parsed"
        );

        Ok(batch)
    }

    /// Publish the confirmed buffer: persist the batch, then charge the
    /// ledger with the token cost captured at preview time.
    ///
    /// The batch insert is all-or-nothing, so a store failure leaves the
    /// buffer untouched for another attempt. Once the events are persisted
    /// the buffer is cleared before the charge is committed; a charge
    /// failure then surfaces as an error without risking a double publish.
    pub async fn publish(
        &self,
        session: &Session,
        buffer: &mut ConfirmationBuffer,
    ) -> Result<Vec<PersistedEvent>> {
        if buffer.is_empty() {
            return Err(CalPilotError::InvalidInput("nothing to publish".into()));
        }

        let persisted = self.events.create_events(&session.owner_id, buffer.events()).await?;

        let charged = buffer.tokens_used();
        buffer.clear();

        if charged > 0 {
            let ledger = self.ledger.update_token_usage(&session.owner_id, charged).await?;
            debug!(
                owner_id = %session.owner_id,
                charged,
                tokens_used = ledger.tokens_used,
                "token usage committed"
            );
        }

        info!(owner_id = %session.owner_id, published = persisted.len(), "batch published");

        Ok(persisted)
    }

    async fn current_ledger(&self, owner_id: &str) -> Result<TokenUsageLedger> {
        Ok(self.ledger.get_token_usage(owner_id).await?.unwrap_or_else(|| TokenUsageLedger {
            owner_id: owner_id.to_string(),
            tokens_used: 0,
            tokens_limit: self.quota.default_token_limit,
            reset_at: None,
        }))
    }

    async fn current_upload_quota(&self, owner_id: &str) -> Result<UploadQuota> {
        Ok(self.uploads.get_upload_quota(owner_id).await?.unwrap_or_else(|| UploadQuota {
            owner_id: owner_id.to_string(),
            uploads_used: 0,
            uploads_limit: self.quota.default_upload_limit,
            reset_at: None,
        }))
    }
}
