//! Quota display commands
//!
//! The settings and add-event screens show remaining budget. A user without
//! a store record sees the defaults, never an error.

use std::sync::Arc;
use std::time::Instant;

use calpilot_domain::{Result, TokenUsageLedger, UploadQuota};

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// The user's token ledger, with defaults when no record exists yet.
pub async fn get_token_usage(ctx: &Arc<AppContext>) -> Result<TokenUsageLedger> {
    let start = Instant::now();
    let result = run_get_token_usage(ctx).await;
    log_command_execution("quota::get_token_usage", start.elapsed(), result.is_ok());
    result
}

async fn run_get_token_usage(ctx: &Arc<AppContext>) -> Result<TokenUsageLedger> {
    let session = ctx.current_session()?;
    let ledger = ctx.ledger.get_token_usage(&session.owner_id).await?;
    Ok(ledger.unwrap_or_else(|| TokenUsageLedger::absent(session.owner_id.as_str())))
}

/// The user's upload quota, with defaults when no record exists yet.
pub async fn get_upload_quota(ctx: &Arc<AppContext>) -> Result<UploadQuota> {
    let start = Instant::now();
    let result = run_get_upload_quota(ctx).await;
    log_command_execution("quota::get_upload_quota", start.elapsed(), result.is_ok());
    result
}

async fn run_get_upload_quota(ctx: &Arc<AppContext>) -> Result<UploadQuota> {
    let session = ctx.current_session()?;
    let quota = ctx.uploads.get_upload_quota(&session.owner_id).await?;
    Ok(quota.unwrap_or_else(|| UploadQuota::absent(session.owner_id.as_str())))
}
