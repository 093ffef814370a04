//! Profile and subscription commands

use std::sync::Arc;
use std::time::Instant;

use calpilot_domain::{Profile, ProfileUpdate, Result, Subscription};

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// The user's profile, if one exists.
pub async fn get_profile(ctx: &Arc<AppContext>) -> Result<Option<Profile>> {
    let start = Instant::now();
    let result = run_get_profile(ctx).await;
    log_command_execution("profile::get_profile", start.elapsed(), result.is_ok());
    result
}

async fn run_get_profile(ctx: &Arc<AppContext>) -> Result<Option<Profile>> {
    let session = ctx.current_session()?;
    ctx.profiles.get_profile(&session.owner_id).await
}

/// Apply settings-screen edits to the profile.
pub async fn update_profile(ctx: &Arc<AppContext>, update: ProfileUpdate) -> Result<Profile> {
    let start = Instant::now();
    let result = run_update_profile(ctx, update).await;
    log_command_execution("profile::update_profile", start.elapsed(), result.is_ok());
    result
}

async fn run_update_profile(ctx: &Arc<AppContext>, update: ProfileUpdate) -> Result<Profile> {
    let session = ctx.current_session()?;
    ctx.profiles.update_profile(&session.owner_id, &update).await
}

/// The user's newest subscription record, if any.
pub async fn get_subscription(ctx: &Arc<AppContext>) -> Result<Option<Subscription>> {
    let start = Instant::now();
    let result = run_get_subscription(ctx).await;
    log_command_execution("profile::get_subscription", start.elapsed(), result.is_ok());
    result
}

async fn run_get_subscription(ctx: &Arc<AppContext>) -> Result<Option<Subscription>> {
    let session = ctx.current_session()?;
    ctx.subscriptions.get_subscription(&session.owner_id).await
}
