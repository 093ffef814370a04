//! Calendar view commands

use std::sync::Arc;
use std::time::Instant;

use calpilot_domain::{CalPilotError, PersistedEvent, Result};
use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Events for the month grid of the given year and month (1-12).
pub async fn list_month(
    ctx: &Arc<AppContext>,
    year: i32,
    month: u32,
) -> Result<Vec<PersistedEvent>> {
    let start = Instant::now();
    let result = run_list_month(ctx, year, month).await;
    log_command_execution("events::list_month", start.elapsed(), result.is_ok());
    result
}

async fn run_list_month(
    ctx: &Arc<AppContext>,
    year: i32,
    month: u32,
) -> Result<Vec<PersistedEvent>> {
    let session = ctx.current_session()?;
    let month = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CalPilotError::InvalidInput(format!("{year}-{month} is not a month")))?;
    ctx.events.list_month(&session, month).await
}

/// Events for the week-at-a-glance strip around today.
pub async fn list_glance(ctx: &Arc<AppContext>) -> Result<Vec<PersistedEvent>> {
    let start = Instant::now();
    let result = run_list_glance(ctx).await;
    log_command_execution("events::list_glance", start.elapsed(), result.is_ok());
    result
}

async fn run_list_glance(ctx: &Arc<AppContext>) -> Result<Vec<PersistedEvent>> {
    let session = ctx.current_session()?;
    ctx.events.list_glance(&session, Local::now().date_naive()).await
}

/// Save edits to a persisted event.
pub async fn update_event(
    ctx: &Arc<AppContext>,
    event: PersistedEvent,
) -> Result<PersistedEvent> {
    let start = Instant::now();
    let result = run_update_event(ctx, event).await;
    log_command_execution("events::update_event", start.elapsed(), result.is_ok());
    result
}

async fn run_update_event(
    ctx: &Arc<AppContext>,
    event: PersistedEvent,
) -> Result<PersistedEvent> {
    let session = ctx.current_session()?;
    ctx.events.update_event(&session, &event).await
}

/// Delete a persisted event.
pub async fn delete_event(ctx: &Arc<AppContext>, id: Uuid) -> Result<()> {
    let start = Instant::now();
    let result = run_delete_event(ctx, id).await;
    log_command_execution("events::delete_event", start.elapsed(), result.is_ok());
    result
}

async fn run_delete_event(ctx: &Arc<AppContext>, id: Uuid) -> Result<()> {
    ctx.current_session()?;
    ctx.events.delete_event(id).await
}
