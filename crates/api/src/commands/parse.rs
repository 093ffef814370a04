//! Parsing and confirmation commands
//!
//! The add-event flow: parse text (or a photo) into the confirmation buffer,
//! let the user edit rows by position, then confirm or cancel. A failed
//! command leaves the buffer exactly as it was.

use std::sync::Arc;
use std::time::Instant;

use calpilot_domain::{CalPilotError, CandidateEvent, PersistedEvent, Result};
use chrono::{NaiveDate, NaiveTime};

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Parse free text and stage the candidates for confirmation.
pub async fn parse_text(ctx: &Arc<AppContext>, text: &str) -> Result<Vec<CandidateEvent>> {
    let start = Instant::now();
    let result = run_parse_text(ctx, text).await;
    log_command_execution("parse::parse_text", start.elapsed(), result.is_ok());
    result
}

async fn run_parse_text(ctx: &Arc<AppContext>, text: &str) -> Result<Vec<CandidateEvent>> {
    let session = ctx.current_session()?;
    let batch = ctx.pipeline.preview_text(&session, text).await?;

    let mut buffer = ctx.buffer.lock().await;
    buffer.replace(batch);
    Ok(buffer.events().to_vec())
}

/// Parse a photographed schedule and stage the candidates for confirmation.
pub async fn parse_image(ctx: &Arc<AppContext>, image: &[u8]) -> Result<Vec<CandidateEvent>> {
    let start = Instant::now();
    let result = run_parse_image(ctx, image).await;
    log_command_execution("parse::parse_image", start.elapsed(), result.is_ok());
    result
}

async fn run_parse_image(ctx: &Arc<AppContext>, image: &[u8]) -> Result<Vec<CandidateEvent>> {
    let session = ctx.current_session()?;
    let batch = ctx.pipeline.preview_image(&session, image).await?;

    let mut buffer = ctx.buffer.lock().await;
    buffer.replace(batch);
    Ok(buffer.events().to_vec())
}

/// The rows currently awaiting confirmation.
pub async fn pending_candidates(ctx: &Arc<AppContext>) -> Vec<CandidateEvent> {
    ctx.buffer.lock().await.events().to_vec()
}

/// Rename one staged row.
pub async fn set_candidate_name(
    ctx: &Arc<AppContext>,
    index: usize,
    name: &str,
) -> Result<Vec<CandidateEvent>> {
    let mut buffer = ctx.buffer.lock().await;
    buffer.set_name(index, name)?;
    Ok(buffer.events().to_vec())
}

/// Re-date one staged row; expects `YYYY-MM-DD` from the date field.
pub async fn set_candidate_date(
    ctx: &Arc<AppContext>,
    index: usize,
    date: &str,
) -> Result<Vec<CandidateEvent>> {
    let date: NaiveDate = date.parse().map_err(|_| {
        CalPilotError::InvalidInput(format!("event_date {date:?} is not a calendar date"))
    })?;

    let mut buffer = ctx.buffer.lock().await;
    buffer.set_date(index, date)?;
    Ok(buffer.events().to_vec())
}

/// Re-time one staged row; an empty string clears the time and makes the
/// row all-day, matching the behaviour of the time input field.
pub async fn set_candidate_time(
    ctx: &Arc<AppContext>,
    index: usize,
    time: &str,
) -> Result<Vec<CandidateEvent>> {
    let time = parse_clock_field(time)?;

    let mut buffer = ctx.buffer.lock().await;
    buffer.set_time(index, time)?;
    Ok(buffer.events().to_vec())
}

/// Re-tag one staged row.
pub async fn set_candidate_tag(
    ctx: &Arc<AppContext>,
    index: usize,
    tag: &str,
) -> Result<Vec<CandidateEvent>> {
    let mut buffer = ctx.buffer.lock().await;
    buffer.set_tag(index, tag)?;
    Ok(buffer.events().to_vec())
}

/// Delete one staged row.
pub async fn remove_candidate(
    ctx: &Arc<AppContext>,
    index: usize,
) -> Result<Vec<CandidateEvent>> {
    let mut buffer = ctx.buffer.lock().await;
    buffer.remove(index)?;
    Ok(buffer.events().to_vec())
}

/// Abandon the staged batch. The preview is never charged.
pub async fn cancel_confirmation(ctx: &Arc<AppContext>) {
    ctx.buffer.lock().await.clear();
}

/// Publish the staged batch and charge the preview's token cost.
pub async fn confirm_events(ctx: &Arc<AppContext>) -> Result<Vec<PersistedEvent>> {
    let start = Instant::now();
    let result = run_confirm_events(ctx).await;
    log_command_execution("parse::confirm_events", start.elapsed(), result.is_ok());
    result
}

async fn run_confirm_events(ctx: &Arc<AppContext>) -> Result<Vec<PersistedEvent>> {
    let session = ctx.current_session()?;
    let mut buffer = ctx.buffer.lock().await;
    ctx.pipeline.publish(&session, &mut buffer).await
}

fn parse_clock_field(value: &str) -> Result<Option<NaiveTime>> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map(Some)
        .map_err(|_| CalPilotError::InvalidInput(format!("event_time {value:?} is not a clock time")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_field_accepts_both_ui_precisions() {
        assert_eq!(
            parse_clock_field("08:30").expect("parses"),
            Some(NaiveTime::from_hms_opt(8, 30, 0).expect("valid")),
        );
        assert_eq!(
            parse_clock_field("08:30:15").expect("parses"),
            Some(NaiveTime::from_hms_opt(8, 30, 15).expect("valid")),
        );
    }

    #[test]
    fn empty_clock_field_clears_the_time() {
        assert_eq!(parse_clock_field("").expect("parses"), None);
    }

    #[test]
    fn nonsense_clock_field_is_invalid_input() {
        let err = parse_clock_field("half past eight").expect_err("rejects");
        assert!(matches!(err, CalPilotError::InvalidInput(_)));
    }
}
