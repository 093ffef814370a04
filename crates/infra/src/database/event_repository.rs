//! Event Repository implementation
//!
//! Persists confirmed calendar events in the remote store. The batch insert
//! is issued as a single statement so the whole batch commits or none of it
//! does, matching the all-or-nothing contract of the port.

use std::sync::Arc;

use async_trait::async_trait;
use calpilot_core::events::ports::EventRepository as EventRepositoryPort;
use calpilot_domain::{
    CalPilotError, CandidateEvent, DateRange, PersistedEvent, Result as DomainResult,
};
use chrono::{NaiveDate, NaiveTime};
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;
use uuid::Uuid;

use super::store::PgStore;
use crate::errors::InfraError;

const EVENT_COLUMNS: &str =
    "id, user_id, event_name, event_date, event_time, event_tag, is_all_day, created_at, updated_at";

const INSERT_COLUMN_COUNT: usize = 6;

/// Postgres-backed event repository
pub struct PgEventRepository {
    store: Arc<PgStore>,
}

impl PgEventRepository {
    pub fn new(store: Arc<PgStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventRepositoryPort for PgEventRepository {
    async fn create_events(
        &self,
        owner_id: &str,
        events: &[CandidateEvent],
    ) -> DomainResult<Vec<PersistedEvent>> {
        if events.is_empty() {
            return Ok(vec![]);
        }

        // Owned copies of the per-row values so the parameter slice can
        // borrow them uniformly.
        struct NewRow {
            name: String,
            date: NaiveDate,
            time: Option<NaiveTime>,
            tag: String,
            all_day: bool,
        }

        let rows: Vec<NewRow> = events
            .iter()
            .map(|event| NewRow {
                name: event.name().to_string(),
                date: event.date(),
                time: event.time(),
                tag: event.tag().to_string(),
                all_day: event.is_all_day(),
            })
            .collect();

        let mut params: Vec<&(dyn ToSql + Sync)> =
            Vec::with_capacity(rows.len() * INSERT_COLUMN_COUNT);
        for row in &rows {
            params.push(&owner_id);
            params.push(&row.name);
            params.push(&row.date);
            params.push(&row.time);
            params.push(&row.tag);
            params.push(&row.all_day);
        }

        let sql = format!(
            "INSERT INTO events (user_id, event_name, event_date, event_time, event_tag, is_all_day)
             VALUES {}
             RETURNING {EVENT_COLUMNS}",
            values_clause(rows.len(), INSERT_COLUMN_COUNT)
        );

        let inserted =
            self.store.client().query(&sql, &params).await.map_err(map_store_error)?;

        inserted.iter().map(map_event_row).collect()
    }

    async fn list_events(
        &self,
        owner_id: &str,
        range: DateRange,
    ) -> DomainResult<Vec<PersistedEvent>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS}
             FROM events
             WHERE user_id = $1 AND event_date >= $2 AND event_date <= $3
             ORDER BY event_date ASC"
        );

        let rows = self
            .store
            .client()
            .query(&sql, &[&owner_id, &range.start, &range.end])
            .await
            .map_err(map_store_error)?;

        rows.iter().map(map_event_row).collect()
    }

    async fn update_event(&self, event: &PersistedEvent) -> DomainResult<PersistedEvent> {
        let sql = format!(
            "UPDATE events
             SET event_name = $2, event_date = $3, event_time = $4, event_tag = $5,
                 is_all_day = $6, updated_at = now()
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );

        let row = self
            .store
            .client()
            .query_opt(
                &sql,
                &[
                    &event.id,
                    &event.event.name(),
                    &event.event.date(),
                    &event.event.time(),
                    &event.event.tag(),
                    &event.event.is_all_day(),
                ],
            )
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| CalPilotError::NotFound(format!("event {}", event.id)))?;

        map_event_row(&row)
    }

    async fn delete_event(&self, id: Uuid) -> DomainResult<()> {
        let deleted = self
            .store
            .client()
            .execute("DELETE FROM events WHERE id = $1", &[&id])
            .await
            .map_err(map_store_error)?;

        if deleted == 0 {
            return Err(CalPilotError::NotFound(format!("event {id}")));
        }
        Ok(())
    }
}

// ============================================================================
// SQL helpers
// ============================================================================

/// `($1,$2,...),($7,$8,...)` placeholders for a multi-row insert.
fn values_clause(rows: usize, columns: usize) -> String {
    let mut clause = String::new();
    for row in 0..rows {
        if row > 0 {
            clause.push_str(", ");
        }
        clause.push('(');
        for column in 0..columns {
            if column > 0 {
                clause.push_str(", ");
            }
            clause.push_str(&format!("${}", row * columns + column + 1));
        }
        clause.push(')');
    }
    clause
}

fn map_event_row(row: &Row) -> DomainResult<PersistedEvent> {
    let name: String = row.try_get("event_name").map_err(map_store_error)?;
    let date: NaiveDate = row.try_get("event_date").map_err(map_store_error)?;
    let time: Option<NaiveTime> = row.try_get("event_time").map_err(map_store_error)?;
    let tag: String = row.try_get("event_tag").map_err(map_store_error)?;

    Ok(PersistedEvent {
        id: row.try_get("id").map_err(map_store_error)?,
        owner_id: row.try_get("user_id").map_err(map_store_error)?,
        event: CandidateEvent::new(name, date, time, tag),
        created_at: row.try_get("created_at").map_err(map_store_error)?,
        updated_at: row.try_get("updated_at").map_err(map_store_error)?,
    })
}

fn map_store_error(err: tokio_postgres::Error) -> CalPilotError {
    CalPilotError::from(InfraError::from(err))
}
