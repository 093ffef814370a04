//! Event service - calendar view access to persisted events

use std::sync::Arc;

use calpilot_domain::{CalPilotError, DateRange, PersistedEvent, Result, Session};
use chrono::NaiveDate;
use uuid::Uuid;

use super::ports::EventRepository;
use crate::calendar;

/// Event service backing the month grid and glance strip
pub struct EventService {
    repository: Arc<dyn EventRepository>,
}

impl EventService {
    /// Create a new event service
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        Self { repository }
    }

    /// Events within an arbitrary inclusive range, ascending by date
    pub async fn list_range(
        &self,
        session: &Session,
        range: DateRange,
    ) -> Result<Vec<PersistedEvent>> {
        self.repository.list_events(&session.owner_id, range).await
    }

    /// Events for the month containing `month`, for the month grid
    pub async fn list_month(
        &self,
        session: &Session,
        month: NaiveDate,
    ) -> Result<Vec<PersistedEvent>> {
        self.list_range(session, calendar::month_range(month)).await
    }

    /// Events for the glance strip around `today`
    pub async fn list_glance(
        &self,
        session: &Session,
        today: NaiveDate,
    ) -> Result<Vec<PersistedEvent>> {
        self.list_range(session, calendar::glance_range(today)).await
    }

    /// Update an existing event owned by the current session
    pub async fn update_event(
        &self,
        session: &Session,
        event: &PersistedEvent,
    ) -> Result<PersistedEvent> {
        if event.owner_id != session.owner_id {
            return Err(CalPilotError::Auth(
                "event does not belong to the current session".into(),
            ));
        }
        self.repository.update_event(event).await
    }

    /// Delete an event by id
    pub async fn delete_event(&self, id: Uuid) -> Result<()> {
        self.repository.delete_event(id).await
    }
}
