//! Port interfaces for the remote event store

use async_trait::async_trait;
use calpilot_domain::{CandidateEvent, DateRange, PersistedEvent, Result};
use uuid::Uuid;

/// Trait for persisting calendar events
///
/// Every operation is all-or-nothing per call from the core's perspective:
/// a partial store failure surfaces as a single error with nothing assumed
/// committed, and no rollback is attempted on this side.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a confirmed batch in one call, returning the stored rows
    async fn create_events(
        &self,
        owner_id: &str,
        events: &[CandidateEvent],
    ) -> Result<Vec<PersistedEvent>>;

    /// Events for a user within an inclusive date range, ascending by date
    async fn list_events(&self, owner_id: &str, range: DateRange) -> Result<Vec<PersistedEvent>>;

    /// Update an existing event, returning the stored row
    async fn update_event(&self, event: &PersistedEvent) -> Result<PersistedEvent>;

    /// Delete an event by id
    async fn delete_event(&self, id: Uuid) -> Result<()>;
}
