//! Calendar event types
//!
//! `CandidateEvent` is the unit the whole pipeline moves around: produced by
//! the language model parser, edited in the confirmation buffer, persisted by
//! the event store. The all-day flag is not an independent field: it is
//! derived from the presence of a time at every point an event is constructed
//! or its time is mutated, so `is_all_day == time.is_none()` holds everywhere
//! downstream of this module.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A parsed, not-yet-persisted calendar entry awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateEvent {
    #[serde(rename = "event_name")]
    name: String,
    #[serde(rename = "event_date")]
    date: NaiveDate,
    #[serde(rename = "event_time")]
    time: Option<NaiveTime>,
    #[serde(rename = "event_tag")]
    tag: String,
    is_all_day: bool,
}

impl CandidateEvent {
    /// Create a candidate event. The all-day flag is derived from `time`.
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        time: Option<NaiveTime>,
        tag: impl Into<String>,
    ) -> Self {
        Self { name: name.into(), date, time, tag: tag.into(), is_all_day: time.is_none() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_all_day(&self) -> bool {
        self.is_all_day
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Change or clear the event time, re-deriving the all-day flag.
    pub fn set_time(&mut self, time: Option<NaiveTime>) {
        self.time = time;
        self.is_all_day = time.is_none();
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }
}

// Deserialization funnels through the constructor so an inconsistent
// `is_all_day` on the wire can never reach the domain.
impl<'de> Deserialize<'de> for CandidateEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            event_name: String,
            event_date: NaiveDate,
            #[serde(default)]
            event_time: Option<NaiveTime>,
            #[serde(default)]
            event_tag: Option<String>,
        }

        let wire = Wire::deserialize(deserializer)?;
        Ok(Self::new(
            wire.event_name,
            wire.event_date,
            wire.event_time,
            wire.event_tag.unwrap_or_default(),
        ))
    }
}

/// A calendar entry owned by the remote store.
///
/// Identity and timestamps are assigned by the store; this core only ever
/// holds a read-only cached copy, refreshed after each mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedEvent {
    pub id: Uuid,
    #[serde(rename = "user_id")]
    pub owner_id: String,
    #[serde(flatten)]
    pub event: CandidateEvent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }
}

/// Result of one language-model parse call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedBatch {
    pub events: Vec<CandidateEvent>,
    /// Provider-reported token total for this single call, taken verbatim.
    pub tokens_used: i64,
}
