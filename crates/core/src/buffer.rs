//! Confirmation buffer - the user-editable staging area for parsed events
//!
//! In-memory, single-writer, scoped to one parsing session. Holds the
//! candidate events returned by a successful preview together with the token
//! cost that preview reported, so publishing can charge exactly what was
//! previewed. Clearing is terminal for the session; there is no undo.

use calpilot_domain::{CalPilotError, CandidateEvent, ParsedBatch, Result};
use chrono::{NaiveDate, NaiveTime};

/// Ordered sequence of candidate events awaiting publication.
#[derive(Debug, Default)]
pub struct ConfirmationBuffer {
    events: Vec<CandidateEvent>,
    tokens_used: i64,
}

impl ConfirmationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole sequence with the result of a successful parse.
    pub fn replace(&mut self, batch: ParsedBatch) {
        self.events = batch.events;
        self.tokens_used = batch.tokens_used;
    }

    pub fn events(&self) -> &[CandidateEvent] {
        &self.events
    }

    /// Token cost reported by the preview that filled this buffer.
    pub fn tokens_used(&self) -> i64 {
        self.tokens_used
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn set_name(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.event_mut(index)?.set_name(name);
        Ok(())
    }

    pub fn set_date(&mut self, index: usize, date: NaiveDate) -> Result<()> {
        self.event_mut(index)?.set_date(date);
        Ok(())
    }

    /// Set or clear the time of one row; the all-day flag follows the time.
    pub fn set_time(&mut self, index: usize, time: Option<NaiveTime>) -> Result<()> {
        self.event_mut(index)?.set_time(time);
        Ok(())
    }

    pub fn set_tag(&mut self, index: usize, tag: impl Into<String>) -> Result<()> {
        self.event_mut(index)?.set_tag(tag);
        Ok(())
    }

    /// Remove one row by position, preserving the order of the rest.
    pub fn remove(&mut self, index: usize) -> Result<CandidateEvent> {
        if index >= self.events.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.events.remove(index))
    }

    /// Discard the session: empties the sequence and forgets the token cost.
    pub fn clear(&mut self) {
        self.events.clear();
        self.tokens_used = 0;
    }

    fn event_mut(&mut self, index: usize) -> Result<&mut CandidateEvent> {
        let len = self.events.len();
        self.events.get_mut(index).ok_or_else(|| {
            CalPilotError::InvalidInput(format!(
                "candidate index {index} out of range for buffer of {len}"
            ))
        })
    }

    fn out_of_range(&self, index: usize) -> CalPilotError {
        CalPilotError::InvalidInput(format!(
            "candidate index {index} out of range for buffer of {}",
            self.events.len()
        ))
    }
}
