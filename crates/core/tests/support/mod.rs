//! Shared helpers for core integration tests

pub mod repositories;

use calpilot_domain::{CandidateEvent, ParsedBatch};
use chrono::{NaiveDate, NaiveTime};

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

pub fn time(s: &str) -> NaiveTime {
    s.parse().expect("valid time")
}

/// The parsed batch for "I have a meeting on October 3rd at 8:30 am".
pub fn meeting_batch() -> ParsedBatch {
    ParsedBatch {
        events: vec![CandidateEvent::new(
            "meeting",
            date("2025-10-03"),
            Some(time("08:30:00")),
            "",
        )],
        tokens_used: 120,
    }
}
