//! OpenAI API types for event parsing
use calpilot_domain::{CalPilotError, CandidateEvent};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Parsing client error types
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// Network-level error (connection failed, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// The model endpoint returned an error response
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication failed (invalid API key)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Response body was not the expected JSON shape; carries the raw text
    /// for operator diagnosis
    #[error("Invalid response: {message}; raw response: {raw}")]
    InvalidResponse { message: String, raw: String },

    /// One event in an otherwise well-formed array had an unusable field
    #[error("Invalid event at index {index}: field {field} {message}")]
    InvalidField { index: usize, field: &'static str, message: String },
}

impl From<ParserError> for CalPilotError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::Network(msg) => Self::Network(msg),
            ParserError::Api { status, message } => {
                Self::Network(format!("language model API error (status {status}): {message}"))
            }
            ParserError::Authentication(msg) => Self::Auth(msg),
            other @ (ParserError::InvalidResponse { .. } | ParserError::InvalidField { .. }) => {
                Self::ParseFailure(other.to_string())
            }
        }
    }
}

/// One event as the model returns it, before validation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ParsedEventWire {
    pub event_name: String,
    pub event_date: String,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub event_tag: Option<String>,
    // The model also reports is_all_day; it is ignored here because the flag
    // is derived from the presence of a time when the domain event is built.
}

impl ParsedEventWire {
    /// Validate the wire event into a domain candidate, reporting the exact
    /// field that failed.
    pub(crate) fn into_candidate(self, index: usize) -> Result<CandidateEvent, ParserError> {
        let date = NaiveDate::parse_from_str(&self.event_date, "%Y-%m-%d").map_err(|err| {
            ParserError::InvalidField {
                index,
                field: "event_date",
                message: format!("{:?} is not a calendar date: {err}", self.event_date),
            }
        })?;

        let time = match self.event_time.as_deref().filter(|value| !value.is_empty()) {
            Some(value) => Some(parse_clock_time(value).ok_or_else(|| {
                ParserError::InvalidField {
                    index,
                    field: "event_time",
                    message: format!("{value:?} is not a clock time"),
                }
            })?),
            None => None,
        };

        Ok(CandidateEvent::new(self.event_name, date, time, self.event_tag.unwrap_or_default()))
    }
}

fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Internal types for the OpenAI Chat Completions API
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

/// Plain text for text parsing, content parts for image parsing.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub(crate) enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

/// Response from the OpenAI Chat Completions API
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Usage {
    pub total_tokens: i32,
}
