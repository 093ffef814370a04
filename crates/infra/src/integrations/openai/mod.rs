//! OpenAI integration for natural-language event parsing
//!
//! One chat-completion call per parse request, no retry. The model is
//! instructed to return only a JSON array of events; the response is decoded
//! and validated field by field before anything reaches the domain.

pub mod client;
pub mod types;

pub use client::OpenAiParser;
pub use types::ParserError;
