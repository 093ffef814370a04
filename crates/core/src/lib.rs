//! # CalPilot Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The parse-and-confirm pipeline (preview, confirmation buffer, publish)
//! - The token limit guard
//! - Port/adapter interfaces (traits) for the parser and the remote store
//! - Calendar view-model helpers (month grid, glance strip)
//!
//! ## Architecture Principles
//! - Only depends on `calpilot-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod buffer;
pub mod calendar;
pub mod events;
pub mod parsing;
pub mod quota;
pub mod user;

// Re-export specific items to avoid ambiguity
pub use buffer::ConfirmationBuffer;
pub use events::ports::EventRepository;
pub use events::EventService;
pub use parsing::ports::EventParser;
pub use parsing::ParsePipeline;
pub use quota::guard::check_limit;
pub use quota::ports::{TokenLedgerRepository, UploadQuotaRepository};
pub use user::ports::{ProfileRepository, SubscriptionRepository};
