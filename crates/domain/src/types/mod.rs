//! Domain types and models

pub mod event;
pub mod quota;
pub mod session;
pub mod user;

// Re-export the types the rest of the workspace uses by name
pub use event::{CandidateEvent, DateRange, ParsedBatch, PersistedEvent};
pub use quota::{TokenUsageLedger, UploadQuota};
pub use session::Session;
pub use user::{
    Profile, ProfileUpdate, Subscription, SubscriptionStatus, SubscriptionTier, ThemePreference,
};
