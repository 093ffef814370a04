//! Port interfaces for profile and subscription records

use async_trait::async_trait;
use calpilot_domain::{Profile, ProfileUpdate, Result, Subscription};

/// Trait for profile CRUD
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Get a user's profile, `None` when no record exists
    async fn get_profile(&self, owner_id: &str) -> Result<Option<Profile>>;

    /// Apply a partial update and return the stored profile
    async fn update_profile(&self, owner_id: &str, update: &ProfileUpdate) -> Result<Profile>;
}

/// Trait for reading subscription records
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Get a user's subscription, `None` when no record exists
    async fn get_subscription(&self, owner_id: &str) -> Result<Option<Subscription>>;
}
