//! Subscription Repository implementation
//!
//! Read-only: subscriptions are created and transitioned by the billing
//! backend, this core only shows the newest record.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use calpilot_core::user::ports::SubscriptionRepository as SubscriptionRepositoryPort;
use calpilot_domain::{
    CalPilotError, Result as DomainResult, Subscription, SubscriptionStatus, SubscriptionTier,
};
use tokio_postgres::Row;
use uuid::Uuid;

use super::store::PgStore;
use crate::errors::InfraError;

/// Postgres-backed subscription repository
pub struct PgSubscriptionRepository {
    store: Arc<PgStore>,
}

impl PgSubscriptionRepository {
    pub fn new(store: Arc<PgStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SubscriptionRepositoryPort for PgSubscriptionRepository {
    async fn get_subscription(&self, owner_id: &str) -> DomainResult<Option<Subscription>> {
        let sql = "SELECT id, user_id, tier, status, started_at, expires_at, created_at
                   FROM subscriptions
                   WHERE user_id = $1
                   ORDER BY created_at DESC
                   LIMIT 1";

        let row = self
            .store
            .client()
            .query_opt(sql, &[&owner_id])
            .await
            .map_err(map_store_error)?;

        row.as_ref().map(map_subscription_row).transpose()
    }
}

fn map_subscription_row(row: &Row) -> DomainResult<Subscription> {
    let id: Uuid = row.try_get("id").map_err(map_store_error)?;
    let tier: String = row.try_get("tier").map_err(map_store_error)?;
    let status: String = row.try_get("status").map_err(map_store_error)?;

    Ok(Subscription {
        id: id.to_string(),
        owner_id: row.try_get("user_id").map_err(map_store_error)?,
        tier: SubscriptionTier::from_str(&tier)
            .map_err(|err| CalPilotError::Database(err.to_string()))?,
        status: SubscriptionStatus::from_str(&status)
            .map_err(|err| CalPilotError::Database(err.to_string()))?,
        started_at: row.try_get("started_at").map_err(map_store_error)?,
        expires_at: row.try_get("expires_at").map_err(map_store_error)?,
        created_at: row.try_get("created_at").map_err(map_store_error)?,
    })
}

fn map_store_error(err: tokio_postgres::Error) -> CalPilotError {
    CalPilotError::from(InfraError::from(err))
}
