//! Profile Repository implementation

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use calpilot_core::user::ports::ProfileRepository as ProfileRepositoryPort;
use calpilot_domain::{
    CalPilotError, Profile, ProfileUpdate, Result as DomainResult, SubscriptionTier,
    ThemePreference,
};
use tokio_postgres::Row;

use super::store::PgStore;
use crate::errors::InfraError;

const PROFILE_COLUMNS: &str =
    "id, display_name, theme_preference, subscription_tier, created_at, updated_at";

/// Postgres-backed profile repository
pub struct PgProfileRepository {
    store: Arc<PgStore>,
}

impl PgProfileRepository {
    pub fn new(store: Arc<PgStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProfileRepositoryPort for PgProfileRepository {
    async fn get_profile(&self, owner_id: &str) -> DomainResult<Option<Profile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");

        let row = self
            .store
            .client()
            .query_opt(&sql, &[&owner_id])
            .await
            .map_err(map_store_error)?;

        row.as_ref().map(map_profile_row).transpose()
    }

    async fn update_profile(&self, owner_id: &str, update: &ProfileUpdate) -> DomainResult<Profile> {
        if update.is_empty() {
            return Err(CalPilotError::InvalidInput("no profile fields to update".into()));
        }

        let theme = update.theme_preference.map(|preference| preference.to_string());

        let sql = format!(
            "UPDATE profiles
             SET display_name = COALESCE($2, display_name),
                 theme_preference = COALESCE($3, theme_preference),
                 updated_at = now()
             WHERE id = $1
             RETURNING {PROFILE_COLUMNS}"
        );

        let row = self
            .store
            .client()
            .query_opt(&sql, &[&owner_id, &update.display_name, &theme])
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| CalPilotError::NotFound(format!("profile {owner_id}")))?;

        map_profile_row(&row)
    }
}

fn map_profile_row(row: &Row) -> DomainResult<Profile> {
    let theme: String = row.try_get("theme_preference").map_err(map_store_error)?;
    let tier: String = row.try_get("subscription_tier").map_err(map_store_error)?;

    Ok(Profile {
        id: row.try_get("id").map_err(map_store_error)?,
        display_name: row.try_get("display_name").map_err(map_store_error)?,
        theme_preference: ThemePreference::from_str(&theme)
            .map_err(|err| CalPilotError::Database(err.to_string()))?,
        subscription_tier: SubscriptionTier::from_str(&tier)
            .map_err(|err| CalPilotError::Database(err.to_string()))?,
        created_at: row.try_get("created_at").map_err(map_store_error)?,
        updated_at: row.try_get("updated_at").map_err(map_store_error)?,
    })
}

fn map_store_error(err: tokio_postgres::Error) -> CalPilotError {
    CalPilotError::from(InfraError::from(err))
}
