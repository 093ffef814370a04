//! Upload Quota Repository implementation
//!
//! Same read-then-write update pattern as the token ledger, consumed one
//! upload at a time by the schedule-photo parse path.

use std::sync::Arc;

use async_trait::async_trait;
use calpilot_core::quota::ports::UploadQuotaRepository as UploadQuotaRepositoryPort;
use calpilot_domain::{CalPilotError, Result as DomainResult, UploadQuota};
use tokio_postgres::Row;
use tracing::debug;

use super::store::PgStore;
use crate::errors::InfraError;

const QUOTA_COLUMNS: &str = "user_id, uploads_used, uploads_limit, reset_at";

/// Postgres-backed upload quota repository
pub struct PgUploadQuotaRepository {
    store: Arc<PgStore>,
}

impl PgUploadQuotaRepository {
    pub fn new(store: Arc<PgStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UploadQuotaRepositoryPort for PgUploadQuotaRepository {
    async fn get_upload_quota(&self, owner_id: &str) -> DomainResult<Option<UploadQuota>> {
        let sql = format!("SELECT {QUOTA_COLUMNS} FROM upload_quotas WHERE user_id = $1");

        let row = self
            .store
            .client()
            .query_opt(&sql, &[&owner_id])
            .await
            .map_err(map_store_error)?;

        row.as_ref().map(map_quota_row).transpose()
    }

    async fn increment_upload_usage(&self, owner_id: &str) -> DomainResult<UploadQuota> {
        let current = self.get_upload_quota(owner_id).await?;
        let new_used = current.as_ref().map_or(0, |quota| quota.uploads_used) + 1;

        let update_sql = format!(
            "UPDATE upload_quotas
             SET uploads_used = $2, updated_at = now()
             WHERE user_id = $1
             RETURNING {QUOTA_COLUMNS}"
        );

        let updated = self
            .store
            .client()
            .query_opt(&update_sql, &[&owner_id, &new_used])
            .await
            .map_err(map_store_error)?;

        let row = match updated {
            Some(row) => row,
            None => {
                debug!(owner_id, "creating upload quota record");
                let insert_sql = format!(
                    "INSERT INTO upload_quotas (user_id, uploads_used)
                     VALUES ($1, $2)
                     RETURNING {QUOTA_COLUMNS}"
                );
                self.store
                    .client()
                    .query_one(&insert_sql, &[&owner_id, &new_used])
                    .await
                    .map_err(map_store_error)?
            }
        };

        map_quota_row(&row)
    }
}

fn map_quota_row(row: &Row) -> DomainResult<UploadQuota> {
    Ok(UploadQuota {
        owner_id: row.try_get("user_id").map_err(map_store_error)?,
        uploads_used: row.try_get("uploads_used").map_err(map_store_error)?,
        uploads_limit: row.try_get("uploads_limit").map_err(map_store_error)?,
        reset_at: row.try_get("reset_at").map_err(map_store_error)?,
    })
}

fn map_store_error(err: tokio_postgres::Error) -> CalPilotError {
    CalPilotError::from(InfraError::from(err))
}
