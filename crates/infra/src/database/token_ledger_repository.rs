//! Token Ledger Repository implementation
//!
//! Reads and commits per-user token usage. The update is the documented
//! read-then-increment pair: there is no compare-and-swap at this layer, so
//! concurrent publishes by the same user can race and lose an increment.

use std::sync::Arc;

use async_trait::async_trait;
use calpilot_core::quota::ports::TokenLedgerRepository as TokenLedgerRepositoryPort;
use calpilot_domain::{CalPilotError, Result as DomainResult, TokenUsageLedger};
use tokio_postgres::Row;
use tracing::debug;

use super::store::PgStore;
use crate::errors::InfraError;

const LEDGER_COLUMNS: &str = "user_id, tokens_used, tokens_limit, reset_at";

/// Postgres-backed token ledger repository
pub struct PgTokenLedgerRepository {
    store: Arc<PgStore>,
}

impl PgTokenLedgerRepository {
    pub fn new(store: Arc<PgStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TokenLedgerRepositoryPort for PgTokenLedgerRepository {
    async fn get_token_usage(&self, owner_id: &str) -> DomainResult<Option<TokenUsageLedger>> {
        let sql = format!("SELECT {LEDGER_COLUMNS} FROM token_usage WHERE user_id = $1");

        let row = self
            .store
            .client()
            .query_opt(&sql, &[&owner_id])
            .await
            .map_err(map_store_error)?;

        row.as_ref().map(map_ledger_row).transpose()
    }

    async fn update_token_usage(
        &self,
        owner_id: &str,
        delta: i64,
    ) -> DomainResult<TokenUsageLedger> {
        // Read-then-increment, as documented on the port.
        let current = self.get_token_usage(owner_id).await?;
        let new_used = current.as_ref().map_or(0, |ledger| ledger.tokens_used) + delta;

        let update_sql = format!(
            "UPDATE token_usage
             SET tokens_used = $2, updated_at = now()
             WHERE user_id = $1
             RETURNING {LEDGER_COLUMNS}"
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
                // First charge for this user: create the record under the
                // schema's default limit.
                debug!(owner_id, "creating token usage record");
                let insert_sql = format!(
                    "INSERT INTO token_usage (user_id, tokens_used)
                     VALUES ($1, $2)
                     RETURNING {LEDGER_COLUMNS}"
                );
                self.store
                    .client()
                    .query_one(&insert_sql, &[&owner_id, &new_used])
                    .await
                    .map_err(map_store_error)?
            }
        };

        map_ledger_row(&row)
    }
}

fn map_ledger_row(row: &Row) -> DomainResult<TokenUsageLedger> {
    Ok(TokenUsageLedger {
        owner_id: row.try_get("user_id").map_err(map_store_error)?,
        tokens_used: row.try_get("tokens_used").map_err(map_store_error)?,
        tokens_limit: row.try_get("tokens_limit").map_err(map_store_error)?,
        reset_at: row.try_get("reset_at").map_err(map_store_error)?,
    })
}

fn map_store_error(err: tokio_postgres::Error) -> CalPilotError {
    CalPilotError::from(InfraError::from(err))
}
