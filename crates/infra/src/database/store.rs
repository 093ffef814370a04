//! Connection manager for the remote Postgres store.

use std::time::Duration;

use calpilot_domain::{CalPilotError, DatabaseConfig, Result};
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::Client;
use tracing::{error, info};

use crate::errors::InfraError;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Handle to the remote store.
///
/// `tokio_postgres` multiplexes queries over one connection, so a single
/// shared client serves every repository. The connection driver runs on its
/// own task for the lifetime of the store.
pub struct PgStore {
    client: Client,
}

impl PgStore {
    /// Connect to the store described by the configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let connector = native_tls::TlsConnector::builder()
            .build()
            .map_err(|err| CalPilotError::from(InfraError::from(err)))?;
        let tls = MakeTlsConnector::new(connector);

        let timeout = Duration::from_secs(config.connect_timeout_seconds.max(1));
        let (client, connection) =
            tokio::time::timeout(timeout, tokio_postgres::connect(&config.url, tls))
                .await
                .map_err(|_| {
                    CalPilotError::Database(format!(
                        "store connect timed out after {}s",
                        timeout.as_secs()
                    ))
                })?
                .map_err(|err| CalPilotError::from(InfraError::from(err)))?;

        tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(error = %err, "store connection terminated");
            }
        });

        info!("connected to remote store");

        Ok(Self { client })
    }

    /// Borrow the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Ensure the reference schema exists on the current database.
    ///
    /// The production store is managed externally; this exists for
    /// development databases and staging environments.
    pub async fn run_migrations(&self) -> Result<()> {
        self.client
            .batch_execute(SCHEMA_SQL)
            .await
            .map_err(|err| CalPilotError::from(InfraError::from(err)))
    }

    /// Perform a health check to verify store connectivity.
    pub async fn health_check(&self) -> Result<()> {
        self.client
            .query_one("SELECT 1", &[])
            .await
            .map(|_| ())
            .map_err(|err| CalPilotError::from(InfraError::from(err)))
    }
}
