//! Conversions from external infrastructure errors into domain errors.

use calpilot_domain::CalPilotError;
use reqwest::Error as HttpError;
use tokio_postgres::error::SqlState;
use tokio_postgres::Error as PgError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CalPilotError);

impl From<InfraError> for CalPilotError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CalPilotError> for InfraError {
    fn from(value: CalPilotError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CalPilotError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let mapped = if err.is_timeout() {
            CalPilotError::Network(format!("http request timed out: {err}"))
        } else if err.is_connect() {
            CalPilotError::Network(format!("http connection failed: {err}"))
        } else if err.is_builder() {
            CalPilotError::Internal(format!("http request could not be built: {err}"))
        } else {
            CalPilotError::Network(format!("http error: {err}"))
        };
        InfraError(mapped)
    }
}

/* -------------------------------------------------------------------------- */
/* tokio_postgres::Error → CalPilotError */
/* -------------------------------------------------------------------------- */

impl From<PgError> for InfraError {
    fn from(err: PgError) -> Self {
        let mapped = if let Some(db_err) = err.as_db_error() {
            let code = db_err.code();
            if *code == SqlState::UNIQUE_VIOLATION {
                CalPilotError::Database(format!(
                    "unique constraint violation: {}",
                    db_err.message()
                ))
            } else if *code == SqlState::FOREIGN_KEY_VIOLATION {
                CalPilotError::Database(format!(
                    "foreign key constraint violation: {}",
                    db_err.message()
                ))
            } else if *code == SqlState::CHECK_VIOLATION || *code == SqlState::NOT_NULL_VIOLATION {
                CalPilotError::Database(format!("constraint violation: {}", db_err.message()))
            } else {
                CalPilotError::Database(format!(
                    "store error ({}): {}",
                    code.code(),
                    db_err.message()
                ))
            }
        } else if err.is_closed() {
            CalPilotError::Database("store connection closed".into())
        } else {
            CalPilotError::Database(err.to_string())
        };
        InfraError(mapped)
    }
}

/* -------------------------------------------------------------------------- */
/* native_tls::Error → CalPilotError */
/* -------------------------------------------------------------------------- */

impl From<native_tls::Error> for InfraError {
    fn from(err: native_tls::Error) -> Self {
        InfraError(CalPilotError::Database(format!("tls setup failed: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_round_trips_the_domain_error() {
        let original = CalPilotError::Database("boom".into());
        let infra: InfraError = original.into();
        let back: CalPilotError = infra.into();
        assert!(matches!(back, CalPilotError::Database(_)));
    }
}
