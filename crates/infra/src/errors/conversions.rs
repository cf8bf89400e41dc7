//! Conversions from external infrastructure errors into domain errors.

use coresuite_domain::IntegrationError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub IntegrationError);

impl From<InfraError> for IntegrationError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<IntegrationError> for InfraError {
    fn from(value: IntegrationError) -> Self {
        Self(value)
    }
}

trait IntoIntegrationError {
    fn into_integration(self) -> IntegrationError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → IntegrationError */
/* -------------------------------------------------------------------------- */

impl IntoIntegrationError for SqlError {
    fn into_integration(self) -> IntegrationError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => IntegrationError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        IntegrationError::Database("database is locked".into())
                    }
                    ErrorCode::ReadOnly => {
                        IntegrationError::Database("database is read-only".into())
                    }
                    ErrorCode::CannotOpen => {
                        IntegrationError::Database(format!("unable to open database: {message}"))
                    }
                    _ => IntegrationError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::InvalidPath(path) => IntegrationError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => IntegrationError::Database("invalid SQL query".into()),
            other => IntegrationError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        Self(value.into_integration())
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        Self(IntegrationError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → IntegrationError */
/* -------------------------------------------------------------------------- */

impl IntoIntegrationError for HttpError {
    fn into_integration(self) -> IntegrationError {
        if self.is_timeout() {
            return IntegrationError::Network(format!("HTTP request timed out: {self}"));
        }

        if self.is_connect() {
            return IntegrationError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return IntegrationError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() || self.is_body() {
            return IntegrationError::Network(format!("failed to read HTTP response: {self}"));
        }

        IntegrationError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_integration())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → IntegrationError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(IntegrationError::Storage(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
