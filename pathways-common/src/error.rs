//! Common error types for the pathways service

use thiserror::Error;

/// Common result type for pathways operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the stores and the core services
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input shape (wrong selection count, bad card payload, duplicate name)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced user or pathway is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller lacks the capability required for the operation
    #[error("Not authorized: {0}")]
    Forbidden(String),

    /// Persistence layer unreachable or failing
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the failure came from the persistence layer rather than the caller
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("row not found".to_string()),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Error::Validation(format!("duplicate value: {}", db_err.message()))
            }
            other => Error::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        // Only stored documents go through serde_json here; a bad one means the store is corrupt.
        Error::StoreUnavailable(format!("stored document could not be decoded: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_pool_errors_map_to_store_unavailable() {
        let err: Error = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_store_unavailable());
    }
}
