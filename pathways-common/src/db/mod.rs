//! SQLite persistence
//!
//! Pathways and users are stored one row per document; card sequences and
//! selection lists live in JSON text columns so every write replaces them whole.

pub mod catalog;
pub mod init;
pub mod seed;
pub mod users;

pub use catalog::SqliteCatalog;
pub use init::{create_schema, init_database};
pub use users::SqliteUsers;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

/// Parse a UUID stored as text
pub(crate) fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| Error::StoreUnavailable(format!("stored id '{}' is not a UUID: {}", value, e)))
}

/// Parse an RFC 3339 timestamp stored as text
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::StoreUnavailable(format!("stored timestamp '{}' is invalid: {}", value, e)))
}
