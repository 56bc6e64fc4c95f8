//! Error types for the key store.

use pawvault_types::PrincipalId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in key record persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A record already exists for this principal. Raised by the storage
    /// layer's primary key, which is the real uniqueness enforcement; the
    /// lifecycle manager's existence check is only a fast path.
    #[error("key record already exists for principal: {0}")]
    DuplicatePrincipal(PrincipalId),

    /// A persisted record could not be read back (bad timestamp, etc.).
    #[error("invalid key record data: {0}")]
    InvalidData(String),
}
