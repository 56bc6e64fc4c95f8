//! Error types for the field encryption service.

use crate::DataCategory;
use pawvault_keyring::KeyringError;
use pawvault_types::PrincipalId;
use thiserror::Error;

/// Result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors that can occur encrypting or decrypting domain fields.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The pre-check found no usable keys. Same underlying condition as the
    /// keyring's not-found error, surfaced with the data category so calling
    /// code can produce a precise message.
    #[error("cannot process {category}: principal {principal} has no valid encryption keys")]
    NoValidKeys {
        category: DataCategory,
        principal: PrincipalId,
    },

    /// A single field inside a batch failed; the whole batch is aborted.
    #[error("{category} field `{field}` failed: {source}")]
    Field {
        category: DataCategory,
        field: String,
        #[source]
        source: KeyringError,
    },

    /// A keyring failure outside the per-field path.
    #[error(transparent)]
    Keyring(#[from] KeyringError),
}
