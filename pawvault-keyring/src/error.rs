//! Error types for the keyring.

use pawvault_crypto::CryptoError;
use pawvault_keystore::StoreError;
use pawvault_types::PrincipalId;
use thiserror::Error;

/// Result type for keyring operations.
pub type KeyringResult<T> = Result<T, KeyringError>;

/// Errors that can occur in key lifecycle operations.
#[derive(Debug, Error)]
pub enum KeyringError {
    /// The principal already has a key record. Creation never overwrites;
    /// callers must remove the existing pair first, explicitly.
    #[error("keys already exist for principal: {0}")]
    KeysAlreadyExist(PrincipalId),

    /// The principal has no key record, or the requested half is absent.
    #[error("no keys found for principal: {0}")]
    KeyNotFound(PrincipalId),

    /// A cryptographic operation failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The key store failed.
    #[error("key store failure: {0}")]
    Store(#[from] StoreError),
}
