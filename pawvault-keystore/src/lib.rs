//! Persistence for wrapped key records.
//!
//! Pure storage: values pass through as opaque wrapped strings and no
//! cryptographic logic lives here. The store is the single source of truth
//! for key records: nothing is cached in memory, every lookup reads through.
//!
//! [`SqliteKeyStore`] is the bundled implementation; the [`KeyStore`] trait
//! exists so the keyring and health tooling stay storage-agnostic.

mod error;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteKeyStore;

use async_trait::async_trait;
use pawvault_types::{KeyRecord, PrincipalId};

/// A key record about to be inserted. Timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewKeyRecord {
    /// The owning principal.
    pub principal_id: PrincipalId,
    /// Wrapped PEM-encoded public key.
    pub public_key: String,
    /// Wrapped PEM-encoded private key.
    pub private_key: String,
    /// RSA modulus length in bits.
    pub key_strength: u32,
}

/// Abstract key record storage.
///
/// Implementations must enforce at most one record per principal: a second
/// insert for the same principal fails with
/// [`StoreError::DuplicatePrincipal`] instead of overwriting.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Looks up the record for a principal.
    async fn find_by_principal(&self, principal: &PrincipalId) -> StoreResult<Option<KeyRecord>>;

    /// Returns `true` if a record exists for the principal.
    async fn exists(&self, principal: &PrincipalId) -> StoreResult<bool>;

    /// Inserts a new record.
    ///
    /// # Errors
    /// Fails with [`StoreError::DuplicatePrincipal`] if a record already
    /// exists; callers that want to replace keys must remove first.
    async fn insert(&self, record: NewKeyRecord) -> StoreResult<()>;

    /// Removes a principal's record. Idempotent: removing a record that
    /// does not exist is not an error.
    async fn remove(&self, principal: &PrincipalId) -> StoreResult<()>;

    /// Returns every record in the store.
    ///
    /// Unbounded; intended for administrative scans, not the request path.
    async fn list_all(&self) -> StoreResult<Vec<KeyRecord>>;
}
