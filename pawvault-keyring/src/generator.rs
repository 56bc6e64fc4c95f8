//! Key pair generation with wrapped persistence.

use crate::error::{KeyringError, KeyringResult};
use pawvault_crypto::{generate_keypair, KeyPairPem, MasterCipher};
use pawvault_keystore::{KeyStore, NewKeyRecord, StoreError};
use pawvault_types::PrincipalId;
use std::sync::Arc;
use tracing::info;

/// Generates a principal's key pair and persists it, wrapped, atomically.
///
/// The plaintext PEM pair is returned only after the store insert succeeds,
/// so a caller holding a pair can rely on the wrapped copy being retrievable
/// later. A failed insert discards the generated material.
pub struct KeyPairGenerator {
    store: Arc<dyn KeyStore>,
    cipher: Arc<MasterCipher>,
}

impl KeyPairGenerator {
    /// Creates a generator over the given store and master cipher.
    pub fn new(store: Arc<dyn KeyStore>, cipher: Arc<MasterCipher>) -> Self {
        Self { store, cipher }
    }

    /// Generates an RSA key pair for `principal` and inserts the wrapped
    /// record.
    ///
    /// # Errors
    /// - [`KeyringError::KeysAlreadyExist`] if a record is already present
    ///   (raised by the storage layer's unique index, so concurrent callers
    ///   cannot both win).
    /// - [`KeyringError::Crypto`] if generation or wrapping fails.
    /// - [`KeyringError::Store`] on any other persistence failure.
    pub async fn generate(
        &self,
        principal: &PrincipalId,
        strength: u32,
    ) -> KeyringResult<KeyPairPem> {
        let pair = generate_keypair(strength)?;

        let wrapped_public = self.cipher.wrap(&pair.public_pem)?;
        let wrapped_private = self.cipher.wrap(&pair.private_pem)?;

        let insert = self
            .store
            .insert(NewKeyRecord {
                principal_id: principal.clone(),
                public_key: wrapped_public.to_string(),
                private_key: wrapped_private.to_string(),
                key_strength: strength,
            })
            .await;

        match insert {
            Ok(()) => {
                info!(principal = %principal, strength, "generated and persisted key pair");
                Ok(pair)
            }
            Err(StoreError::DuplicatePrincipal(p)) => Err(KeyringError::KeysAlreadyExist(p)),
            Err(e) => Err(e.into()),
        }
    }
}
