//! The key lifecycle manager.

use crate::error::{KeyringError, KeyringResult};
use crate::generator::KeyPairGenerator;
use pawvault_crypto::{decrypt_field, encrypt_field, KeyPairPem, MasterCipher, WrappedSecret};
use pawvault_keystore::KeyStore;
use pawvault_types::{KeyRecord, PrincipalId, DEFAULT_KEY_STRENGTH};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fixed probe string used by [`KeyLifecycleManager::validate_keys`].
pub const KEY_PROBE: &str = "pawvault-key-probe";

/// Aggregate key status for a principal. Diagnostic only; never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    /// A key record exists.
    pub has_keys: bool,
    /// The pair passed a live encrypt/decrypt round trip.
    pub is_valid: bool,
    /// The wrapped public half is present.
    pub public_key_present: bool,
    /// The wrapped private half is present.
    pub private_key_present: bool,
}

/// Orchestrates key generation, retrieval, validation, and removal.
///
/// This is the sole entry point other components use to obtain usable keys;
/// everything below it (store, cipher, generator) is composition detail.
/// Concurrent `encrypt`/`decrypt` calls against an established record are
/// independent reads; nothing is cached, every lookup reads through to the
/// store.
pub struct KeyLifecycleManager {
    store: Arc<dyn KeyStore>,
    cipher: Arc<MasterCipher>,
    generator: KeyPairGenerator,
}

impl KeyLifecycleManager {
    /// Creates a manager over the given store and master cipher.
    pub fn new(store: Arc<dyn KeyStore>, cipher: Arc<MasterCipher>) -> Self {
        let generator = KeyPairGenerator::new(Arc::clone(&store), Arc::clone(&cipher));
        Self {
            store,
            cipher,
            generator,
        }
    }

    /// Initializes keys for a new principal at the default strength.
    ///
    /// The sole creation path. Fails with [`KeyringError::KeysAlreadyExist`]
    /// if the principal already has keys: callers must decide explicitly
    /// what to do with a pre-existing pair (there is no idempotent mode).
    pub async fn initialize_keys(&self, principal: &PrincipalId) -> KeyringResult<KeyPairPem> {
        self.initialize_keys_with_strength(principal, DEFAULT_KEY_STRENGTH)
            .await
    }

    /// Initializes keys with an explicit modulus length.
    ///
    /// The existence check here is a fast path; the storage layer's unique
    /// index is the real enforcement, so two racing calls resolve to one
    /// success and one [`KeyringError::KeysAlreadyExist`].
    pub async fn initialize_keys_with_strength(
        &self,
        principal: &PrincipalId,
        strength: u32,
    ) -> KeyringResult<KeyPairPem> {
        if self.store.exists(principal).await? {
            return Err(KeyringError::KeysAlreadyExist(principal.clone()));
        }
        self.generator.generate(principal, strength).await
    }

    /// Returns the principal's public key as plaintext PEM.
    ///
    /// # Errors
    /// [`KeyringError::KeyNotFound`] if no record exists or the public half
    /// is absent.
    pub async fn get_public_key(&self, principal: &PrincipalId) -> KeyringResult<String> {
        let record = self.require_record(principal).await?;
        if !record.has_public_key() {
            return Err(KeyringError::KeyNotFound(principal.clone()));
        }
        self.unwrap_half(&record.public_key)
    }

    /// Returns the principal's private key as plaintext PEM.
    ///
    /// # Errors
    /// [`KeyringError::KeyNotFound`] if no record exists or the private half
    /// is absent.
    pub async fn get_private_key(&self, principal: &PrincipalId) -> KeyringResult<String> {
        let record = self.require_record(principal).await?;
        if !record.has_private_key() {
            return Err(KeyringError::KeyNotFound(principal.clone()));
        }
        self.unwrap_half(&record.private_key)
    }

    /// Returns `true` if the principal has a key record.
    ///
    /// Existence only; see [`validate_keys`](Self::validate_keys) for a
    /// cryptographic round-trip check.
    pub async fn has_valid_keys(&self, principal: &PrincipalId) -> KeyringResult<bool> {
        Ok(self.store.exists(principal).await?)
    }

    /// Encrypts a field value under the principal's public key.
    pub async fn encrypt(&self, plaintext: &str, principal: &PrincipalId) -> KeyringResult<String> {
        let public_pem = self.get_public_key(principal).await?;
        Ok(encrypt_field(plaintext, &public_pem)?)
    }

    /// Decrypts a field value with the principal's private key.
    ///
    /// # Errors
    /// [`KeyringError::Crypto`] wrapping a decryption failure if the
    /// ciphertext was produced under a different pair or has been corrupted.
    pub async fn decrypt(&self, ciphertext: &str, principal: &PrincipalId) -> KeyringResult<String> {
        let private_pem = self.get_private_key(principal).await?;
        Ok(decrypt_field(ciphertext, &private_pem)?)
    }

    /// Removes the principal's keys. Irreversible; idempotent.
    ///
    /// Data encrypted under the removed pair becomes permanently
    /// unreadable.
    pub async fn remove_keys(&self, principal: &PrincipalId) -> KeyringResult<()> {
        self.store.remove(principal).await?;
        info!(principal = %principal, "key records removed");
        Ok(())
    }

    /// Runs a live round trip of [`KEY_PROBE`] through the principal's pair.
    ///
    /// Diagnostic, not a hard failure path: any error (missing keys, bad
    /// envelope, decryption mismatch) yields `false` instead of propagating.
    pub async fn validate_keys(&self, principal: &PrincipalId) -> bool {
        let round_trip = async {
            let ciphertext = self.encrypt(KEY_PROBE, principal).await?;
            self.decrypt(&ciphertext, principal).await
        };
        match round_trip.await {
            Ok(decrypted) => decrypted == KEY_PROBE,
            Err(e) => {
                debug!(principal = %principal, error = %e, "key validation round trip failed");
                false
            }
        }
    }

    /// Aggregate key status for a principal. Never fails.
    pub async fn key_info(&self, principal: &PrincipalId) -> KeyInfo {
        let record = match self.store.find_by_principal(principal).await {
            Ok(record) => record,
            Err(e) => {
                warn!(principal = %principal, error = %e, "key info lookup failed");
                None
            }
        };

        match record {
            None => KeyInfo {
                has_keys: false,
                is_valid: false,
                public_key_present: false,
                private_key_present: false,
            },
            Some(record) => KeyInfo {
                has_keys: true,
                is_valid: self.validate_keys(principal).await,
                public_key_present: record.has_public_key(),
                private_key_present: record.has_private_key(),
            },
        }
    }

    /// Backup stub: verifies the record exists and defers to the database
    /// deployment's own backup tooling, which already covers the wrapped
    /// records.
    pub async fn backup_keys(&self, principal: &PrincipalId) -> KeyringResult<()> {
        self.require_record(principal).await?;
        info!(principal = %principal, "key backup delegated to store-level backups");
        Ok(())
    }

    /// Restore stub, mirroring [`backup_keys`](Self::backup_keys).
    pub async fn restore_keys(&self, principal: &PrincipalId) -> KeyringResult<()> {
        self.require_record(principal).await?;
        info!(principal = %principal, "key restore delegated to store-level backups");
        Ok(())
    }

    async fn require_record(&self, principal: &PrincipalId) -> KeyringResult<KeyRecord> {
        self.store
            .find_by_principal(principal)
            .await?
            .ok_or_else(|| KeyringError::KeyNotFound(principal.clone()))
    }

    fn unwrap_half(&self, wrapped: &str) -> KeyringResult<String> {
        let envelope = WrappedSecret::parse(wrapped)?;
        Ok(self.cipher.unwrap(&envelope)?)
    }
}
