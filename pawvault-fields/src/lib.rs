//! Category-tagged field encryption.
//!
//! Ergonomic wrappers over the keyring for the data categories the embedding
//! application stores: personal info, appointment notes, payment details,
//! pet records, vet service descriptions, and emergency contacts. The
//! categories are structurally identical; the tag only changes the error
//! message surfaced to calling code, so every category flows through one
//! implementation instead of six copies.
//!
//! Single-field calls fail fast with a category-tagged error when the
//! principal has no keys. Batch calls are all-or-nothing: one bad field
//! aborts the batch so half-encrypted records are never persisted.

mod error;

pub use error::{FieldError, FieldResult};

use pawvault_keyring::KeyLifecycleManager;
use pawvault_types::PrincipalId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// The kinds of domain data the service encrypts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    /// Names, addresses, phone numbers.
    PersonalInfo,
    /// Appointment notes and visit details.
    AppointmentNotes,
    /// Card numbers and payment references.
    PaymentDetails,
    /// Pet medical records.
    PetRecord,
    /// Vet service descriptions.
    VetService,
    /// Emergency contact information.
    EmergencyContact,
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DataCategory::PersonalInfo => "personal info",
            DataCategory::AppointmentNotes => "appointment notes",
            DataCategory::PaymentDetails => "payment details",
            DataCategory::PetRecord => "pet record",
            DataCategory::VetService => "vet service",
            DataCategory::EmergencyContact => "emergency contact",
        };
        f.write_str(label)
    }
}

/// Encrypts and decrypts named domain fields for a principal.
///
/// Holds no state beyond the keyring reference; decrypted values are never
/// cached across calls.
pub struct FieldEncryptionService {
    keyring: Arc<KeyLifecycleManager>,
}

impl FieldEncryptionService {
    /// Creates a service over the given keyring.
    pub fn new(keyring: Arc<KeyLifecycleManager>) -> Self {
        Self { keyring }
    }

    /// Encrypts a single field value.
    ///
    /// # Errors
    /// [`FieldError::NoValidKeys`] if the principal has no keys; otherwise
    /// whatever the keyring reports.
    pub async fn encrypt_field(
        &self,
        category: DataCategory,
        value: &str,
        principal: &PrincipalId,
    ) -> FieldResult<String> {
        self.ensure_keys(category, principal).await?;
        Ok(self.keyring.encrypt(value, principal).await?)
    }

    /// Decrypts a single field value.
    pub async fn decrypt_field(
        &self,
        category: DataCategory,
        value: &str,
        principal: &PrincipalId,
    ) -> FieldResult<String> {
        self.ensure_keys(category, principal).await?;
        Ok(self.keyring.decrypt(value, principal).await?)
    }

    /// Encrypts every value in `fields`, all-or-nothing.
    ///
    /// Fields are processed sequentially in name order; the first failure
    /// aborts the batch and names the offending field. No partial mapping is
    /// ever returned.
    pub async fn batch_encrypt(
        &self,
        category: DataCategory,
        fields: &BTreeMap<String, String>,
        principal: &PrincipalId,
    ) -> FieldResult<BTreeMap<String, String>> {
        self.ensure_keys(category, principal).await?;

        let mut encrypted = BTreeMap::new();
        for (name, value) in fields {
            let ciphertext = self
                .keyring
                .encrypt(value, principal)
                .await
                .map_err(|source| FieldError::Field {
                    category,
                    field: name.clone(),
                    source,
                })?;
            encrypted.insert(name.clone(), ciphertext);
        }
        Ok(encrypted)
    }

    /// Decrypts every value in `fields`, all-or-nothing.
    pub async fn batch_decrypt(
        &self,
        category: DataCategory,
        fields: &BTreeMap<String, String>,
        principal: &PrincipalId,
    ) -> FieldResult<BTreeMap<String, String>> {
        self.ensure_keys(category, principal).await?;

        let mut decrypted = BTreeMap::new();
        for (name, value) in fields {
            let plaintext = self
                .keyring
                .decrypt(value, principal)
                .await
                .map_err(|source| FieldError::Field {
                    category,
                    field: name.clone(),
                    source,
                })?;
            decrypted.insert(name.clone(), plaintext);
        }
        Ok(decrypted)
    }

    async fn ensure_keys(
        &self,
        category: DataCategory,
        principal: &PrincipalId,
    ) -> FieldResult<()> {
        match self.keyring.has_valid_keys(principal).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(FieldError::NoValidKeys {
                category,
                principal: principal.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
