//! The at-rest form of a principal's key pair.

use crate::PrincipalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default RSA modulus length in bits.
pub const DEFAULT_KEY_STRENGTH: u32 = 2048;

/// One key record per principal.
///
/// Both PEM halves are stored wrapped (symmetric-encrypted under the master
/// secret); this type never holds plaintext key material. The store enforces
/// at most one record per principal; creating a second one fails rather than
/// silently overwriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// The owning principal.
    pub principal_id: PrincipalId,
    /// Wrapped PEM-encoded public key.
    pub public_key: String,
    /// Wrapped PEM-encoded private key.
    pub private_key: String,
    /// RSA modulus length in bits.
    pub key_strength: u32,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl KeyRecord {
    /// Returns `true` if the wrapped public half is present.
    #[must_use]
    pub fn has_public_key(&self) -> bool {
        !self.public_key.is_empty()
    }

    /// Returns `true` if the wrapped private half is present.
    #[must_use]
    pub fn has_private_key(&self) -> bool {
        !self.private_key.is_empty()
    }
}
