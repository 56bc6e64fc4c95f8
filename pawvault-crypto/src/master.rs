//! Master-secret symmetric cipher.
//!
//! Wraps and unwraps key material under one process-wide secret so that PEM
//! key pairs are never persisted in the clear. The secret itself is never
//! persisted: it arrives through the environment at process start, and a
//! missing secret is a fatal configuration error rather than a degraded mode.
//!
//! The envelope format is `iv_hex:ciphertext_hex`. A fresh random IV is drawn
//! for every wrap call, so wrapping the same plaintext twice produces two
//! different envelopes that both unwrap to the original.

use crate::error::{CryptoError, CryptoResult};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the symmetric key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Size of the envelope IV in bytes (96 bits).
pub const IV_SIZE: usize = 12;

/// Environment variable the master secret is read from.
pub const MASTER_SECRET_ENV: &str = "PAWVAULT_MASTER_SECRET";

/// The process-wide master secret, as supplied by the environment.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret(String);

impl MasterSecret {
    /// Creates a master secret from a non-empty string.
    ///
    /// # Errors
    /// Returns [`CryptoError::MasterSecretMissing`] if the value is empty.
    pub fn new(secret: impl Into<String>) -> CryptoResult<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(CryptoError::MasterSecretMissing(
                MASTER_SECRET_ENV.to_string(),
            ));
        }
        Ok(Self(secret))
    }

    /// Reads the master secret from [`MASTER_SECRET_ENV`].
    ///
    /// # Errors
    /// Returns [`CryptoError::MasterSecretMissing`] if the variable is unset
    /// or empty. Callers are expected to treat this as fatal at startup.
    pub fn from_env() -> CryptoResult<Self> {
        match std::env::var(MASTER_SECRET_ENV) {
            Ok(value) => Self::new(value),
            Err(_) => Err(CryptoError::MasterSecretMissing(
                MASTER_SECRET_ENV.to_string(),
            )),
        }
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret([REDACTED])")
    }
}

/// A wrapped (symmetric-encrypted) secret in `iv_hex:ciphertext_hex` form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedSecret {
    /// The IV used for this envelope.
    pub iv: [u8; IV_SIZE],
    /// The ciphertext (includes the auth tag).
    pub ciphertext: Vec<u8>,
}

impl WrappedSecret {
    /// Parses an envelope string.
    ///
    /// # Errors
    /// Returns [`CryptoError::MalformedEnvelope`] unless the input splits on
    /// `:` into exactly two non-empty hex parts with a correctly sized IV.
    pub fn parse(s: &str) -> CryptoResult<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(CryptoError::MalformedEnvelope(
                "expected exactly two colon-delimited parts".to_string(),
            ));
        }

        let iv_bytes = hex::decode(parts[0])
            .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid IV hex: {e}")))?;
        if iv_bytes.len() != IV_SIZE {
            return Err(CryptoError::MalformedEnvelope(format!(
                "IV must be {IV_SIZE} bytes, got {}",
                iv_bytes.len()
            )));
        }
        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&iv_bytes);

        let ciphertext = hex::decode(parts[1])
            .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid ciphertext hex: {e}")))?;

        Ok(Self { iv, ciphertext })
    }
}

impl fmt::Display for WrappedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.iv), hex::encode(&self.ciphertext))
    }
}

impl FromStr for WrappedSecret {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Symmetric cipher keyed by the master secret.
///
/// The 256-bit key is derived deterministically as the SHA-256 digest of the
/// secret, so the same secret always yields the same key without any stored
/// salt. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterCipher {
    key: [u8; KEY_SIZE],
}

impl MasterCipher {
    /// Builds a cipher from a master secret.
    #[must_use]
    pub fn new(secret: &MasterSecret) -> Self {
        let digest = Sha256::digest(secret.as_str().as_bytes());
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Builds a cipher straight from the environment.
    ///
    /// # Errors
    /// Returns [`CryptoError::MasterSecretMissing`] if the secret is unset.
    pub fn from_env() -> CryptoResult<Self> {
        Ok(Self::new(&MasterSecret::from_env()?))
    }

    /// Encrypts `plaintext` into a fresh envelope.
    ///
    /// A new random IV is generated per call, so identical plaintexts wrap to
    /// distinct envelopes.
    ///
    /// # Errors
    /// Returns [`CryptoError::Encryption`] on an internal AEAD error.
    pub fn wrap(&self, plaintext: &str) -> CryptoResult<WrappedSecret> {
        let cipher = ChaCha20Poly1305::new((&self.key).into());

        let mut iv = [0u8; IV_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut iv);
        let nonce = Nonce::from_slice(&iv);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;

        Ok(WrappedSecret { iv, ciphertext })
    }

    /// Reverses [`wrap`](Self::wrap).
    ///
    /// # Errors
    /// Returns [`CryptoError::Decryption`] if the envelope was produced under
    /// a different secret or has been tampered with.
    pub fn unwrap(&self, wrapped: &WrappedSecret) -> CryptoResult<String> {
        let cipher = ChaCha20Poly1305::new((&self.key).into());
        let nonce = Nonce::from_slice(&wrapped.iv);

        let plaintext = cipher
            .decrypt(nonce, wrapped.ciphertext.as_ref())
            .map_err(|_| {
                CryptoError::Decryption("wrong master secret or tampered envelope".to_string())
            })?;

        String::from_utf8(plaintext)
            .map_err(|e| CryptoError::Decryption(format!("invalid UTF-8: {e}")))
    }
}

impl fmt::Debug for MasterCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterCipher([REDACTED])")
    }
}
