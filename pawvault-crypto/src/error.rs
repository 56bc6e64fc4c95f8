//! Error types for the encryption layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The master secret is absent or empty. Fatal at startup; the process
    /// must not serve traffic without it.
    #[error("master secret is not set (expected in {0})")]
    MasterSecretMissing(String),

    /// Wrapped data does not match the `iv_hex:ciphertext_hex` envelope.
    #[error("malformed wrapped envelope: {0}")]
    MalformedEnvelope(String),

    /// Key pair generation failed in the underlying primitive.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// A PEM key could not be parsed.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong key or tampered data).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Plaintext does not fit within the PKCS#1 v1.5 padding limit.
    #[error("plaintext is {got} bytes but a {strength}-bit modulus holds at most {max}")]
    PayloadTooLarge {
        got: usize,
        max: usize,
        strength: u32,
    },
}
