//! Encryption layer for PawVault.
//!
//! Implements the two-tier key architecture that protects personally
//! identifying fields at rest:
//!
//! 1. Master secret: one process-wide secret, supplied via the environment,
//!    used to wrap key material before it touches the store.
//! 2. Principal keys: an RSA key pair per principal; the public half encrypts
//!    individual field values, the private half decrypts them.
//!
//! This crate is pure computation: no I/O, no persistence. Persisting and
//! retrieving the wrapped key pairs is the key store's job; composing the two
//! tiers into a usable lifecycle is the keyring's.

mod cipher;
mod digest;
mod error;
mod keypair;
mod master;

pub use cipher::{decrypt_field, encrypt_field, max_plaintext_len};
pub use digest::{hmac_sha256, random_hex, sha256_hex, verify_hmac_sha256};
pub use error::{CryptoError, CryptoResult};
pub use keypair::{generate_keypair, KeyPairPem};
pub use master::{MasterCipher, MasterSecret, WrappedSecret, MASTER_SECRET_ENV};
