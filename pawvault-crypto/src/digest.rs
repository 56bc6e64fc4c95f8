//! Hashing, HMAC, and random-token helpers.
//!
//! Small integrity utilities used around the encryption layer: content
//! hashes for change detection, HMAC tags for values that must be verified
//! but not hidden, and CSPRNG hex tokens for salts and nonces.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded SHA-256 digest of `data`.
#[must_use]
pub fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

/// Hex-encoded HMAC-SHA-256 tag over `data` under `secret`.
#[must_use]
pub fn hmac_sha256(data: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies an HMAC-SHA-256 tag in constant time.
///
/// Returns `false` for tags that are malformed hex as well as tags that do
/// not match.
#[must_use]
pub fn verify_hmac_sha256(data: &str, signature: &str, secret: &str) -> bool {
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(data.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// `len` random bytes from the OS CSPRNG, hex-encoded.
#[must_use]
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hmac_sign_and_verify() {
        let tag = hmac_sha256("payment:tok_123", "shared-secret");
        assert!(verify_hmac_sha256("payment:tok_123", &tag, "shared-secret"));
    }

    #[test]
    fn hmac_rejects_tampered_data_and_wrong_secret() {
        let tag = hmac_sha256("payment:tok_123", "shared-secret");
        assert!(!verify_hmac_sha256("payment:tok_999", &tag, "shared-secret"));
        assert!(!verify_hmac_sha256("payment:tok_123", &tag, "other-secret"));
    }

    #[test]
    fn hmac_rejects_malformed_signature() {
        assert!(!verify_hmac_sha256("data", "not hex", "secret"));
    }

    #[test]
    fn random_hex_has_requested_length_and_varies() {
        let a = random_hex(16);
        let b = random_hex(16);
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert_eq!(random_hex(32).len(), 64);
    }
}
