//! Field-level asymmetric encryption.
//!
//! Encrypts individual UTF-8 string values under a principal's public key and
//! decrypts them with the matching private key. Output is standard base64,
//! suitable for storing inline wherever the plaintext used to live.
//!
//! RSA with PKCS#1 v1.5 padding bounds the plaintext at `modulus - 11` bytes:
//! this is for names, addresses, card numbers, and notes, not bulk payloads.

use crate::error::{CryptoError, CryptoResult};
use crate::keypair::{parse_private_pem, parse_public_pem};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::traits::PublicKeyParts;
use rsa::Pkcs1v15Encrypt;

/// PKCS#1 v1.5 padding overhead in bytes.
const PADDING_OVERHEAD: usize = 11;

/// Largest plaintext, in bytes, that a modulus of `strength` bits can hold.
#[must_use]
pub fn max_plaintext_len(strength: u32) -> usize {
    (strength as usize / 8).saturating_sub(PADDING_OVERHEAD)
}

/// Encrypts a field value with a PKCS#1 PEM public key.
///
/// # Errors
/// Returns [`CryptoError::InvalidKeyMaterial`] if the PEM does not parse,
/// [`CryptoError::PayloadTooLarge`] if the value exceeds the padding limit,
/// and [`CryptoError::Encryption`] on a primitive failure.
pub fn encrypt_field(plaintext: &str, public_pem: &str) -> CryptoResult<String> {
    let key = parse_public_pem(public_pem)?;

    let max = key.size().saturating_sub(PADDING_OVERHEAD);
    if plaintext.len() > max {
        return Err(CryptoError::PayloadTooLarge {
            got: plaintext.len(),
            max,
            strength: (key.size() * 8) as u32,
        });
    }

    let ciphertext = key
        .encrypt(&mut rand::rngs::OsRng, Pkcs1v15Encrypt, plaintext.as_bytes())
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    Ok(STANDARD.encode(ciphertext))
}

/// Decrypts a base64 field value with a PKCS#1 PEM private key.
///
/// # Errors
/// Returns [`CryptoError::Decryption`] if the input is not valid base64, was
/// produced under a different key pair, or has been corrupted or truncated.
pub fn decrypt_field(encoded: &str, private_pem: &str) -> CryptoResult<String> {
    let key = parse_private_pem(private_pem)?;

    let ciphertext = STANDARD
        .decode(encoded)
        .map_err(|e| CryptoError::Decryption(format!("invalid base64: {e}")))?;

    let plaintext = key
        .decrypt(Pkcs1v15Encrypt, &ciphertext)
        .map_err(|_| CryptoError::Decryption("wrong key or corrupted ciphertext".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::Decryption(format!("invalid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::{generate_keypair, KeyPairPem};
    use std::sync::OnceLock;

    fn test_pair() -> &'static KeyPairPem {
        static PAIR: OnceLock<KeyPairPem> = OnceLock::new();
        PAIR.get_or_init(|| generate_keypair(1024).unwrap())
    }

    #[test]
    fn round_trip_preserves_value() {
        let pair = test_pair();
        let ciphertext = encrypt_field("123 Main St", &pair.public_pem).unwrap();
        assert_ne!(ciphertext, "123 Main St");
        assert_eq!(decrypt_field(&ciphertext, &pair.private_pem).unwrap(), "123 Main St");
    }

    #[test]
    fn ciphertext_is_nondeterministic() {
        // PKCS#1 v1.5 pads with random bytes, so repeat encryptions differ.
        let pair = test_pair();
        let a = encrypt_field("same value", &pair.public_pem).unwrap();
        let b = encrypt_field("same value", &pair.public_pem).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let pair = test_pair();
        let other = generate_keypair(1024).unwrap();
        let ciphertext = encrypt_field("secret", &pair.public_pem).unwrap();
        assert!(matches!(
            decrypt_field(&ciphertext, &other.private_pem),
            Err(CryptoError::Decryption(_))
        ));
    }

    #[test]
    fn oversized_plaintext_is_rejected_up_front() {
        let pair = test_pair();
        let oversized = "x".repeat(max_plaintext_len(1024) + 1);
        assert!(matches!(
            encrypt_field(&oversized, &pair.public_pem),
            Err(CryptoError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn max_len_boundary_encrypts() {
        let pair = test_pair();
        let at_limit = "x".repeat(max_plaintext_len(1024));
        let ciphertext = encrypt_field(&at_limit, &pair.public_pem).unwrap();
        assert_eq!(decrypt_field(&ciphertext, &pair.private_pem).unwrap(), at_limit);
    }

    #[test]
    fn invalid_base64_fails_decryption() {
        let pair = test_pair();
        assert!(matches!(
            decrypt_field("!!! not base64 !!!", &pair.private_pem),
            Err(CryptoError::Decryption(_))
        ));
    }

    #[test]
    fn truncated_ciphertext_fails_decryption() {
        let pair = test_pair();
        let ciphertext = encrypt_field("truncate me", &pair.public_pem).unwrap();
        let truncated = &ciphertext[..ciphertext.len() / 2];
        assert!(decrypt_field(truncated, &pair.private_pem).is_err());
    }

    #[test]
    fn padding_limits_match_modulus() {
        assert_eq!(max_plaintext_len(2048), 245);
        assert_eq!(max_plaintext_len(1024), 117);
    }
}
