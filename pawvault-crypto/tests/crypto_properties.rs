//! Property-based tests for the crypto module.
//!
//! These tests verify properties that must always hold:
//! - Wrapping is reversible under the same master secret
//! - Every wrap call draws a fresh IV (non-deterministic envelopes)
//! - Field encryption round-trips for every payload within the padding limit
//! - The envelope string form always parses back to the same envelope

use pawvault_crypto::{
    decrypt_field, encrypt_field, generate_keypair, max_plaintext_len, KeyPairPem, MasterCipher,
    MasterSecret, WrappedSecret,
};
use proptest::prelude::*;
use std::sync::OnceLock;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn secret_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9!@#$%^&*()]{1,64}").unwrap()
}

fn plaintext_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[\\x20-\\x7E]{0,2000}").unwrap()
}

/// Field values that fit a 1024-bit modulus (117-byte PKCS#1 v1.5 limit).
fn field_value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[\\x20-\\x7E]{1,100}").unwrap()
}

/// RSA generation is the dominant cost, so the property tests share one pair.
fn test_pair() -> &'static KeyPairPem {
    static PAIR: OnceLock<KeyPairPem> = OnceLock::new();
    PAIR.get_or_init(|| generate_keypair(1024).unwrap())
}

fn cipher_for(secret: &str) -> MasterCipher {
    MasterCipher::new(&MasterSecret::new(secret).unwrap())
}

// =============================================================================
// MASTER WRAP PROPERTIES
// =============================================================================

mod wrap_properties {
    use super::*;

    proptest! {
        /// Wrapping then unwrapping under the same secret returns the original.
        #[test]
        fn roundtrip_preserves_data(secret in secret_strategy(), plaintext in plaintext_strategy()) {
            let cipher = cipher_for(&secret);
            let wrapped = cipher.wrap(&plaintext).unwrap();
            prop_assert_eq!(cipher.unwrap(&wrapped).unwrap(), plaintext);
        }

        /// Two wraps of the same plaintext produce distinct envelopes that
        /// both unwrap to the original.
        #[test]
        fn wrap_is_nondeterministic(plaintext in plaintext_strategy()) {
            let cipher = cipher_for("fixed-secret-for-nondeterminism");
            let a = cipher.wrap(&plaintext).unwrap();
            let b = cipher.wrap(&plaintext).unwrap();

            prop_assert_ne!(&a, &b);
            prop_assert_eq!(cipher.unwrap(&a).unwrap(), plaintext.clone());
            prop_assert_eq!(cipher.unwrap(&b).unwrap(), plaintext);
        }

        /// The string form always splits on `:` into two parts and parses
        /// back to an identical envelope.
        #[test]
        fn envelope_string_form_roundtrips(plaintext in plaintext_strategy()) {
            let cipher = cipher_for("envelope-format-secret");
            let wrapped = cipher.wrap(&plaintext).unwrap();

            let s = wrapped.to_string();
            prop_assert_eq!(s.split(':').count(), 2);
            prop_assert_eq!(WrappedSecret::parse(&s).unwrap(), wrapped);
        }

        /// A different secret never unwraps an envelope.
        #[test]
        fn different_secret_fails_unwrap(plaintext in plaintext_strategy()) {
            let wrapped = cipher_for("secret-one").wrap(&plaintext).unwrap();
            prop_assert!(cipher_for("secret-two").unwrap(&wrapped).is_err());
        }
    }
}

// =============================================================================
// FIELD ENCRYPTION PROPERTIES
// =============================================================================

mod field_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Any field value within the padding limit round-trips exactly.
        #[test]
        fn roundtrip_preserves_value(value in field_value_strategy()) {
            let pair = test_pair();
            let ciphertext = encrypt_field(&value, &pair.public_pem).unwrap();
            prop_assert_ne!(&ciphertext, &value);
            prop_assert_eq!(decrypt_field(&ciphertext, &pair.private_pem).unwrap(), value);
        }

        /// Values beyond the modulus capacity are always rejected.
        #[test]
        fn oversized_values_rejected(extra in 1usize..64) {
            let pair = test_pair();
            let value = "x".repeat(max_plaintext_len(1024) + extra);
            prop_assert!(encrypt_field(&value, &pair.public_pem).is_err());
        }
    }
}
