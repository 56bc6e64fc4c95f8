//! Core type definitions for PawVault.
//!
//! This crate defines the fundamental, storage-agnostic types shared by the
//! key store, the keyring, and the health tooling:
//! - Principal identifiers (opaque strings supplied by the embedding app)
//! - Key records (the at-rest form of a principal's wrapped key pair)
//!
//! Domain-specific types (appointments, payments, pet records, etc.) belong
//! to the embedding application, not here.

mod principal;
mod record;

pub use principal::PrincipalId;
pub use record::{KeyRecord, DEFAULT_KEY_STRENGTH};
