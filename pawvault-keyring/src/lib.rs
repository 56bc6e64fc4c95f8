//! Key lifecycle management for PawVault.
//!
//! The keyring is the one component the rest of the system calls directly:
//! it composes the master cipher, the key pair generator, and the key store,
//! and enforces the business rules around them: one key pair per principal,
//! no silent regeneration, wrapped material only at rest.
//!
//! Components are explicitly constructed and dependency-injected; running a
//! single [`KeyLifecycleManager`] per process is a deployment choice, not a
//! requirement baked into this crate.

mod error;
mod generator;
mod manager;

pub use error::{KeyringError, KeyringResult};
pub use generator::KeyPairGenerator;
pub use manager::{KeyInfo, KeyLifecycleManager, KEY_PROBE};
