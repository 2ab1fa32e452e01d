//! Cryptographic primitives for credential storage
//!
//! This module provides:
//! - Argon2id password hashing with a fixed work factor
//! - Secure plaintext handling with zeroize

mod hashing;
mod secure_memory;

pub use hashing::{hash_password, verify_password, HashPolicy};
pub use secure_memory::SecretString;
