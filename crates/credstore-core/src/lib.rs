//! # credstore-core
//!
//! Credential registration and verification for credstore:
//! - Argon2id password hashing with a fixed, configurable work factor
//! - Self-describing password hash records (salt and cost embedded)
//! - An in-memory identity repository with atomic insert-if-absent
//! - Plaintext handling with zeroize-on-drop

pub mod crypto;
pub mod error;
pub mod identity;
pub mod settings;
pub mod storage;

pub use crypto::{hash_password, verify_password, HashPolicy, SecretString};
pub use error::{CredentialError, Result};
pub use identity::{CredentialStore, Identity, PasswordHashRecord};
pub use settings::Settings;
pub use storage::{IdentityRepository, MemoryIdentityRepository};
