//! Identity registration and credential verification

mod store;
mod types;

pub use store::CredentialStore;
pub use types::{Identity, PasswordHashRecord};
