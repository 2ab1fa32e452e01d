//! Storage trait definitions

use crate::error::Result;
use crate::identity::Identity;
use async_trait::async_trait;

/// Trait for identity storage backends
///
/// Implementations must make `insert_if_absent` atomic: two concurrent calls
/// for the same username must never both return `true`.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Insert the identity unless its username is taken; returns whether it was inserted
    async fn insert_if_absent(&self, identity: Identity) -> Result<bool>;

    /// Look up an identity by exact username
    async fn find(&self, username: &str) -> Result<Option<Identity>>;

    /// Check if a username is registered
    async fn contains(&self, username: &str) -> Result<bool>;

    /// Number of registered identities
    async fn count(&self) -> Result<usize>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
