//! In-memory identity storage backend

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::IdentityRepository;
use crate::error::Result;
use crate::identity::Identity;

/// In-memory identity storage, lost when the process exits
#[derive(Default)]
pub struct MemoryIdentityRepository {
    /// Map of username -> identity
    identities: RwLock<HashMap<String, Identity>>,
}

impl MemoryIdentityRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for MemoryIdentityRepository {
    async fn insert_if_absent(&self, identity: Identity) -> Result<bool> {
        let mut identities = self.identities.write().await;

        match identities.entry(identity.username().to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                debug!("Stored identity: {}", identity.username());
                slot.insert(identity);
                Ok(true)
            }
        }
    }

    async fn find(&self, username: &str) -> Result<Option<Identity>> {
        let identities = self.identities.read().await;
        Ok(identities.get(username).cloned())
    }

    async fn contains(&self, username: &str) -> Result<bool> {
        let identities = self.identities.read().await;
        Ok(identities.contains_key(username))
    }

    async fn count(&self) -> Result<usize> {
        let identities = self.identities.read().await;
        Ok(identities.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
