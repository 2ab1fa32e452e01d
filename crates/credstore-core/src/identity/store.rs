//! Credential store: registration and verification

use argon2::password_hash::SaltString;
use rand::rngs::OsRng;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::types::{Identity, PasswordHashRecord};
use crate::crypto::{hash_password, verify_password, HashPolicy, SecretString};
use crate::error::{CredentialError, Result};
use crate::storage::IdentityRepository;

/// Credential store
///
/// Hashing runs on the blocking thread pool with a bounded number of jobs in
/// flight. The repository is only touched for the lookup or the insert,
/// never while a hash is being computed.
pub struct CredentialStore {
    /// Storage backend
    identities: Arc<dyn IdentityRepository>,
    /// Work factor for new records
    policy: HashPolicy,
    /// Record verified against when the username is unknown, so both
    /// failure paths cost one full hash computation
    decoy: PasswordHashRecord,
    /// Bounds concurrent hash jobs, each of which holds `memory_cost` KiB
    hash_permits: Arc<Semaphore>,
}

impl CredentialStore {
    /// Create a new credential store
    ///
    /// Validates the policy by computing the decoy record up front. Concurrent
    /// hash jobs default to the number of available CPUs.
    pub async fn new(identities: Arc<dyn IdentityRepository>, policy: HashPolicy) -> Result<Self> {
        policy.validate()?;

        let hash_permits = Arc::new(Semaphore::new(default_hash_concurrency()));
        let decoy_secret = SecretString::new(SaltString::generate(&mut OsRng).to_string());
        let decoy_policy = policy.clone();
        let decoy = run_blocking(&hash_permits, move || {
            hash_password(&decoy_secret, &decoy_policy)
        })
        .await?;

        debug!(
            "Credential store ready (backend: {}, m={} t={} p={})",
            identities.backend_name(),
            policy.memory_cost,
            policy.time_cost,
            policy.parallelism
        );

        Ok(Self {
            identities,
            policy,
            decoy,
            hash_permits,
        })
    }

    /// Limit how many hash computations may run at once (minimum 1)
    pub fn with_hash_concurrency(mut self, limit: usize) -> Self {
        self.hash_permits = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    /// The policy applied to newly registered passwords
    pub fn policy(&self) -> &HashPolicy {
        &self.policy
    }

    /// Register a new identity
    ///
    /// Fails with `DuplicateIdentity` if the username is taken. The plaintext
    /// is zeroed as soon as the hash has been computed.
    pub async fn register(&self, username: &str, password: &str) -> Result<Identity> {
        if username.is_empty() {
            return Err(CredentialError::InvalidInput("username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(CredentialError::InvalidInput("password must not be empty".to_string()));
        }

        // Saves a hash computation in the common case; the insert below decides
        if self.identities.contains(username).await? {
            return Err(CredentialError::DuplicateIdentity);
        }

        let secret = SecretString::from(password);
        let policy = self.policy.clone();
        let record = run_blocking(&self.hash_permits, move || hash_password(&secret, &policy)).await?;

        let identity = Identity::new(username, record);
        if !self.identities.insert_if_absent(identity.clone()).await? {
            debug!("Lost registration race for: {}", username);
            return Err(CredentialError::DuplicateIdentity);
        }

        info!("Registered identity: {} at {}", username, identity.created_at());
        Ok(identity)
    }

    /// Verify a username/password pair
    ///
    /// Unknown usernames and wrong passwords both fail with
    /// `InvalidCredentials` after the same amount of hashing work.
    pub async fn verify(&self, username: &str, password: &str) -> Result<()> {
        let stored = if username.is_empty() {
            None
        } else {
            self.identities.find(username).await?
        };

        let known = stored.is_some();
        let record = match stored {
            Some(identity) => identity.password_hash().clone(),
            None => self.decoy.clone(),
        };

        let secret = SecretString::from(password);
        let matched =
            run_blocking(&self.hash_permits, move || verify_password(&secret, &record)).await?;

        if known && matched {
            debug!("Verified credentials for: {}", username);
            Ok(())
        } else {
            debug!("Rejected credentials for: {}", username);
            Err(CredentialError::InvalidCredentials)
        }
    }

    /// Check if a username is registered
    pub async fn contains(&self, username: &str) -> Result<bool> {
        self.identities.contains(username).await
    }

    /// Number of registered identities
    pub async fn identity_count(&self) -> Result<usize> {
        self.identities.count().await
    }
}

fn default_hash_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Run a hashing job on the blocking pool once a permit is available
async fn run_blocking<T, F>(permits: &Arc<Semaphore>, job: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let permit = permits
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| CredentialError::Worker(e.to_string()))?;

    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        job()
    })
    .await
    .map_err(|e| {
        warn!("Hashing task failed: {}", e);
        CredentialError::Worker(e.to_string())
    })?
}
