//! Identity type definitions

use argon2::password_hash::PasswordHash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CredentialError, Result};

/// Salted Argon2id hash of a password in PHC string format
///
/// Self-describing: the algorithm, version, cost parameters and salt are all
/// part of the string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHashRecord(String);

impl PasswordHashRecord {
    /// Parse and validate a PHC string
    pub fn parse(phc: &str) -> Result<Self> {
        PasswordHash::new(phc).map_err(|e| CredentialError::MalformedRecord(e.to_string()))?;
        Ok(Self(phc.to_string()))
    }

    pub(crate) fn from_phc(phc: String) -> Self {
        Self(phc)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PasswordHashRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered username bound to its password hash record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Case-sensitive, unique username
    username: String,

    /// Hash of the password; the plaintext is never stored
    password_hash: PasswordHashRecord,

    /// Registration timestamp
    created_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new identity
    pub fn new(username: &str, password_hash: PasswordHashRecord) -> Self {
        Self {
            username: username.to_string(),
            password_hash,
            created_at: Utc::now(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &PasswordHashRecord {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
