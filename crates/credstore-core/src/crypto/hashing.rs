//! Password hashing using Argon2id
//!
//! Records are PHC strings (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`), so
//! verification reads the salt and cost from the record itself.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use super::SecretString;
use crate::error::{CredentialError, Result};
use crate::identity::PasswordHashRecord;

/// Work factor for Argon2id password hashing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HashPolicy {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Time cost / iterations (default: 2)
    pub time_cost: u32,
    /// Parallelism (default: 1)
    pub parallelism: u32,
}

impl Default for HashPolicy {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl HashPolicy {
    /// Check that Argon2 accepts these parameters
    pub fn validate(&self) -> Result<()> {
        self.params().map(|_| ())
    }

    fn params(&self) -> Result<Params> {
        Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|e| CredentialError::Configuration(e.to_string()))
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params()?))
    }
}

/// Hash a password under the given policy with a fresh random salt
///
/// CPU and memory bound; call from a blocking context.
pub fn hash_password(password: &SecretString, policy: &HashPolicy) -> Result<PasswordHashRecord> {
    let argon2 = policy.hasher()?;
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2
        .hash_password(password.expose().as_bytes(), &salt)
        .map_err(|e| CredentialError::Hashing(e.to_string()))?;

    Ok(PasswordHashRecord::from_phc(hash.to_string()))
}

/// Check a password against a stored record
///
/// Uses the algorithm, cost and salt embedded in the record. Returns
/// `Ok(false)` on mismatch.
pub fn verify_password(password: &SecretString, record: &PasswordHashRecord) -> Result<bool> {
    let parsed = PasswordHash::new(record.as_str())
        .map_err(|e| CredentialError::MalformedRecord(e.to_string()))?;

    match Argon2::default().verify_password(password.expose().as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Hashing(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_policy() -> HashPolicy {
        HashPolicy {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let password = SecretString::from("s3cret!");
        let record = hash_password(&password, &fast_policy()).unwrap();

        assert!(verify_password(&password, &record).unwrap());
        assert!(!verify_password(&SecretString::from("wrong"), &record).unwrap());
    }

    #[test]
    fn test_record_embeds_algorithm_and_cost() {
        let record = hash_password(&SecretString::from("pw"), &fast_policy()).unwrap();

        assert!(record.as_str().starts_with("$argon2id$v=19$"));
        assert!(record.as_str().contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let password = SecretString::from("same-password");

        let record1 = hash_password(&password, &fast_policy()).unwrap();
        let record2 = hash_password(&password, &fast_policy()).unwrap();

        assert_ne!(record1, record2);
        assert!(verify_password(&password, &record1).unwrap());
        assert!(verify_password(&password, &record2).unwrap());
    }

    #[test]
    fn test_verify_uses_record_parameters() {
        let password = SecretString::from("portable");
        let record = hash_password(
            &password,
            &HashPolicy {
                memory_cost: 2048,
                time_cost: 2,
                parallelism: 2,
            },
        )
        .unwrap();

        // Verification does not depend on whatever policy is current
        assert!(verify_password(&password, &record).unwrap());
    }

    #[test]
    fn test_record_excludes_plaintext() {
        let record = hash_password(&SecretString::from("plaintext-marker"), &fast_policy()).unwrap();
        assert!(!record.as_str().contains("plaintext-marker"));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let policy = HashPolicy {
            memory_cost: 1024,
            time_cost: 0,
            parallelism: 1,
        };

        assert!(matches!(policy.validate(), Err(CredentialError::Configuration(_))));
        assert!(matches!(
            hash_password(&SecretString::from("pw"), &policy),
            Err(CredentialError::Configuration(_))
        ));
    }

    #[test]
    fn test_default_policy_is_valid() {
        assert!(HashPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_malformed_record() {
        let record = PasswordHashRecord::from_phc("not-a-phc-string".to_string());
        let result = verify_password(&SecretString::from("pw"), &record);

        assert!(matches!(result, Err(CredentialError::MalformedRecord(_))));
    }
}
