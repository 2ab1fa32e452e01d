//! Command implementations

use anyhow::{bail, Context};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use credstore_core::{
    hash_password, verify_password, CredentialError, CredentialStore, MemoryIdentityRepository,
    PasswordHashRecord, SecretString, Settings,
};

const CALIBRATION_USER: &str = "calibration";

/// Hash a password with the configured policy
pub fn hash(password: &SecretString, settings: &Settings) -> anyhow::Result<PasswordHashRecord> {
    Ok(hash_password(password, &settings.hashing)?)
}

/// Check a password against a PHC record
pub fn verify(password: &SecretString, record: &str) -> anyhow::Result<()> {
    let record = PasswordHashRecord::parse(record.trim()).context("Not a valid password hash record")?;

    if !verify_password(password, &record)? {
        bail!(CredentialError::InvalidCredentials);
    }
    Ok(())
}

/// Render settings as JSON, saving them to `write_to` first when given
pub fn config(settings: &Settings, write_to: Option<&Path>) -> anyhow::Result<String> {
    if let Some(path) = write_to {
        settings.save(path)?;
        info!("Wrote settings to {}", path.display());
    }

    Ok(serde_json::to_string_pretty(settings)?)
}

/// Timings gathered by `calibrate`
#[derive(Debug)]
pub struct CalibrationReport {
    pub samples: u32,
    pub register: Duration,
    pub verify_known: Duration,
    pub verify_unknown: Duration,
}

impl fmt::Display for CalibrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<23}{}", "samples:", self.samples)?;
        writeln!(f, "{:<23}{:.1} ms", "register:", millis(self.register))?;
        writeln!(f, "{:<23}{:.1} ms", "verify (known user):", millis(self.verify_known))?;
        write!(f, "{:<23}{:.1} ms", "verify (unknown user):", millis(self.verify_unknown))
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Measure per-request hashing cost through a throwaway in-memory store
pub async fn calibrate(settings: &Settings, samples: u32) -> anyhow::Result<CalibrationReport> {
    if samples == 0 {
        bail!("samples must be at least 1");
    }

    let store = CredentialStore::new(
        Arc::new(MemoryIdentityRepository::new()),
        settings.hashing.clone(),
    )
    .await?;

    let policy = store.policy();
    info!(
        "Calibrating m={} KiB, t={}, p={} over {} samples",
        policy.memory_cost, policy.time_cost, policy.parallelism, samples
    );

    let started = Instant::now();
    store.register(CALIBRATION_USER, "calibration-password").await?;
    let register = started.elapsed();

    let mut verify_known = Duration::ZERO;
    let mut verify_unknown = Duration::ZERO;

    for _ in 0..samples {
        let started = Instant::now();
        store.verify(CALIBRATION_USER, "calibration-password").await?;
        verify_known += started.elapsed();

        let started = Instant::now();
        // Expected to fail; only the elapsed time matters
        let _ = store.verify("no-such-user", "calibration-password").await;
        verify_unknown += started.elapsed();
    }

    Ok(CalibrationReport {
        samples,
        register,
        verify_known: verify_known / samples,
        verify_unknown: verify_unknown / samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use credstore_core::HashPolicy;
    use tempfile::TempDir;

    fn fast_settings() -> Settings {
        Settings {
            version: 1,
            hashing: HashPolicy {
                memory_cost: 1024,
                time_cost: 1,
                parallelism: 1,
            },
        }
    }

    #[test]
    fn test_hash_then_verify() {
        let password = SecretString::from("s3cret!");
        let record = hash(&password, &fast_settings()).unwrap();

        verify(&password, record.as_str()).unwrap();
        // Trailing newline from copy/paste is tolerated
        verify(&password, &format!("{}\n", record)).unwrap();
    }

    #[test]
    fn test_verify_wrong_password() {
        let record = hash(&SecretString::from("right"), &fast_settings()).unwrap();
        let err = verify(&SecretString::from("wrong"), record.as_str()).unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_verify_rejects_malformed_record() {
        let err = verify(&SecretString::from("pw"), "not-a-record").unwrap_err();
        assert!(err.to_string().contains("Not a valid password hash record"));
    }

    #[test]
    fn test_config_write_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credstore").join("settings.json");

        let rendered = config(&fast_settings(), Some(&path)).unwrap();
        assert!(rendered.contains("\"memoryCost\": 1024"));

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, fast_settings());
    }

    #[test]
    fn test_config_print_only_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");

        config(&fast_settings(), None).unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_calibrate_reports_samples() {
        let report = calibrate(&fast_settings(), 2).await.unwrap();

        assert_eq!(report.samples, 2);
        assert!(report.register > Duration::ZERO);
        assert!(report.to_string().contains("verify (unknown user)"));
    }

    #[tokio::test]
    async fn test_calibrate_requires_samples() {
        assert!(calibrate(&fast_settings(), 0).await.is_err());
    }
}
