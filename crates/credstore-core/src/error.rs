//! Error types for credstore-core

use thiserror::Error;

/// Result type alias for credential store operations
pub type Result<T> = std::result::Result<T, CredentialError>;

/// Credential store error types
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Username already exists")]
    DuplicateIdentity,

    /// Unknown username and wrong password both map here
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid hashing configuration: {0}")]
    Configuration(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Malformed password hash record: {0}")]
    MalformedRecord(String),

    #[error("Hashing worker failed: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CredentialError {
    /// Whether this is an expected outcome to report back to the caller,
    /// as opposed to a configuration or environment fault.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            Self::DuplicateIdentity | Self::InvalidCredentials | Self::InvalidInput(_)
        )
    }

    /// Stable machine-readable code for transport layers
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateIdentity => "duplicate_identity",
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidInput(_) => "invalid_input",
            Self::Configuration(_) => "configuration",
            Self::Hashing(_) => "hashing",
            Self::MalformedRecord(_) => "malformed_record",
            Self::Worker(_) => "worker",
            Self::IoError(_) => "io",
            Self::SerializationError(_) => "serialization",
        }
    }
}
