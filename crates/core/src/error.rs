//! Error types for bx-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.
//!
//! Hierarchy reconstruction never produces one of these: malformed keys are
//! normalized away, and a broken internal invariant panics instead.

use thiserror::Error;

/// Result type alias for bx-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bx-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid folder path or object key
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Profile already exists
    #[error("Profile already exists: {0}")]
    ProfileExists(String),

    /// No profile was selected and no default is configured
    #[error("No profile selected. Pass --profile or run 'bx profile default <name>'")]
    NoDefaultProfile,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) | Error::InvalidUrl(_) => 2, // UsageError
            Error::Config(_) | Error::NoDefaultProfile => 2,   // UsageError
            Error::Network(_) => 3,                            // NetworkError
            Error::Auth(_) => 4,                               // AuthError
            Error::NotFound(_) | Error::ProfileNotFound(_) => 5, // NotFound
            Error::Conflict(_) | Error::ProfileExists(_) => 6, // Conflict
            _ => 1,                                            // GeneralError
        }
    }

    /// Whether retrying the same storage call could succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}
