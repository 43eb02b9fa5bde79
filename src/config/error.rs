//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("API base URL must start with http:// or https://")]
    InvalidBaseUrl,

    #[error("Invalid connect timeout (1-120 seconds)")]
    InvalidTimeout,

    #[error("Poll interval must be greater than zero")]
    InvalidPollInterval,

    #[error("Poll timeout must not be shorter than the poll interval")]
    PollTimeoutTooShort,

    #[error("Contact form configuration is incomplete: {0} missing")]
    IncompleteContact(&'static str),
}
