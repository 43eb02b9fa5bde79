//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `FARMART` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a working
//! client against the public backend.
//!
//! # Example
//!
//! ```no_run
//! use farmart::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend: {}", config.api.base_url);
//! ```

mod api;
mod contact;
mod error;
mod logging;
mod polling;
mod session;

pub use api::ApiConfig;
pub use contact::ContactConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Backend location
    #[serde(default)]
    pub api: ApiConfig,

    /// Token persistence
    #[serde(default)]
    pub session: SessionConfig,

    /// Payment confirmation polling
    #[serde(default)]
    pub polling: PollingConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// EmailJS contact form account
    #[serde(default)]
    pub contact: ContactConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `FARMART` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FARMART__API__BASE_URL=http://localhost:8000` -> `api.base_url`
    /// - `FARMART__POLLING__TIMEOUT_MS=60000` -> `polling.timeout_ms`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FARMART")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.polling.validate()?;
        self.logging.validate()?;
        self.contact.validate()?;
        Ok(())
    }
}
