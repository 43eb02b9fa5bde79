//! Backend API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::http::DEFAULT_BASE_URL;

/// Where the storefront backend lives
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Backend origin, without a trailing path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Validate API configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("API__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout() -> u64 {
    10
}
