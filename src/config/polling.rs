//! Payment confirmation polling configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Delay between order status checks, in milliseconds
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Give up after this many milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate polling configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.timeout_ms < self.interval_ms {
            return Err(ValidationError::PollTimeoutTooShort);
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            timeout_ms: default_timeout(),
        }
    }
}

fn default_interval() -> u64 {
    5_000
}

fn default_timeout() -> u64 {
    120_000
}
