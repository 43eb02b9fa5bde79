//! Logging configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.level.trim().is_empty() {
            return Err(ValidationError::MissingRequired("LOGGING__LEVEL"));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_level() -> String {
    "warn,farmart=info".to_string()
}
