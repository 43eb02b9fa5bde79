//! Session persistence configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Where the token pair is kept between runs
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Keep the session across restarts
    #[serde(default = "default_persist")]
    pub persist_tokens: bool,

    /// JSON file holding `{access, refresh}`
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            persist_tokens: default_persist(),
            token_file: default_token_file(),
        }
    }
}

fn default_persist() -> bool {
    true
}

fn default_token_file() -> PathBuf {
    PathBuf::from(".farmart/tokens.json")
}
