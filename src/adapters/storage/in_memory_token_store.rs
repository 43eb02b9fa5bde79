//! In-memory Token Store Adapter
//!
//! Keeps the pair in process memory. Used by tests and by the front-end when
//! no token file is configured.

use std::sync::Mutex;

use crate::domain::session::TokenPair;
use crate::ports::{TokenStore, TokenStoreError};

#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: Mutex<Option<TokenPair>>,
    fail_reads: bool,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `tokens`, as if persisted by an earlier run.
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
            fail_reads: false,
        }
    }

    /// A store whose persisted copy cannot be read.
    pub fn unreadable() -> Self {
        Self {
            tokens: Mutex::new(None),
            fail_reads: true,
        }
    }

    /// Whether a pair is currently persisted (for test assertions).
    pub fn is_empty(&self) -> bool {
        self.slot().is_none()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<TokenPair>> {
        self.tokens
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<TokenPair>, TokenStoreError> {
        if self.fail_reads {
            return Err(TokenStoreError::DeserializationFailed(
                "stored value is not a token pair".to_string(),
            ));
        }
        Ok(self.slot().clone())
    }

    fn save(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        *self.slot() = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.slot() = None;
        Ok(())
    }
}
