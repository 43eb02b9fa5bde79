//! Token Store Port - persisted bearer credentials.
//!
//! Holds at most one `{access, refresh}` pair. Absence means logged out.
//! Only the session store writes to it.
//!
//! The operations are synchronous: the persisted copy is tiny and logout
//! must be able to clear it without suspending.

use crate::domain::session::TokenPair;

/// Errors that can occur during token storage operations
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Failed to serialize tokens: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize tokens: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting the session's token pair
pub trait TokenStore: Send + Sync {
    /// Load the persisted pair, `None` when logged out.
    fn load(&self) -> Result<Option<TokenPair>, TokenStoreError>;

    /// Replace the persisted pair.
    fn save(&self, tokens: &TokenPair) -> Result<(), TokenStoreError>;

    /// Remove the persisted pair. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), TokenStoreError>;
}
