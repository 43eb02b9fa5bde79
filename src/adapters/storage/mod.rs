//! Storage Adapters
//!
//! Implementations of the TokenStore port for persisting the session's
//! bearer credentials.
//!
//! ## Available Adapters
//!
//! - **FileTokenStore** - Stores the pair as a JSON file on disk
//! - **InMemoryTokenStore** - Stores the pair in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use farmart::adapters::storage::{FileTokenStore, InMemoryTokenStore};
//!
//! // Production: file-based storage
//! let store = FileTokenStore::new(".farmart/tokens.json");
//!
//! // Testing: in-memory storage
//! let store = InMemoryTokenStore::new();
//! ```

mod file_token_store;
mod in_memory_token_store;

pub use file_token_store::FileTokenStore;
pub use in_memory_token_store::InMemoryTokenStore;
