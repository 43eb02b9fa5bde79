//! File-based Token Store Adapter
//!
//! Persists the session's token pair as a small JSON document,
//! `{"access": "...", "refresh": "..."}`. A missing file means logged out.

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::domain::session::TokenPair;
use crate::ports::{TokenStore, TokenStoreError};

/// On-disk shape of the pair.
#[derive(Serialize, Deserialize)]
struct PersistedTokens {
    access: String,
    refresh: String,
}

/// File-based storage for the token pair
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the file at `path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileTokenStore::new(".farmart/tokens.json");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the pair is written to before being renamed into place
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Writes `contents` to a fresh owner-only file, then swaps it in.
    fn write_private(&self, contents: &[u8]) -> Result<(), TokenStoreError> {
        let staging = self.staging_path();
        let written = open_private(&staging)
            .and_then(|mut file| {
                file.write_all(contents)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&staging, &self.path));

        written.map_err(|e| {
            let _ = fs::remove_file(&staging);
            TokenStoreError::IoError(e.to_string())
        })
    }

    /// Ensure the parent directory exists
    fn ensure_parent(&self) -> Result<(), TokenStoreError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir).map_err(|e| TokenStoreError::IoError(e.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// Creates (or truncates) `path` readable and writable by the owner only.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // A leftover staging file keeps its old mode; `mode` only applies on create.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<TokenPair>, TokenStoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TokenStoreError::IoError(e.to_string())),
        };

        let persisted: PersistedTokens = serde_json::from_str(&json)
            .map_err(|e| TokenStoreError::DeserializationFailed(e.to_string()))?;

        Ok(Some(TokenPair::new(persisted.access, persisted.refresh)))
    }

    fn save(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        self.ensure_parent()?;

        let json = serde_json::to_string(&PersistedTokens {
            access: tokens.access.expose_secret().clone(),
            refresh: tokens.refresh.expose_secret().clone(),
        })
        .map_err(|e| TokenStoreError::SerializationFailed(e.to_string()))?;

        self.write_private(json.as_bytes())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TokenStoreError::IoError(e.to_string())),
        }
    }
}
