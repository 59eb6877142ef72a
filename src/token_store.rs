//! Credential persistence.
//! --------------------------
//! One token per installation, kept under the fixed entry name `userToken`
//! in an interchangeable backend: the OS credential service, a plain token
//! file, or memory for tests. Backends never raise; a failed read means
//! "absent" and failed writes are logged and swallowed, so a broken store
//! degrades the session to signed-out instead of crashing the client.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::config::{Config, StoreKind};

/// Entry name shared by every backend.
pub const TOKEN_KEY: &str = "userToken";

/// Service name under which the keyring entry is registered.
const KEYRING_SERVICE: &str = "anvaya";

pub trait TokenStore: Send + Sync {
    /// Stored credential, or `None` when absent or unreadable.
    fn get(&self) -> Option<String>;
    /// Persist `token`, replacing any previous value.
    fn set(&self, token: &str);
    /// Remove the credential. Removing an absent credential is a no-op.
    fn clear(&self);
}

/// Open the backend `config` selects. A keyring that cannot be reached
/// falls back to the token file so the client still starts.
pub fn open_default(config: &Config) -> Arc<dyn TokenStore> {
    match config.store {
        StoreKind::Keyring => match KeyringTokenStore::open() {
            Some(store) => Arc::new(store),
            None => Arc::new(FileTokenStore::new(config.token_file.clone())),
        },
        StoreKind::File => Arc::new(FileTokenStore::new(config.token_file.clone())),
    }
}

/// Token file backend: the raw token string in a file, parent directories
/// created on demand.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(s) => {
                let s = s.trim();
                if s.is_empty() { None } else { Some(s.to_string()) }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("token file '{}' unreadable: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, token: &str) {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(dir) {
                    warn!("cannot create '{}': {}", dir.display(), e);
                    return;
                }
            }
        }
        if let Err(e) = fs::write(&self.path, token) {
            warn!("token file '{}' not written: {}", self.path.display(), e);
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("token file '{}' not removed: {}", self.path.display(), e),
        }
    }
}

/// OS credential service backend (Keychain, Credential Manager, kernel
/// keyring).
pub struct KeyringTokenStore {
    entry: keyring::Entry,
}

impl KeyringTokenStore {
    /// `None` when the platform credential service is unavailable.
    pub fn open() -> Option<Self> {
        match keyring::Entry::new(KEYRING_SERVICE, TOKEN_KEY) {
            Ok(entry) => Some(Self { entry }),
            Err(e) => {
                warn!("keyring unavailable, falling back to token file: {}", e);
                None
            }
        }
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Option<String> {
        match self.entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!("keyring read failed: {}", e);
                None
            }
        }
    }

    fn set(&self, token: &str) {
        if let Err(e) = self.entry.set_password(token) {
            warn!("keyring write failed: {}", e);
        }
    }

    fn clear(&self) {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(e) => warn!("keyring delete failed: {}", e),
        }
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token<S: Into<String>>(token: S) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set(&self, token: &str) {
        *self.token.write() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(tmp.path().join("state").join("token"));
        assert_eq!(store.get(), None);
        store.set("tok-1");
        assert_eq!(store.get(), Some("tok-1".to_string()));
        store.set("tok-2");
        assert_eq!(store.get(), Some("tok-2".to_string()));
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn file_store_clear_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(tmp.path().join("token"));
        store.clear();
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn file_store_swallows_unreadable_path() {
        let tmp = tempfile::tempdir().unwrap();
        // the path is a directory, so reads and writes both fail
        let store = FileTokenStore::new(tmp.path());
        assert_eq!(store.get(), None);
        store.set("tok");
        assert_eq!(store.get(), None);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(), None);
        store.set("tok");
        assert_eq!(store.get(), Some("tok".to_string()));
        store.clear();
        assert_eq!(store.get(), None);
        let seeded = MemoryTokenStore::with_token("pre");
        assert_eq!(seeded.get(), Some("pre".to_string()));
    }
}
