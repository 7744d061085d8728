//! Device-local key/value storage for citizen prefill and personalization.
//!
//! The browser-local-storage analog, made explicit: an injected
//! [`ProfileStore`] rather than ambient global state. String keys, string
//! values, no encryption, no expiry. Production uses a JSON file under the
//! app data dir; tests use the in-memory store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::models::profile::CitizenProfile;

/// Fixed storage keys.
pub mod keys {
    pub const CITIZEN_NAME: &str = "citizen_name";
    pub const NATIONAL_ID: &str = "national_id";
    pub const PHONE: &str = "phone";
    pub const EMAIL: &str = "email";
    pub const CHAT_AVATAR: &str = "chat_avatar";
    pub const CHAT_LANGUAGE: &str = "chat_language";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Internal lock error")]
    LockPoisoned,
}

pub trait ProfileStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Read the remembered citizen profile out of any store.
pub fn load_profile(store: &dyn ProfileStore) -> CitizenProfile {
    CitizenProfile {
        name: store.get(keys::CITIZEN_NAME).unwrap_or_default(),
        national_id: store.get(keys::NATIONAL_ID).unwrap_or_default(),
        phone: store.get(keys::PHONE).unwrap_or_default(),
        email: store.get(keys::EMAIL).unwrap_or_default(),
    }
}

// ═══════════════════════════════════════════════════════════
// JSON file store
// ═══════════════════════════════════════════════════════════

/// Flat JSON object on disk, loaded once and rewritten on every mutation.
/// The file is tiny (a handful of prefill keys), so rewriting is the
/// simplest thing that is also crash-safe enough here.
pub struct JsonFileStore {
    path: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let cache = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    fn persist(&self, cache: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(cache)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl ProfileStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut cache = self.cache.lock().map_err(|_| StoreError::LockPoisoned)?;
        cache.insert(key.to_string(), value.to_string());
        self.persist(&cache)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut cache = self.cache.lock().map_err(|_| StoreError::LockPoisoned)?;
        cache.remove(key);
        self.persist(&cache)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut cache = self.cache.lock().map_err(|_| StoreError::LockPoisoned)?;
        cache.clear();
        self.persist(&cache)
    }
}

// ═══════════════════════════════════════════════════════════
// In-memory store (tests)
// ═══════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.map.lock().map_err(|_| StoreError::LockPoisoned)?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.map.lock().map_err(|_| StoreError::LockPoisoned)?;
        map.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut map = self.map.lock().map_err(|_| StoreError::LockPoisoned)?;
        map.clear();
        Ok(())
    }
}
