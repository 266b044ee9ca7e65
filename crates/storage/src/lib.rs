use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use shared::domain::{GameMode, GameSnapshot};
use thiserror::Error;
use tracing::{debug, error, warn};

pub const DEFAULT_DATA_PREFIX: &str = "spinwheel_data";
pub const DEFAULT_UNDO_PREFIX: &str = "spinwheel_undo";
pub const DEFAULT_MODE_KEY: &str = "spinwheel_mode";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("i/o failure on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed stored document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat string key-value storage, the shape of a browser's local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses writes once keys plus values would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Every operation fails, like storage turned off in browser settings.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_enabled(&self) -> Result<(), StoreError> {
        if self.disabled {
            return Err(StoreError::Unavailable("storage is disabled".into()));
        }
        Ok(())
    }

    fn bytes_after_write(&self, key: &str, value: &str) -> usize {
        let others: usize = self
            .entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        others + key.len() + value.len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_enabled()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_enabled()?;
        if let Some(limit) = self.quota_bytes {
            let needed = self.bytes_after_write(key, value);
            if needed > limit {
                return Err(StoreError::QuotaExceeded { needed, limit });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_enabled()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// Whole-map JSON document on disk, rewritten on every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    set_aside(&path, &err);
                    BTreeMap::new()
                }
            },
            Err(source) if source.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!(path = %path.display(), keys = entries.len(), "opened json store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(&self.entries)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|source| StoreError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Renames an unreadable store to `*.json.corrupt`; the session starts empty.
fn set_aside(path: &Path, cause: &serde_json::Error) {
    let aside = path.with_extension("json.corrupt");
    match fs::rename(path, &aside) {
        Ok(()) => warn!(
            path = %path.display(),
            moved_to = %aside.display(),
            error = %cause,
            "malformed store file set aside; starting empty"
        ),
        Err(err) => error!(
            path = %path.display(),
            error = %cause,
            rename_error = %err,
            "malformed store file could not be moved; starting empty"
        ),
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(err) = self.flush() {
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if let Some(old) = self.entries.remove(key) {
            if let Err(err) = self.flush() {
                self.entries.insert(key.to_string(), old);
                return Err(err);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub data_prefix: String,
    pub undo_prefix: String,
    pub mode_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            data_prefix: DEFAULT_DATA_PREFIX.into(),
            undo_prefix: DEFAULT_UNDO_PREFIX.into(),
            mode_key: DEFAULT_MODE_KEY.into(),
        }
    }
}

impl StorageKeys {
    pub fn data_key(&self, mode: GameMode) -> String {
        format!("{}_{}", self.data_prefix, mode)
    }

    pub fn undo_key(&self, mode: GameMode) -> String {
        format!("{}_{}", self.undo_prefix, mode)
    }
}

/// Best-effort persistence of per-mode game state. Failures are logged and
/// reported as `false`/`None`; they never reach the caller as errors.
#[derive(Debug)]
pub struct GameStore<S> {
    kv: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> GameStore<S> {
    pub fn new(kv: S) -> Self {
        Self::with_keys(kv, StorageKeys::default())
    }

    pub fn with_keys(kv: S, keys: StorageKeys) -> Self {
        Self { kv, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut S {
        &mut self.kv
    }

    pub fn into_inner(self) -> S {
        self.kv
    }

    pub fn save(&mut self, mode: GameMode, snapshot: &GameSnapshot) -> bool {
        let key = self.keys.data_key(mode);
        self.write_json(&key, snapshot)
    }

    pub fn load(&self, mode: GameMode) -> Option<GameSnapshot> {
        self.read_json(&self.keys.data_key(mode))
    }

    pub fn save_undo(&mut self, mode: GameMode, snapshot: &GameSnapshot) -> bool {
        let key = self.keys.undo_key(mode);
        self.write_json(&key, snapshot)
    }

    pub fn load_undo(&self, mode: GameMode) -> Option<GameSnapshot> {
        self.read_json(&self.keys.undo_key(mode))
    }

    pub fn clear_undo(&mut self, mode: GameMode) -> bool {
        let key = self.keys.undo_key(mode);
        self.remove_key(&key)
    }

    /// Drops both the live and the undo entry of `mode`; other modes are untouched.
    pub fn clear(&mut self, mode: GameMode) -> bool {
        let data_key = self.keys.data_key(mode);
        let undo_key = self.keys.undo_key(mode);
        let data_cleared = self.remove_key(&data_key);
        let undo_cleared = self.remove_key(&undo_key);
        data_cleared && undo_cleared
    }

    pub fn save_active_mode(&mut self, mode: GameMode) -> bool {
        match self.kv.set(&self.keys.mode_key, mode.as_str()) {
            Ok(()) => true,
            Err(err) => {
                error!(key = %self.keys.mode_key, error = %err, "failed to save active mode");
                false
            }
        }
    }

    pub fn load_active_mode(&self) -> Option<GameMode> {
        let raw = match self.kv.get(&self.keys.mode_key) {
            Ok(raw) => raw?,
            Err(err) => {
                error!(key = %self.keys.mode_key, error = %err, "failed to load active mode");
                return None;
            }
        };
        match raw.parse() {
            Ok(mode) => Some(mode),
            Err(err) => {
                warn!(key = %self.keys.mode_key, error = %err, "ignoring stored mode");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> bool {
        let body = match serde_json::to_string(value) {
            Ok(body) => body,
            Err(err) => {
                error!(%key, error = %err, "failed to encode stored document");
                return false;
            }
        };
        match self.kv.set(key, &body) {
            Ok(()) => true,
            Err(err) => {
                error!(%key, error = %err, "failed to save to storage");
                false
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.kv.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                error!(%key, error = %err, "failed to load from storage");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%key, error = %err, "discarding malformed stored document");
                None
            }
        }
    }

    fn remove_key(&mut self, key: &str) -> bool {
        match self.kv.remove(key) {
            Ok(()) => true,
            Err(err) => {
                error!(%key, error = %err, "failed to clear storage");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
