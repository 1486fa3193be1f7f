//! Persisted tiling state.
//!
//! A small key/value store holding the learned decoration profile and the
//! ratio index selected on each desktop. The backing file lives on a tmpfs by
//! default, so the state survives restarts of the tool but not reboots.
//!
//! The store is read once into a snapshot when opened. Reads are served from
//! the snapshot; a `put` of a value equal to the cached one is a no-op, any
//! other `put` rewrites the file (one open-write-close per changed value,
//! last writer wins).

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::constants::state_keys;
use super::state::{DecorationProfile, DesktopId};

/// Errors that can occur while reading or writing the state store.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The backing file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The snapshot could not be serialized.
    #[error("Failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value persistence used by the tiling session.
pub trait StateStore {
    /// Returns the cached value for `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value changed and could not be persisted.
    fn put(&mut self, key: &str, value: Value) -> Result<(), StateError>;

    /// Discards the cached snapshot in favor of the backing storage.
    ///
    /// Long-lived holders call this before each turn so that changes made by
    /// other processes are seen. Stores without backing storage keep their
    /// values.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn refresh(&mut self) -> Result<(), StateError> { Ok(()) }

    /// Returns the value for `key` as an unsigned integer.
    fn get_u64(&self, key: &str) -> Option<u64> { self.get(key).and_then(|v| v.as_u64()) }

    /// Returns the value for `key` as a signed pixel count.
    fn get_i32(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(|v| v.as_i64()).and_then(|v| i32::try_from(v).ok())
    }
}

// ============================================================================
// Typed Accessors
// ============================================================================

/// Reads the decoration profile from `store`.
///
/// A missing decoration sum reads as zero.
pub fn load_decoration_profile(store: &impl StateStore) -> DecorationProfile {
    DecorationProfile {
        measured_height: store.get_i32(state_keys::MEASURED_HEIGHT),
        measured_decoration_px: store.get_i32(state_keys::MEASURED_DECORATIONS).unwrap_or(0),
    }
}

/// Reads the raw ratio index stored for `desktop`.
///
/// The value is not wrapped here; callers wrap it through the ratio table.
pub fn load_ratio_index(store: &impl StateStore, desktop: DesktopId) -> Option<u64> {
    store.get_u64(&state_keys::ratio_index(desktop))
}

/// Persists the ratio index selected on `desktop`.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn save_ratio_index(
    store: &mut impl StateStore,
    desktop: DesktopId,
    index: usize,
) -> Result<(), StateError> {
    store.put(&state_keys::ratio_index(desktop), Value::from(index))
}

// ============================================================================
// JSON File Store
// ============================================================================

/// State store backed by a single JSON object on disk.
#[derive(Debug)]
pub struct JsonStateStore {
    path: PathBuf,
    snapshot: BTreeMap<String, Value>,
}

impl JsonStateStore {
    /// Opens the store at `path` and loads its snapshot.
    ///
    /// A missing file is an empty store. A file that does not hold a JSON
    /// object is discarded with a warning and rewritten on the next change.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StateError> {
        let path = path.into();
        let snapshot = read_snapshot(&path)?;
        tracing::debug!(path = %path.display(), keys = snapshot.len(), "store: loaded snapshot");
        Ok(Self { path, snapshot })
    }

    /// Re-reads the snapshot from disk, picking up writes by other processes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn reload(&mut self) -> Result<(), StateError> {
        self.snapshot = read_snapshot(&self.path)?;
        Ok(())
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    fn write(&self) -> Result<(), StateError> {
        let io_err = |source| StateError::Io { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(&self.snapshot)?;
        std::fs::write(&self.path, content).map_err(io_err)
    }
}

impl StateStore for JsonStateStore {
    fn get(&self, key: &str) -> Option<Value> { self.snapshot.get(key).cloned() }

    fn put(&mut self, key: &str, value: Value) -> Result<(), StateError> {
        if self.snapshot.get(key) == Some(&value) {
            return Ok(());
        }

        tracing::debug!(key, %value, "store: writing changed value");
        self.snapshot.insert(key.to_string(), value);
        self.write()
    }

    fn refresh(&mut self) -> Result<(), StateError> { self.reload() }
}

fn read_snapshot(path: &Path) -> Result<BTreeMap<String, Value>, StateError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(source) => return Err(StateError::Io { path: path.to_path_buf(), source }),
    };

    match serde_json::from_str(&content) {
        Ok(snapshot) => Ok(snapshot),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "store: discarding unreadable state");
            Ok(BTreeMap::new())
        }
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// Volatile state store, used when no file should be touched.
#[derive(Debug, Default, Clone)]
pub struct MemoryStateStore {
    values: BTreeMap<String, Value>,
    writes: usize,
}

impl MemoryStateStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns how many changed values have been written.
    #[must_use]
    pub const fn writes(&self) -> usize { self.writes }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Option<Value> { self.values.get(key).cloned() }

    fn put(&mut self, key: &str, value: Value) -> Result<(), StateError> {
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_string(), value);
            self.writes += 1;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
