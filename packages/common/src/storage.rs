//! # Key-value persistence
//!
//! A minimal get/set-bytes-by-key collaborator, used by the palette stores.
//! Two implementations are provided:
//! - [`MemoryKeyValueStore`]: process-local, for tests and previews
//! - [`DirectoryKeyValueStore`]: one file per key inside a directory

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::{CommonError, CommonResult};

/// Extension used for the files of a [`DirectoryKeyValueStore`]
pub const KEY_FILE_EXTENSION: &str = "json";

/// Byte storage addressed by string keys
pub trait KeyValueStore: Send + Sync {
    /// Read the bytes stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store `bytes` under `key`, replacing any previous value.
    fn set(&self, key: &str, bytes: &[u8]) -> CommonResult<()>;
}

/// In-memory key-value store
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, bytes: &[u8]) -> CommonResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CommonError::from(format!("write to {key:?} rejected")));
        }
        self.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Key-value store keeping one file per key in a directory
#[derive(Debug, Clone)]
pub struct DirectoryKeyValueStore {
    root: PathBuf,
}

impl DirectoryKeyValueStore {
    /// Open (and create if needed) the directory backing the store
    pub fn open(root: impl Into<PathBuf>) -> CommonResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key_to_file_name(key))
    }
}

impl KeyValueStore for DirectoryKeyValueStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path_for(key);
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read key");
                None
            }
        }
    }

    fn set(&self, key: &str, bytes: &[u8]) -> CommonResult<()> {
        let path = self.path_for(key);
        // Write to a sibling file first so readers never see a torn value.
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Encode a key as a portable file name.
///
/// ASCII alphanumerics, `-` and `_` are kept; every other byte becomes `%XX`.
pub fn key_to_file_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 5);
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            name.push(byte as char);
        } else {
            name.push_str(&format!("%{byte:02X}"));
        }
    }
    name.push('.');
    name.push_str(KEY_FILE_EXTENSION);
    name
}

/// Inverse of [`key_to_file_name`]. Returns `None` for names it could not have produced.
pub fn file_name_to_key(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(&format!(".{KEY_FILE_EXTENSION}"))?;
    let raw = stem.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let hex = stem.get(i + 1..i + 3)?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            bytes.push(raw[i]);
            i += 1;
        }
    }
    String::from_utf8(bytes).ok()
}
