use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::foundation::error::{BadgeError, BadgeResult};
use crate::output::gate::PublishGate;

/// Durable byte-addressable storage for finished badges.
///
/// Publish contract: after `write` returns `Ok`, `key` is readable at the returned locator with
/// exactly `bytes`. After `Err`, nothing is visible under `key`. Implementations are shared
/// across worker threads.
pub trait OutputStore: Send + Sync + std::fmt::Debug {
    /// Persist `bytes` under `key` and return a retrievable locator.
    fn write(&self, key: &str, bytes: &[u8]) -> BadgeResult<String> {
        self.write_gated(key, bytes, &PublishGate::new())
    }

    /// Like [`write`](Self::write), but the step that makes `key` visible runs through
    /// [`PublishGate::admit`]. A closed gate publishes nothing and leaves no temporary behind.
    fn write_gated(&self, key: &str, bytes: &[u8], gate: &PublishGate) -> BadgeResult<String>;
}

/// Directory-backed store with atomic publish (write to a hidden temporary, then rename).
#[derive(Clone, Debug)]
pub struct FsOutputStore {
    dir: PathBuf,
}

impl FsOutputStore {
    /// Open a store at `dir`, creating it (and its parents) if missing.
    ///
    /// Idempotent: an existing directory is not an error.
    pub fn open(dir: impl Into<PathBuf>) -> BadgeResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            BadgeError::persist(format!("create output dir '{}': {e}", dir.display()))
        })?;
        if !dir.is_dir() {
            return Err(BadgeError::persist(format!(
                "output path '{}' is not a directory",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_tmp(tmp: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut f = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(tmp)?;
        f.write_all(bytes)?;
        f.sync_all()
    }
}

impl OutputStore for FsOutputStore {
    fn write_gated(&self, key: &str, bytes: &[u8], gate: &PublishGate) -> BadgeResult<String> {
        validate_key(key)?;
        let final_path = self.dir.join(key);
        let tmp_path = self.dir.join(format!(".{key}.tmp"));

        if let Err(e) = Self::write_tmp(&tmp_path, bytes) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(BadgeError::persist(format!(
                "write '{}': {e}",
                tmp_path.display()
            )));
        }
        let published = gate.admit(|| {
            std::fs::rename(&tmp_path, &final_path).map_err(|e| {
                BadgeError::persist(format!("publish '{}': {e}", final_path.display()))
            })
        });
        if let Err(e) = published {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }

        tracing::debug!(path = %final_path.display(), bytes = bytes.len(), "published artifact");
        Ok(final_path.to_string_lossy().into_owned())
    }
}

/// In-memory store for tests and embedding. Locators are `mem://<key>`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryOutputStore {
    entries: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryOutputStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    /// Bytes stored at `locator` (as returned by `write`), if any.
    pub fn get_locator(&self, locator: &str) -> Option<Vec<u8>> {
        self.get(locator.strip_prefix("mem://")?)
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Return `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // Entries are inserted whole, so a poisoned map is still consistent.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl OutputStore for InMemoryOutputStore {
    fn write_gated(&self, key: &str, bytes: &[u8], gate: &PublishGate) -> BadgeResult<String> {
        validate_key(key)?;
        let bytes = bytes.to_vec();
        gate.admit(|| {
            self.lock().insert(key.to_owned(), bytes);
            Ok(format!("mem://{key}"))
        })
    }
}

fn validate_key(key: &str) -> BadgeResult<()> {
    if key.is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\'])
        || key.contains("..")
    {
        return Err(BadgeError::persist(format!(
            "invalid artifact key {key:?} (must be a plain file name)"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/output/store.rs"]
mod tests;
