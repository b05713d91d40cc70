use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{BadgeError, BadgeResult};

/// Delivers the encoded source image for a locator (path, key, URL...).
///
/// Network retrieval is left to embedders; the crate only ships a filesystem implementation.
pub trait SourceFetcher: Send + Sync {
    /// Return the raw encoded bytes for `locator`.
    fn fetch(&self, locator: &str) -> BadgeResult<Vec<u8>>;
}

/// Reads source images from the local filesystem, relative to `root` unless absolute.
#[derive(Clone, Debug)]
pub struct FsSourceFetcher {
    root: PathBuf,
}

impl FsSourceFetcher {
    /// Create a fetcher resolving relative locators against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, locator: &str) -> PathBuf {
        let p = Path::new(locator);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }
}

impl SourceFetcher for FsSourceFetcher {
    fn fetch(&self, locator: &str) -> BadgeResult<Vec<u8>> {
        if locator.trim().is_empty() {
            return Err(BadgeError::validation("source locator must be non-empty"));
        }
        let path = self.resolve(locator);
        std::fs::read(&path)
            .with_context(|| format!("read source image '{}'", path.display()))
            .map_err(BadgeError::from)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
