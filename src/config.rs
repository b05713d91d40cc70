//! JSON configuration for [`BadgeGenerator`](crate::BadgeGenerator).
//!
//! Every field is optional; an empty object `{}` is a valid configuration writing into
//! `./badges` with the default style.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::{BadgeError, BadgeResult};
use crate::layout::policy::Anchor;
use crate::render::badge::BadgeStyle;
use crate::session::batch::BatchOpts;

/// Generator configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BadgeConfig {
    /// Directory receiving `badge-<id>.png` artifacts. Created on generator construction.
    pub output_dir: PathBuf,
    /// Default badge style.
    pub style: BadgeStyle,
    /// Badge placement.
    pub anchor: Anchor,
    /// Batch scheduling.
    pub batch: BatchConfig,
    /// Extra directories scanned for `.ttf` / `.otf` / `.ttc` fonts.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("badges"),
            style: BadgeStyle::default(),
            anchor: Anchor::default(),
            batch: BatchConfig::default(),
            font_dirs: Vec::new(),
        }
    }
}

/// Serializable form of [`BatchOpts`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// See [`BatchOpts::parallel`].
    pub parallel: bool,
    /// See [`BatchOpts::threads`].
    pub threads: Option<usize>,
    /// Batch deadline in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl BatchConfig {
    /// Convert to runtime options.
    pub fn to_opts(&self) -> BatchOpts {
        BatchOpts {
            parallel: self.parallel,
            threads: self.threads,
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

impl BadgeConfig {
    /// Parse a JSON configuration.
    pub fn from_json_str(s: &str) -> BadgeResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| BadgeError::validation(format!("parse config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> BadgeResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> BadgeResult<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(BadgeError::validation("config 'output_dir' must be non-empty"));
        }
        if self.style.font_family.trim().is_empty() {
            return Err(BadgeError::validation(
                "config 'style.font_family' must be non-empty",
            ));
        }
        self.batch.to_opts().validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
