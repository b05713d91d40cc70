use std::sync::Arc;

use crate::foundation::error::BadgeResult;
use crate::output::gate::PublishGate;
use crate::output::store::OutputStore;

/// Identifier and locator of a persisted badge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredArtifact {
    /// 128-bit random identifier (32 lowercase hex digits).
    pub identifier: String,
    /// Where the artifact can be retrieved from.
    pub locator: String,
}

/// Names and persists encoded badges.
///
/// Each call draws a fresh UUID v4, so concurrent writers never collide and no counter is shared.
#[derive(Clone, Debug)]
pub struct OutputWriter {
    store: Arc<dyn OutputStore>,
}

impl OutputWriter {
    /// Writer publishing into `store`.
    pub fn new(store: Arc<dyn OutputStore>) -> Self {
        Self { store }
    }

    /// Artifact key for `identifier`.
    pub fn artifact_key(identifier: &str) -> String {
        format!("badge-{identifier}.png")
    }

    /// Persist `png` under a new identifier.
    pub fn persist(&self, png: &[u8]) -> BadgeResult<StoredArtifact> {
        self.persist_gated(png, &PublishGate::new())
    }

    /// Persist `png` under a new identifier unless `gate` is closed before it is published.
    pub fn persist_gated(&self, png: &[u8], gate: &PublishGate) -> BadgeResult<StoredArtifact> {
        let identifier = uuid::Uuid::new_v4().simple().to_string();
        let locator = self
            .store
            .write_gated(&Self::artifact_key(&identifier), png, gate)?;
        Ok(StoredArtifact {
            identifier,
            locator,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/writer.rs"]
mod tests;
