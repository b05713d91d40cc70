/// Convenience result type used across badgeforge.
pub type BadgeResult<T> = Result<T, BadgeError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Every variant except [`BadgeError::Validation`] and [`BadgeError::Other`] names the pipeline
/// stage that failed. All of them are fatal for the label being processed and never for a batch.
#[derive(thiserror::Error, Debug)]
pub enum BadgeError {
    /// The source buffer is not a supported raster format, or is truncated/corrupt.
    #[error("decode error: {0}")]
    Decode(String),

    /// Overlay geometry, vector rasterization or raster encoding failed.
    #[error("composite error: {0}")]
    Composite(String),

    /// The storage layer refused or failed the write.
    #[error("persist error: {0}")]
    Persist(String),

    /// The label did not finish before the batch deadline.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Invalid configuration or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Machine-readable stage of a [`BadgeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`BadgeError::Decode`].
    Decode,
    /// See [`BadgeError::Composite`].
    Composite,
    /// See [`BadgeError::Persist`].
    Persist,
    /// See [`BadgeError::Timeout`].
    Timeout,
    /// See [`BadgeError::Validation`].
    Validation,
    /// See [`BadgeError::Other`].
    Other,
}

impl BadgeError {
    /// Build a [`BadgeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BadgeError::Composite`] value.
    pub fn composite(msg: impl Into<String>) -> Self {
        Self::Composite(msg.into())
    }

    /// Build a [`BadgeError::Persist`] value.
    pub fn persist(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }

    /// Build a [`BadgeError::Timeout`] value.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build a [`BadgeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stage classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::Decode,
            Self::Composite(_) => ErrorKind::Composite,
            Self::Persist(_) => ErrorKind::Persist,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Prefix the message with the label that was being processed.
    ///
    /// The variant (and therefore the stage) is preserved.
    pub fn for_label(self, label: &str) -> Self {
        fn tag(label: &str, msg: String) -> String {
            format!("label {label:?}: {msg}")
        }

        match self {
            Self::Decode(m) => Self::Decode(tag(label, m)),
            Self::Composite(m) => Self::Composite(tag(label, m)),
            Self::Persist(m) => Self::Persist(tag(label, m)),
            Self::Timeout(m) => Self::Timeout(tag(label, m)),
            Self::Validation(m) => Self::Validation(tag(label, m)),
            Self::Other(e) => Self::Other(e.context(format!("label {label:?}"))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
