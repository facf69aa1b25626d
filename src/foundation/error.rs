/// Convenience result type used across the harness.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Fatal error taxonomy for harness APIs.
///
/// Per-item failures (render errors, missing baselines, mismatches) are not errors at this level;
/// they are recorded on [`crate::ComparisonResult`] values so a run can report all of them.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    /// The execution environment cannot produce images comparable to the stored baselines.
    #[error("unsupported environment: {0}")]
    UnsupportedEnvironment(String),

    /// Sample or reference-image enumeration failed at the storage layer.
    #[error("corpus unavailable: {0}")]
    CorpusUnavailable(String),

    /// Invalid user-provided configuration or corpus data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SnapshotError {
    /// Build a [`SnapshotError::UnsupportedEnvironment`] value.
    pub fn unsupported_environment(msg: impl Into<String>) -> Self {
        Self::UnsupportedEnvironment(msg.into())
    }

    /// Build a [`SnapshotError::CorpusUnavailable`] value.
    pub fn corpus_unavailable(msg: impl Into<String>) -> Self {
        Self::CorpusUnavailable(msg.into())
    }

    /// Build a [`SnapshotError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SnapshotError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error aborts a whole run (as opposed to bad input caught up front).
    pub fn is_fatal_run_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedEnvironment(_) | Self::CorpusUnavailable(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
