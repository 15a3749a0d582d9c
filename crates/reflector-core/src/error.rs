//! Error types for rendering and writing.

use std::path::PathBuf;

use crate::sink::WrittenDocument;

/// Invalid name in a configuration value.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown write strategy name.
    #[error("unknown write strategy: {0}")]
    UnknownStrategy(String),
    /// Unknown layer name in a layer expression.
    #[error("unknown layer: {0}")]
    UnknownLayer(String),
}

/// A destination could not be written.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {}: {source}", .path.display())]
pub struct SinkError {
    /// Destination that failed.
    pub path: PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: std::io::Error,
}

impl SinkError {
    /// Create a sink error for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// One or more workers of a batch failed.
///
/// Documents written by workers that completed are kept in `written`; they
/// are not rolled back.
#[derive(Debug, thiserror::Error)]
#[error("{failed} of {groups} documents failed: {first}")]
pub struct BatchFailure {
    /// First failure in group order.
    #[source]
    pub first: SinkError,
    /// Documents written by workers that succeeded.
    pub written: Vec<WrittenDocument>,
    /// Number of failed groups.
    pub failed: usize,
    /// Number of dispatched groups.
    pub groups: usize,
}

/// Partitioned write error.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Worker pool could not be created.
    #[error("failed to create worker pool: {0}")]
    Pool(String),
    /// Distinct group keys map to the same destination.
    #[error("document {slug} would be written by several groups: {}", .keys.join(", "))]
    DuplicateDocument {
        /// Shared destination slug.
        slug: String,
        /// Group keys that collide.
        keys: Vec<String>,
    },
    /// Single-document write failed.
    #[error(transparent)]
    Sink(#[from] SinkError),
    /// Batch had worker failures.
    #[error(transparent)]
    Batch(#[from] BatchFailure),
}
