//! Sink trait and error types
//!
//! A sink receives records as they are extracted, page by page, so output
//! produced early in a run survives a later page's failure. A failed push
//! is reported to the controller but never aborts the page or the run.

use crate::extract::Record;
use thiserror::Error;

/// Errors that can occur while pushing records to a sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write record: {0}")]
    Write(String),

    #[error("Failed to serialize record: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Append-only consumer of extracted records
///
/// Implementations must be thread-safe: workers push concurrently and no
/// ordering is guaranteed across pages.
pub trait Sink: Send + Sync {
    /// Appends one record
    fn push(&self, record: &Record) -> SinkResult<()>;

    /// Flushes any buffered state at the end of a run
    fn finalize(&self) -> SinkResult<()> {
        Ok(())
    }
}
