//! Output module: record sinks and run statistics
//!
//! Sinks are append-only consumers of extracted records. Pushes may arrive
//! out of order across workers and may be duplicated on rare retry paths;
//! downstream consumers tolerate both.

mod jsonl;
mod memory;
mod sqlite_sink;
pub mod stats;
mod traits;

pub use jsonl::JsonlSink;
pub use memory::MemorySink;
pub use sqlite_sink::SqliteSink;
pub use stats::{RunStats, RunSummary};
pub use traits::{Sink, SinkError, SinkResult};

use crate::config::OutputConfig;
use std::sync::Arc;

/// Builds the configured record sink
///
/// A set `database-path` selects the SQLite sink; otherwise records go to
/// the JSONL file at `records-path`.
pub fn build_sink(config: &OutputConfig) -> SinkResult<Arc<dyn Sink>> {
    match &config.database_path {
        Some(db_path) => Ok(Arc::new(SqliteSink::new(db_path)?)),
        None => Ok(Arc::new(JsonlSink::new(&config.records_path)?)),
    }
}
