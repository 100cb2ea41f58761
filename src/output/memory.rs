//! In-memory record sink
//!
//! Collects records into a vector behind a mutex. Used by tests that need
//! to assert on exactly what reached the sink.

use crate::extract::Record;
use crate::output::traits::{Sink, SinkError, SinkResult};
use std::sync::Mutex;

/// Sink buffering records in memory
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything pushed so far
    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Number of records pushed so far
    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for MemorySink {
    fn push(&self, record: &Record) -> SinkResult<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| SinkError::Write(format!("records lock poisoned: {}", e)))?;

        records.push(record.clone());
        Ok(())
    }
}
