//! JSONL record sink
//!
//! One JSON object per line, appended as records arrive. The file is
//! opened in append mode so interrupted runs never clobber earlier output.

use crate::extract::Record;
use crate::output::traits::{Sink, SinkError, SinkResult};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Sink writing records as JSON lines to a file
pub struct JsonlSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonlSink {
    /// Opens (or creates) the JSONL file at `path` for appending
    pub fn new<P: AsRef<Path>>(path: P) -> SinkResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for JsonlSink {
    fn push(&self, record: &Record) -> SinkResult<()> {
        let line =
            serde_json::to_string(record).map_err(|e| SinkError::Serialize(e.to_string()))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|e| SinkError::Write(format!("writer lock poisoned: {}", e)))?;

        writeln!(writer, "{}", line)?;
        Ok(())
    }

    fn finalize(&self) -> SinkResult<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| SinkError::Write(format!("writer lock poisoned: {}", e)))?;

        writer.flush()?;
        Ok(())
    }
}
