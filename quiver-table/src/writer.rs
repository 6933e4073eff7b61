use std::path::{Path, PathBuf};

use parquet::basic::Compression;
use tracing::warn;

use quiver_result::Result;

use crate::codec::Record;
use crate::engine::ColumnSink;

/// Writer configuration: compression codec and row-group sizing.
///
/// Larger row groups compress better but decode as fewer, larger chunks;
/// smaller ones produce more chunks per column on read-back.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    pub compression: Compression,
    pub max_row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self::snappy()
    }
}

impl WriterConfig {
    /// Snappy compression, 8192-row groups.
    pub fn snappy() -> Self {
        Self {
            compression: Compression::SNAPPY,
            max_row_group_size: 8192,
        }
    }

    /// No compression.
    pub fn uncompressed() -> Self {
        Self {
            compression: Compression::UNCOMPRESSED,
            ..Self::snappy()
        }
    }

    pub fn with_max_row_group_size(mut self, rows: usize) -> Self {
        self.max_row_group_size = rows;
        self
    }
}

/// Buffered table writer for one record type.
///
/// Records accumulate in memory; nothing touches storage until
/// [`finish`](Self::finish), which emits every codec column once and
/// finalizes the file. A writer holding zero records creates no file.
///
/// If the writer is dropped while still open and non-empty, a best-effort
/// finish runs and any error is swallowed — cleanup must not panic. Callers
/// who care about write failures call `finish()` explicitly and check the
/// result.
pub struct TableWriter<R: Record> {
    path: PathBuf,
    config: WriterConfig,
    buffer: Vec<R>,
    finished: bool,
}

impl<R: Record> TableWriter<R> {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_config(path, WriterConfig::default())
    }

    pub fn with_config(path: impl AsRef<Path>, config: WriterConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// Buffer a single record. No I/O occurs.
    pub fn append(&mut self, record: R) {
        self.buffer.push(record);
    }

    /// Buffer multiple records at once.
    pub fn append_many<I: IntoIterator<Item = R>>(&mut self, records: I) {
        self.buffer.extend(records);
    }

    /// Number of buffered records.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Flush the buffer to storage and finalize the file.
    ///
    /// Finishing twice is a no-op. An empty buffer finishes without creating
    /// a file. On error the writer stays open so the caller may retry.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        if !self.buffer.is_empty() {
            let codec = R::codec();
            let mut sink = ColumnSink::with_capacity(codec.len());
            codec.write_columns(&self.buffer, &mut sink);
            sink.finish(&self.path, &self.config)?;
        }

        self.finished = true;
        Ok(())
    }

    /// Drop all buffered records without writing, and mark the writer
    /// finished. Only meaningful before [`finish`](Self::finish).
    pub fn discard(&mut self) {
        self.buffer.clear();
        self.finished = true;
    }
}

impl<R: Record> Drop for TableWriter<R> {
    fn drop(&mut self) {
        if !self.finished && !self.buffer.is_empty() {
            if let Err(err) = self.finish() {
                warn!(path = %self.path.display(), %err, "implicit finish on drop failed");
            }
        }
    }
}
