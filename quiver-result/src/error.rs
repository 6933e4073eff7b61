use std::io;

use arrow::datatypes::DataType;
use thiserror::Error;

/// Unified error type for all Quiver operations.
///
/// This enum encompasses every failure mode across the Quiver stack, from
/// engine-level I/O failures to field-binding lookup errors. Each variant
/// carries enough context to diagnose the failure at the call site that
/// triggered it.
///
/// # Error Handling Strategy
///
/// Errors propagate upward through the call stack using Rust's `?` operator.
/// Engine failures (I/O, Arrow, Parquet) are wrapped rather than stringified so
/// callers can still match on the underlying cause. Registration-time
/// programmer errors (duplicate field bindings) panic during codec
/// construction instead of surfacing here; they are bugs, not runtime
/// conditions.
///
/// # Thread Safety
///
/// `Error` implements `Send` and `Sync`, allowing errors to cross thread
/// boundaries when callers run table operations on worker threads.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    ///
    /// Wraps standard library I/O errors: opening a table path that does not
    /// exist, creating the output file for a writer, or any read/write failure
    /// underneath the storage engine. The underlying `io::Error` carries the
    /// specific cause (not found, permission denied, disk full).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Arrow library error during columnar data operations.
    ///
    /// Surfaces when assembling record batches, concatenating chunks, or
    /// evaluating comparison kernels. These errors come from the columnar
    /// memory layer and typically indicate malformed data rather than caller
    /// mistakes.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet library error while decoding or encoding a table file.
    ///
    /// Raised by the storage engine for malformed files, unreadable metadata,
    /// or failures while finalizing a written file.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// No column with the given name exists in the table.
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// The requested value type does not match the column's stored type.
    ///
    /// Requesting a column under the wrong type fails that fetch only; the
    /// rest of the table handle remains usable.
    #[error("column '{column}': requested type {requested}, stored type {stored}")]
    TypeMismatch {
        column: String,
        requested: DataType,
        stored: DataType,
    },

    /// A field reference or column name was never registered in the codec.
    ///
    /// Raised when a query selects or filters on a field that the record
    /// type's codec does not know about. Surfaces before any I/O occurs.
    #[error("field not registered in codec: {0}")]
    FieldNotRegistered(String),

    /// Bounds-checked column access past the end of the column.
    #[error("index {index} out of range for column of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// A dense zero-copy view was requested over a column containing nulls.
    ///
    /// Flat slices cannot represent missing values; callers must either read
    /// the column through an allocating path or densify the data upstream.
    #[error("column '{0}' contains nulls and has no dense zero-copy view")]
    NullColumn(String),
}
