//! Chunked, zero-copy column accessors.
//!
//! Columnar tables are decoded one row group at a time, so a single logical
//! column arrives as several contiguous runs of values. [`ColumnAccessor`]
//! aggregates those runs behind one interface: O(1) length, O(log k) random
//! access across k chunks, and forward iteration that crosses chunk boundaries
//! transparently.
//!
//! A chunk is a plain `&[T]` borrowed from the owning table handle. Holding
//! borrows rather than owned buffers is what makes the accessor zero-copy, and
//! the borrow checker guarantees an accessor can never outlive the handle that
//! produced it.

#![forbid(unsafe_code)]

mod accessor;
mod iter;

pub use accessor::ColumnAccessor;
pub use iter::ColumnIter;
