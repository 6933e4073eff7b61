//! Typed, zero-copy record access over Parquet tables.
//!
//! This crate sits between application record structs and the Parquet/Arrow
//! storage engine. Callers declare once how a record type maps onto named,
//! typed columns, then read or write whole tables through that mapping with
//! minimal copying.
//!
//! # Architecture
//!
//! - [`Table`]: an opened table — owns the decoded record batches and hands
//!   out chunked zero-copy column accessors.
//! - [`Cell`] / [`PrimitiveCell`]: the per-type codec surface. Primitive
//!   numerics ride the zero-copy path; text and booleans take dedicated
//!   allocating paths (variable-width and bit-packed data have no flat view).
//! - [`FieldRef`] / [`field!`]: a registered association between one record
//!   field and one column, with a stable identity for reverse lookup.
//! - [`FieldCodec`] / [`Record`]: the per-record-type registry of bindings,
//!   built once and shared process-wide.
//! - [`Query`]: projection + conjunctive filter pushdown, collected into a
//!   [`Table`] or decoded records in a single engine scan.
//! - [`TableWriter`]: buffers records in memory and emits all columns at once
//!   on finish.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use std::sync::LazyLock;
//! use quiver_table::{field, FieldCodec, FilterOp, Query, Record, TableWriter};
//!
//! #[derive(Debug, Default, Clone)]
//! struct Tick {
//!     id: i64,
//!     symbol: String,
//!     price: f64,
//! }
//!
//! static TICK_CODEC: LazyLock<FieldCodec<Tick>> = LazyLock::new(|| {
//!     FieldCodec::new()
//!         .with_field("id", field!(Tick, id))
//!         .with_field("symbol", field!(Tick, symbol))
//!         .with_field("price", field!(Tick, price))
//! });
//!
//! impl Record for Tick {
//!     fn codec() -> &'static FieldCodec<Self> {
//!         &TICK_CODEC
//!     }
//! }
//!
//! # fn main() -> quiver_result::Result<()> {
//! let mut writer = TableWriter::new("ticks.parquet");
//! writer.append(Tick { id: 1, symbol: "QQQ".into(), price: 42.5 });
//! writer.finish()?;
//!
//! let cheap: Vec<Tick> = Query::new("ticks.parquet")
//!     .filter(field!(Tick, price), FilterOp::Lt, 100.0)?
//!     .collect()?;
//! # Ok(())
//! # }
//! ```

mod field;

mod cell;
mod codec;
mod engine;
mod handle;
mod query;
mod types;
mod writer;

pub use cell::{Cell, PrimitiveCell, TimestampMs};
pub use codec::{FieldCodec, Record};
pub use field::FieldRef;
pub use handle::Table;
pub use query::{FilterOp, Query};
pub use types::{ColumnInfo, ScalarValue};
pub use writer::{TableWriter, WriterConfig};

// Re-export common types for convenience
pub use parquet::basic::Compression;
pub use quiver_column::ColumnAccessor;
pub use quiver_result::{Error, Result};
