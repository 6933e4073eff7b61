//! Error types and result definitions for the Quiver data-access layer.
//!
//! This crate provides the unified error type ([`Error`]) and result type alias
//! ([`Result<T>`]) used throughout all Quiver crates. Every operation that can
//! fail returns `Result<T>`, and errors propagate upward with the `?` operator.
//!
//! # Error Categories
//!
//! - **Engine passthroughs** ([`Error::Io`], [`Error::Arrow`],
//!   [`Error::Parquet`]): failures surfaced from the storage engine, kept as
//!   typed wrappers rather than flattened into strings.
//! - **Lookup failures** ([`Error::ColumnNotFound`],
//!   [`Error::FieldNotRegistered`]): a named column is absent from a table, or
//!   a field reference was never registered in a codec.
//! - **Type errors** ([`Error::TypeMismatch`]): the requested value type and
//!   the stored column type disagree.
//! - **Access errors** ([`Error::OutOfRange`], [`Error::NullColumn`]):
//!   bounds-checked access past the end of a column, or a dense zero-copy view
//!   requested over nullable data.
//!
//! No operation downgrades an error to a default value; the only sanctioned
//! exceptions (default-initialized unselected fields, the swallowed error in a
//! writer's drop path) are documented at their call sites in `quiver-table`.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
