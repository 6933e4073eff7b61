use std::any::type_name;

use arrow::array::ArrayRef;

use quiver_result::{Error, Result};

use crate::cell::Cell;
use crate::engine::ColumnSink;
use crate::field::FieldRef;
use crate::handle::Table;

type ColumnReader<R> = Box<dyn Fn(&Table, &mut [R]) -> Result<()> + Send + Sync>;
type ColumnWriter<R> = Box<dyn Fn(&[R]) -> ArrayRef + Send + Sync>;

struct Binding<R> {
    column: String,
    identity: usize,
    reader: ColumnReader<R>,
    writer: ColumnWriter<R>,
}

/// Registry of field bindings for one record type.
///
/// Holds an ordered list of (column name, field identity, reader, writer)
/// entries. Readers pull column values straight into record fields — through
/// the zero-copy accessor for primitives, through the allocating paths for
/// text and booleans. Writers reverse the mapping, producing one full column
/// per binding.
///
/// A codec is built once, inside the `LazyLock` behind [`Record::codec`], and
/// never mutated afterwards; concurrent reads from multiple threads are safe
/// under that discipline.
///
/// # Panics
///
/// [`with_field`](Self::with_field) panics on a duplicate column name or a
/// duplicate field identity. Both are programmer errors in the registration
/// itself and surface the first time the codec is constructed.
pub struct FieldCodec<R> {
    bindings: Vec<Binding<R>>,
}

impl<R: 'static> FieldCodec<R> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Register one column against one field of `R`.
    pub fn with_field<T: Cell>(mut self, column: impl Into<String>, field: FieldRef<R, T>) -> Self {
        let column = column.into();
        let identity = field.identity();
        for existing in &self.bindings {
            if existing.column == column {
                panic!(
                    "codec for {}: column '{}' registered twice",
                    type_name::<R>(),
                    column
                );
            }
            if existing.identity == identity {
                panic!(
                    "codec for {}: field at offset {} bound to both '{}' and '{}'",
                    type_name::<R>(),
                    identity,
                    existing.column,
                    column
                );
            }
        }

        let reader_column = column.clone();
        let set = field.set;
        let get = field.get;
        self.bindings.push(Binding {
            column,
            identity,
            reader: Box::new(move |table, records| {
                T::read_into(table, &reader_column, records, set)
            }),
            writer: Box::new(move |records| {
                let values: Vec<T> = records.iter().map(get).collect();
                T::into_array(values)
            }),
        });
        self
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Registered column names, in registration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.column.as_str()).collect()
    }

    /// Reverse lookup: the column name a field identity was registered under.
    ///
    /// Linear scan over the bindings; fails with
    /// [`Error::FieldNotRegistered`] if the identity was never added. This is
    /// how query builders translate a typed field reference back into a raw
    /// column name.
    pub fn find_column_name(&self, identity: usize) -> Result<&str> {
        self.bindings
            .iter()
            .find(|b| b.identity == identity)
            .map(|b| b.column.as_str())
            .ok_or_else(|| {
                Error::FieldNotRegistered(format!(
                    "{} field at offset {}",
                    type_name::<R>(),
                    identity
                ))
            })
    }

    pub(crate) fn column_position(&self, column: &str) -> Option<usize> {
        self.bindings.iter().position(|b| b.column == column)
    }

    /// Decode every row of `table` into records.
    ///
    /// Allocates `table.num_rows()` default-initialized records and runs every
    /// registered reader over them, in registration order. Readers stop early
    /// if their column yields fewer values than rows remain.
    pub fn read_all(&self, table: &Table) -> Result<Vec<R>>
    where
        R: Default + Clone,
    {
        let mut records = vec![R::default(); table.num_rows()];
        for binding in &self.bindings {
            (binding.reader)(table, &mut records)?;
        }
        Ok(records)
    }

    /// Decode only the bindings at `positions`, leaving every other field at
    /// its default value.
    pub fn read_selected(&self, table: &Table, positions: &[usize]) -> Result<Vec<R>>
    where
        R: Default + Clone,
    {
        let mut records = vec![R::default(); table.num_rows()];
        for &position in positions {
            (self.bindings[position].reader)(table, &mut records)?;
        }
        Ok(records)
    }

    /// Produce every column from `records` and stage it into `sink`, in
    /// registration order.
    pub(crate) fn write_columns(&self, records: &[R], sink: &mut ColumnSink) {
        for binding in &self.bindings {
            sink.stage(&binding.column, (binding.writer)(records));
        }
    }
}

impl<R: 'static> Default for FieldCodec<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// A record type with a process-wide field codec.
///
/// Implementations hold the codec in a `std::sync::LazyLock` so it is
/// constructed on first use and read-only afterwards:
///
/// ```
/// use std::sync::LazyLock;
/// use quiver_table::{field, FieldCodec, Record};
///
/// #[derive(Debug, Default, Clone)]
/// struct Sample {
///     id: i64,
///     score: f64,
/// }
///
/// static SAMPLE_CODEC: LazyLock<FieldCodec<Sample>> = LazyLock::new(|| {
///     FieldCodec::new()
///         .with_field("id", field!(Sample, id))
///         .with_field("score", field!(Sample, score))
/// });
///
/// impl Record for Sample {
///     fn codec() -> &'static FieldCodec<Self> {
///         &SAMPLE_CODEC
///     }
/// }
/// ```
pub trait Record: Default + Clone + Send + Sync + Sized + 'static {
    fn codec() -> &'static FieldCodec<Self>;
}
