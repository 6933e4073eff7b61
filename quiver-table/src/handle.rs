use std::path::Path;

use arrow::array::{Array, BooleanArray, PrimitiveArray, RecordBatch, StringArray};
use arrow::compute::concat_batches;
use arrow::datatypes::{DataType, SchemaRef, TimeUnit, TimestampMillisecondType};

use quiver_column::ColumnAccessor;
use quiver_result::{Error, Result};

use crate::cell::PrimitiveCell;
use crate::codec::Record;
use crate::engine;
use crate::types::ColumnInfo;

/// An opened table: the schema plus the decoded record batches.
///
/// Ownership is exclusive and move-only — a `Table` is never cloned, so two
/// handles can never describe the same underlying buffers. Column accessors
/// borrow the handle immutably and therefore cannot outlive it.
///
/// ```no_run
/// use quiver_table::Table;
///
/// # fn main() -> quiver_result::Result<()> {
/// let table = Table::open("ticks.parquet")?;
/// let prices = table.get_column::<f64>("price")?;
/// let sum: f64 = prices.iter().sum();
/// # Ok(())
/// # }
/// ```
pub struct Table {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl Table {
    /// Open a table, reading all columns.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let (schema, batches) = engine::read_table(path.as_ref(), None)?;
        Ok(Self { schema, batches })
    }

    /// Open a table, reading only the named columns.
    ///
    /// Columns referenced by a later filter are not inferred here; callers
    /// doing their own filtering must include those columns themselves.
    pub fn open_projected<S: AsRef<str>>(path: impl AsRef<Path>, columns: &[S]) -> Result<Self> {
        let names: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let (schema, batches) = engine::read_table(path.as_ref(), Some(&names))?;
        Ok(Self { schema, batches })
    }

    pub(crate) fn from_parts(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self { schema, batches }
    }

    /// Number of rows. Pure query; no I/O is re-issued.
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    /// Number of columns.
    pub fn num_cols(&self) -> usize {
        self.schema.fields().len()
    }

    /// Name and declared type of every column, in schema order.
    pub fn columns(&self) -> Vec<ColumnInfo> {
        self.schema
            .fields()
            .iter()
            .map(|f| ColumnInfo {
                name: f.name().clone(),
                data_type: f.data_type().clone(),
            })
            .collect()
    }

    /// The underlying Arrow schema.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Coalesce all batches into one contiguous batch per column.
    ///
    /// Optional hint: accessors fetched afterwards see a single chunk, which
    /// can help tight loops. Returns whether any coalescing occurred. Row
    /// order and values are unchanged.
    pub fn rechunk(&mut self) -> Result<bool> {
        if self.batches.len() <= 1 {
            return Ok(false);
        }
        let merged = concat_batches(&self.schema, &self.batches)?;
        self.batches = vec![merged];
        Ok(true)
    }

    /// Zero-copy accessor over a primitive column.
    ///
    /// Fails with [`Error::ColumnNotFound`] if no such column exists and
    /// [`Error::TypeMismatch`] if the stored type differs from `T`; neither
    /// failure invalidates the handle. The accessor borrows this table and is
    /// freshly constructed on every call.
    pub fn get_column<T: PrimitiveCell + arrow::datatypes::ArrowNativeType>(
        &self,
        name: &str,
    ) -> Result<ColumnAccessor<'_, T>> {
        let index = self.column_index(name)?;
        let stored = self.schema.field(index).data_type();
        if stored != &T::column_type() {
            return Err(Error::TypeMismatch {
                column: name.to_string(),
                requested: T::column_type(),
                stored: stored.clone(),
            });
        }

        let mut accessor = ColumnAccessor::new();
        for batch in &self.batches {
            let array = batch
                .column(index)
                .as_any()
                .downcast_ref::<PrimitiveArray<T::Arrow>>()
                .ok_or_else(|| Error::TypeMismatch {
                    column: name.to_string(),
                    requested: T::column_type(),
                    stored: stored.clone(),
                })?;
            if array.null_count() > 0 {
                return Err(Error::NullColumn(name.to_string()));
            }
            accessor.push_chunk(array.values().as_ref());
        }
        Ok(accessor)
    }

    /// Zero-copy accessor over a millisecond-timestamp column, as raw `i64`
    /// milliseconds since the epoch.
    pub fn get_datetime_column(&self, name: &str) -> Result<ColumnAccessor<'_, i64>> {
        let index = self.column_index(name)?;
        let stored = self.schema.field(index).data_type();
        if !matches!(stored, DataType::Timestamp(TimeUnit::Millisecond, _)) {
            return Err(Error::TypeMismatch {
                column: name.to_string(),
                requested: DataType::Timestamp(TimeUnit::Millisecond, None),
                stored: stored.clone(),
            });
        }

        let mut accessor = ColumnAccessor::new();
        for batch in &self.batches {
            let array = batch
                .column(index)
                .as_any()
                .downcast_ref::<PrimitiveArray<TimestampMillisecondType>>()
                .ok_or_else(|| Error::TypeMismatch {
                    column: name.to_string(),
                    requested: DataType::Timestamp(TimeUnit::Millisecond, None),
                    stored: stored.clone(),
                })?;
            if array.null_count() > 0 {
                return Err(Error::NullColumn(name.to_string()));
            }
            accessor.push_chunk(array.values().as_ref());
        }
        Ok(accessor)
    }

    /// Owned copies of a text column's values.
    ///
    /// Text has no fixed-width layout, so there is no zero-copy variant; this
    /// always allocates a fresh vector of owned strings.
    pub fn get_string_column(&self, name: &str) -> Result<Vec<String>> {
        let index = self.column_index(name)?;
        let stored = self.schema.field(index).data_type();

        let mut values = Vec::with_capacity(self.num_rows());
        for batch in &self.batches {
            let array = batch
                .column(index)
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| Error::TypeMismatch {
                    column: name.to_string(),
                    requested: DataType::Utf8,
                    stored: stored.clone(),
                })?;
            if array.null_count() > 0 {
                return Err(Error::NullColumn(name.to_string()));
            }
            for i in 0..array.len() {
                values.push(array.value(i).to_string());
            }
        }
        Ok(values)
    }

    /// Owned copies of a boolean column's values.
    ///
    /// Booleans are bit-packed in storage and cannot be exposed as a flat
    /// typed slice; this allocating path is the only correct way to read them.
    pub fn get_bool_column(&self, name: &str) -> Result<Vec<bool>> {
        let index = self.column_index(name)?;
        let stored = self.schema.field(index).data_type();

        let mut values = Vec::with_capacity(self.num_rows());
        for batch in &self.batches {
            let array = batch
                .column(index)
                .as_any()
                .downcast_ref::<BooleanArray>()
                .ok_or_else(|| Error::TypeMismatch {
                    column: name.to_string(),
                    requested: DataType::Boolean,
                    stored: stored.clone(),
                })?;
            if array.null_count() > 0 {
                return Err(Error::NullColumn(name.to_string()));
            }
            for i in 0..array.len() {
                values.push(array.value(i));
            }
        }
        Ok(values)
    }

    /// Decode every row into records using `R`'s codec.
    ///
    /// This copies data into records; use [`get_column`](Self::get_column) for
    /// zero-copy access.
    pub fn read_all_as<R: Record>(&self) -> Result<Vec<R>> {
        R::codec().read_all(self)
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.schema
            .column_with_name(name)
            .map(|(index, _)| index)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }
}
