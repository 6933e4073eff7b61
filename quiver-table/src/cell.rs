use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
    TimestampMillisecondArray, UInt64Array,
};
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    UInt64Type,
};

use quiver_result::Result;

use crate::handle::Table;
use crate::types::ScalarValue;

/// Per-type codec surface: how one field type reads from and writes to a
/// stored column.
///
/// Primitive numerics ride the zero-copy accessor; `String` goes through the
/// allocating text path; `bool` goes through the dedicated boolean path
/// because bit-packed columns cannot be viewed as flat slices. All readers
/// make a single pass and assign straight into the output records.
pub trait Cell: Default + Clone + Send + Sync + 'static {
    /// Arrow type of the backing column.
    fn column_type() -> DataType;

    /// Bulk-read the named column from `table` into `records` through `set`.
    ///
    /// Stops early if the column yields fewer values than there are records.
    fn read_into<R>(
        table: &Table,
        column: &str,
        records: &mut [R],
        set: fn(&mut R, Self),
    ) -> Result<()>;

    /// Build one column's array from per-record values, for a write.
    fn into_array(values: Vec<Self>) -> ArrayRef;

    /// Convert into a typed filter operand.
    fn into_scalar(self) -> ScalarValue;
}

/// Marker for cell types with a fixed-width Arrow representation, eligible
/// for zero-copy access through [`Table::get_column`].
pub trait PrimitiveCell: Cell + Copy {
    type Arrow: ArrowPrimitiveType<Native = Self>;
}

macro_rules! impl_primitive_cell {
    ($native:ty, $arrow:ty, $array:ty, $data_type:expr, $scalar:ident) => {
        impl Cell for $native {
            fn column_type() -> DataType {
                $data_type
            }

            fn read_into<R>(
                table: &Table,
                column: &str,
                records: &mut [R],
                set: fn(&mut R, Self),
            ) -> Result<()> {
                let values = table.get_column::<$native>(column)?;
                for (record, value) in records.iter_mut().zip(values.iter()) {
                    set(record, *value);
                }
                Ok(())
            }

            fn into_array(values: Vec<Self>) -> ArrayRef {
                Arc::new(<$array>::from(values))
            }

            fn into_scalar(self) -> ScalarValue {
                ScalarValue::$scalar(self)
            }
        }

        impl PrimitiveCell for $native {
            type Arrow = $arrow;
        }
    };
}

impl_primitive_cell!(i32, Int32Type, Int32Array, DataType::Int32, Int32);
impl_primitive_cell!(i64, Int64Type, Int64Array, DataType::Int64, Int64);
impl_primitive_cell!(u64, UInt64Type, UInt64Array, DataType::UInt64, UInt64);
impl_primitive_cell!(f32, Float32Type, Float32Array, DataType::Float32, Float32);
impl_primitive_cell!(f64, Float64Type, Float64Array, DataType::Float64, Float64);

impl Cell for String {
    fn column_type() -> DataType {
        DataType::Utf8
    }

    fn read_into<R>(
        table: &Table,
        column: &str,
        records: &mut [R],
        set: fn(&mut R, Self),
    ) -> Result<()> {
        let values = table.get_string_column(column)?;
        for (record, value) in records.iter_mut().zip(values) {
            set(record, value);
        }
        Ok(())
    }

    fn into_array(values: Vec<Self>) -> ArrayRef {
        Arc::new(StringArray::from(values))
    }

    fn into_scalar(self) -> ScalarValue {
        ScalarValue::Utf8(self)
    }
}

impl Cell for bool {
    fn column_type() -> DataType {
        DataType::Boolean
    }

    fn read_into<R>(
        table: &Table,
        column: &str,
        records: &mut [R],
        set: fn(&mut R, Self),
    ) -> Result<()> {
        let values = table.get_bool_column(column)?;
        for (record, value) in records.iter_mut().zip(values) {
            set(record, value);
        }
        Ok(())
    }

    fn into_array(values: Vec<Self>) -> ArrayRef {
        Arc::new(BooleanArray::from(values))
    }

    fn into_scalar(self) -> ScalarValue {
        ScalarValue::Bool(self)
    }
}

/// Millisecond-precision UTC timestamp, stored as an Arrow
/// `Timestamp(Millisecond)` column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimestampMs(pub i64);

impl TimestampMs {
    pub fn millis(self) -> i64 {
        self.0
    }
}

impl From<i64> for TimestampMs {
    fn from(millis: i64) -> Self {
        TimestampMs(millis)
    }
}

impl Cell for TimestampMs {
    fn column_type() -> DataType {
        DataType::Timestamp(TimeUnit::Millisecond, None)
    }

    fn read_into<R>(
        table: &Table,
        column: &str,
        records: &mut [R],
        set: fn(&mut R, Self),
    ) -> Result<()> {
        let values = table.get_datetime_column(column)?;
        for (record, value) in records.iter_mut().zip(values.iter()) {
            set(record, TimestampMs(*value));
        }
        Ok(())
    }

    fn into_array(values: Vec<Self>) -> ArrayRef {
        let millis: Vec<i64> = values.into_iter().map(|t| t.0).collect();
        Arc::new(TimestampMillisecondArray::from(millis))
    }

    fn into_scalar(self) -> ScalarValue {
        ScalarValue::Timestamp(self.0)
    }
}
