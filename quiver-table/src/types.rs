use arrow::array::{
    ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
    TimestampMillisecondArray, UInt64Array,
};
use arrow::datatypes::{DataType, TimeUnit};
use std::sync::Arc;

/// Name and declared type of one stored column.
///
/// Produced from the engine's schema; consumed read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: DataType,
}

/// A typed scalar operand for filter predicates.
///
/// The variant pins the operand's type; queries built through typed field
/// references can never hold a variant that disagrees with the column's
/// stored type.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Int32(i32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Utf8(String),
    Bool(bool),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
}

impl ScalarValue {
    /// Arrow type this operand compares against.
    pub fn data_type(&self) -> DataType {
        match self {
            ScalarValue::Int32(_) => DataType::Int32,
            ScalarValue::Int64(_) => DataType::Int64,
            ScalarValue::UInt64(_) => DataType::UInt64,
            ScalarValue::Float32(_) => DataType::Float32,
            ScalarValue::Float64(_) => DataType::Float64,
            ScalarValue::Utf8(_) => DataType::Utf8,
            ScalarValue::Bool(_) => DataType::Boolean,
            ScalarValue::Timestamp(_) => DataType::Timestamp(TimeUnit::Millisecond, None),
        }
    }

    /// One-element array used as the scalar side of a comparison kernel.
    pub(crate) fn to_array(&self) -> ArrayRef {
        match self {
            ScalarValue::Int32(v) => Arc::new(Int32Array::from(vec![*v])),
            ScalarValue::Int64(v) => Arc::new(Int64Array::from(vec![*v])),
            ScalarValue::UInt64(v) => Arc::new(UInt64Array::from(vec![*v])),
            ScalarValue::Float32(v) => Arc::new(Float32Array::from(vec![*v])),
            ScalarValue::Float64(v) => Arc::new(Float64Array::from(vec![*v])),
            ScalarValue::Utf8(v) => Arc::new(StringArray::from(vec![v.as_str()])),
            ScalarValue::Bool(v) => Arc::new(BooleanArray::from(vec![*v])),
            ScalarValue::Timestamp(v) => Arc::new(TimestampMillisecondArray::from(vec![*v])),
        }
    }
}
