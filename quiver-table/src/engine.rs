//! Narrow wrapper over the storage engine (the `parquet` + `arrow` crates).
//!
//! Everything the rest of the crate knows about the physical file format goes
//! through this module: plain/projected opens, filtered scans with predicate
//! pushdown, and the column-staging writer. Encoding, compression, row-group
//! layout, and filter execution belong to the engine; this module only drives
//! them.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, RecordBatch, Scalar};
use arrow::compute::kernels::cmp;
use arrow::datatypes::{Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatchReader;
use parquet::arrow::arrow_reader::{
    ArrowPredicate, ArrowPredicateFn, ParquetRecordBatchReaderBuilder, RowFilter,
};
use parquet::arrow::{ArrowWriter, ProjectionMask};
use parquet::file::properties::WriterProperties;
use tracing::debug;

use quiver_result::{Error, Result};

use crate::query::{Filter, FilterOp};
use crate::writer::WriterConfig;

/// Open a table, reading all columns or only `projection`.
///
/// Returns the (possibly projected) schema and the decoded batches, one per
/// row group the engine chose to emit.
pub(crate) fn read_table(
    path: &Path,
    projection: Option<&[String]>,
) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let file = File::open(path)?;
    let mut builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    if let Some(names) = projection {
        let indices = resolve_columns(builder.schema(), names)?;
        let mask = ProjectionMask::roots(builder.parquet_schema(), indices);
        builder = builder.with_projection(mask);
    }

    let reader = builder.build()?;
    let schema = reader.schema();
    let batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;

    debug!(
        path = %path.display(),
        rows = batches.iter().map(|b| b.num_rows()).sum::<usize>(),
        chunks = batches.len(),
        "opened table"
    );
    Ok((schema, batches))
}

/// Filtered scan with projection, predicate pushdown, and an optional row
/// limit.
///
/// Each predicate becomes an engine-level row filter evaluated during the
/// scan, so rows failing a predicate are never materialized. Operand/column
/// type agreement is checked against the file schema before any decoding
/// starts.
pub(crate) fn scan(
    path: &Path,
    projection: Option<&[String]>,
    filters: &[Filter],
    limit: Option<usize>,
) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let file = File::open(path)?;
    let mut builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    if !filters.is_empty() {
        let mut predicates: Vec<Box<dyn ArrowPredicate>> = Vec::with_capacity(filters.len());
        for filter in filters {
            predicates.push(build_predicate(&builder, filter)?);
        }
        builder = builder.with_row_filter(RowFilter::new(predicates));
    }

    if let Some(names) = projection {
        let indices = resolve_columns(builder.schema(), names)?;
        let mask = ProjectionMask::roots(builder.parquet_schema(), indices);
        builder = builder.with_projection(mask);
    }

    if let Some(n) = limit {
        builder = builder.with_limit(n);
    }

    let reader = builder.build()?;
    let schema = reader.schema();
    let batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;

    debug!(
        path = %path.display(),
        predicates = filters.len(),
        rows = batches.iter().map(|b| b.num_rows()).sum::<usize>(),
        "scanned table"
    );
    Ok((schema, batches))
}

fn build_predicate(
    builder: &ParquetRecordBatchReaderBuilder<File>,
    filter: &Filter,
) -> Result<Box<dyn ArrowPredicate>> {
    let schema = builder.schema();
    let (index, field) = schema
        .column_with_name(&filter.column)
        .ok_or_else(|| Error::ColumnNotFound(filter.column.clone()))?;

    let operand = filter.value.to_array();
    if field.data_type() != operand.data_type() {
        return Err(Error::TypeMismatch {
            column: filter.column.clone(),
            requested: operand.data_type().clone(),
            stored: field.data_type().clone(),
        });
    }

    let mask = ProjectionMask::roots(builder.parquet_schema(), [index]);
    let op = filter.op;
    let predicate = ArrowPredicateFn::new(mask, move |batch: RecordBatch| {
        let rhs = Scalar::new(operand.clone());
        compare(op, batch.column(0), &rhs)
    });
    Ok(Box::new(predicate))
}

fn compare(
    op: FilterOp,
    lhs: &ArrayRef,
    rhs: &Scalar<ArrayRef>,
) -> std::result::Result<BooleanArray, ArrowError> {
    match op {
        FilterOp::Eq => cmp::eq(lhs, rhs),
        FilterOp::Ne => cmp::neq(lhs, rhs),
        FilterOp::Lt => cmp::lt(lhs, rhs),
        FilterOp::Le => cmp::lt_eq(lhs, rhs),
        FilterOp::Gt => cmp::gt(lhs, rhs),
        FilterOp::Ge => cmp::gt_eq(lhs, rhs),
    }
}

fn resolve_columns(schema: &SchemaRef, names: &[String]) -> Result<Vec<usize>> {
    names
        .iter()
        .map(|name| {
            schema
                .column_with_name(name)
                .map(|(index, _)| index)
                .ok_or_else(|| Error::ColumnNotFound(name.clone()))
        })
        .collect()
}

/// Staging writer: accumulates one array per column, then writes the whole
/// table in a single finalize step.
///
/// All columns for one write are emitted before the file exists on disk;
/// partial writes are never visible to readers.
pub(crate) struct ColumnSink {
    fields: Vec<Field>,
    arrays: Vec<ArrayRef>,
}

impl ColumnSink {
    pub(crate) fn with_capacity(columns: usize) -> Self {
        Self {
            fields: Vec::with_capacity(columns),
            arrays: Vec::with_capacity(columns),
        }
    }

    /// Stage one column. Registration order is preserved in the file.
    pub(crate) fn stage(&mut self, name: &str, array: ArrayRef) {
        self.fields
            .push(Field::new(name, array.data_type().clone(), false));
        self.arrays.push(array);
    }

    /// Build the schema and batch, then encode and finalize the file.
    pub(crate) fn finish(self, path: &Path, config: &WriterConfig) -> Result<()> {
        let schema = Arc::new(Schema::new(self.fields));
        let batch = RecordBatch::try_new(Arc::clone(&schema), self.arrays)?;

        let props = WriterProperties::builder()
            .set_compression(config.compression)
            .set_max_row_group_size(config.max_row_group_size)
            .build();

        let file = File::create(path)?;
        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        debug!(
            path = %path.display(),
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "finalized table file"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Filter, FilterOp};
    use crate::types::ScalarValue;
    use arrow::array::Int64Array;

    fn write_sample(path: &Path) {
        let mut sink = ColumnSink::with_capacity(1);
        sink.stage("id", Arc::new(Int64Array::from(vec![1i64, 2, 3, 4, 5])));
        sink.finish(path, &WriterConfig::default()).unwrap();
    }

    #[test]
    fn sink_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.parquet");
        write_sample(&path);

        let (schema, batches) = read_table(&path, None).unwrap();
        assert_eq!(schema.fields().len(), 1);
        assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 5);
    }

    #[test]
    fn missing_projection_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.parquet");
        write_sample(&path);

        let err = read_table(&path, Some(&["nope".to_string()])).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(name) if name == "nope"));
    }

    #[test]
    fn filter_type_mismatch_detected_before_scan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.parquet");
        write_sample(&path);

        let filter = Filter {
            column: "id".to_string(),
            op: FilterOp::Gt,
            value: ScalarValue::Float64(1.0),
        };
        let err = scan(&path, None, &[filter], None).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { column, .. } if column == "id"));
    }

    #[test]
    fn pushdown_filters_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.parquet");
        write_sample(&path);

        let filter = Filter {
            column: "id".to_string(),
            op: FilterOp::Gt,
            value: ScalarValue::Int64(3),
        };
        let (_, batches) = scan(&path, None, &[filter], None).unwrap();
        assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 2);
    }
}
