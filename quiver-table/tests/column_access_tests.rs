//! Integration tests for table opening and zero-copy column access.

use std::sync::LazyLock;

use quiver_table::{field, Error, FieldCodec, Record, Table, TableWriter, WriterConfig};
use tempfile::TempDir;

#[derive(Debug, Default, Clone, PartialEq)]
struct Measurement {
    seq: i64,
    value: f64,
    label: String,
    valid: bool,
}

static MEASUREMENT_CODEC: LazyLock<FieldCodec<Measurement>> = LazyLock::new(|| {
    FieldCodec::new()
        .with_field("seq", field!(Measurement, seq))
        .with_field("value", field!(Measurement, value))
        .with_field("label", field!(Measurement, label))
        .with_field("valid", field!(Measurement, valid))
});

impl Record for Measurement {
    fn codec() -> &'static FieldCodec<Self> {
        &MEASUREMENT_CODEC
    }
}

fn measurement(seq: i64) -> Measurement {
    Measurement {
        seq,
        value: seq as f64 * 0.5,
        label: format!("row-{seq}"),
        valid: seq % 2 == 0,
    }
}

fn write_measurements(path: &std::path::Path, rows: i64, row_group_size: usize) {
    let config = WriterConfig::snappy().with_max_row_group_size(row_group_size);
    let mut writer = TableWriter::with_config(path, config);
    writer.append_many((0..rows).map(measurement));
    writer.finish().unwrap();
}

#[test]
fn counts_and_column_info() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.parquet");
    write_measurements(&path, 10, 1000);

    let table = Table::open(&path).unwrap();
    assert_eq!(table.num_rows(), 10);
    assert_eq!(table.num_cols(), 4);

    let names: Vec<String> = table.columns().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["seq", "value", "label", "valid"]);
}

#[test]
fn chunked_iteration_matches_flat_index() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.parquet");
    // Enough rows to span several chunks regardless of reader batch size.
    write_measurements(&path, 3000, 1000);

    let table = Table::open(&path).unwrap();
    let col = table.get_column::<i64>("seq").unwrap();
    assert_eq!(col.len(), 3000);
    assert!(col.num_chunks() > 1);

    let via_iter: Vec<i64> = col.iter().copied().collect();
    let via_index: Vec<i64> = (0..col.len()).map(|i| col[i]).collect();
    assert_eq!(via_iter, via_index);
    assert_eq!(via_iter, (0..3000).collect::<Vec<i64>>());
}

#[test]
fn bounds_checked_access() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.parquet");
    write_measurements(&path, 5, 1000);

    let table = Table::open(&path).unwrap();
    let col = table.get_column::<f64>("value").unwrap();
    assert_eq!(*col.at(4).unwrap(), col[4]);
    assert!(matches!(
        col.at(5),
        Err(Error::OutOfRange { index: 5, len: 5 })
    ));
}

#[test]
fn wrong_type_fails_without_invalidating_handle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.parquet");
    write_measurements(&path, 5, 1000);

    let table = Table::open(&path).unwrap();
    let err = table.get_column::<i32>("seq").unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { column, .. } if column == "seq"));

    // The failed fetch leaves the rest of the handle usable.
    let col = table.get_column::<i64>("seq").unwrap();
    assert_eq!(col.len(), 5);
}

#[test]
fn missing_column_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.parquet");
    write_measurements(&path, 5, 1000);

    let table = Table::open(&path).unwrap();
    let err = table.get_column::<i64>("nope").unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(name) if name == "nope"));
}

#[test]
fn string_and_bool_columns_allocate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.parquet");
    write_measurements(&path, 4, 1000);

    let table = Table::open(&path).unwrap();
    let labels = table.get_string_column("label").unwrap();
    assert_eq!(labels, vec!["row-0", "row-1", "row-2", "row-3"]);

    let valid = table.get_bool_column("valid").unwrap();
    assert_eq!(valid, vec![true, false, true, false]);
}

#[test]
fn rechunk_coalesces_chunks() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.parquet");
    write_measurements(&path, 3000, 1000);

    let mut table = Table::open(&path).unwrap();
    let before: Vec<i64> = table
        .get_column::<i64>("seq")
        .unwrap()
        .iter()
        .copied()
        .collect();
    assert!(table.get_column::<i64>("seq").unwrap().num_chunks() > 1);

    assert!(table.rechunk().unwrap());
    let col = table.get_column::<i64>("seq").unwrap();
    assert_eq!(col.num_chunks(), 1);
    let after: Vec<i64> = col.iter().copied().collect();
    assert_eq!(before, after);

    // Already coalesced: nothing further happens.
    assert!(!table.rechunk().unwrap());
}

#[test]
fn projected_open_reads_subset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.parquet");
    write_measurements(&path, 6, 1000);

    let table = Table::open_projected(&path, &["seq", "value"]).unwrap();
    assert_eq!(table.num_cols(), 2);
    assert_eq!(table.num_rows(), 6);
    assert!(matches!(
        table.get_string_column("label"),
        Err(Error::ColumnNotFound(_))
    ));
}

#[test]
fn opening_missing_path_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.parquet");

    assert!(matches!(Table::open(&path), Err(Error::Io(_))));
    assert!(matches!(
        Table::open_projected(&path, &["seq"]),
        Err(Error::Io(_))
    ));
}
