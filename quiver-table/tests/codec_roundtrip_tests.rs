//! Write-then-read round-trip tests across every cell type.

use std::sync::LazyLock;

use quiver_table::{field, FieldCodec, Record, Table, TableWriter, TimestampMs};
use tempfile::TempDir;

#[derive(Debug, Default, Clone, PartialEq)]
struct Everything {
    small: i32,
    big: i64,
    count: u64,
    ratio: f32,
    score: f64,
    note: String,
    active: bool,
    seen_at: TimestampMs,
}

static EVERYTHING_CODEC: LazyLock<FieldCodec<Everything>> = LazyLock::new(|| {
    FieldCodec::new()
        .with_field("small", field!(Everything, small))
        .with_field("big", field!(Everything, big))
        .with_field("count", field!(Everything, count))
        .with_field("ratio", field!(Everything, ratio))
        .with_field("score", field!(Everything, score))
        .with_field("note", field!(Everything, note))
        .with_field("active", field!(Everything, active))
        .with_field("seen_at", field!(Everything, seen_at))
});

impl Record for Everything {
    fn codec() -> &'static FieldCodec<Self> {
        &EVERYTHING_CODEC
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct JustScores {
    big: i64,
    score: f64,
}

static JUST_SCORES_CODEC: LazyLock<FieldCodec<JustScores>> = LazyLock::new(|| {
    FieldCodec::new()
        .with_field("big", field!(JustScores, big))
        .with_field("score", field!(JustScores, score))
});

impl Record for JustScores {
    fn codec() -> &'static FieldCodec<Self> {
        &JUST_SCORES_CODEC
    }
}

fn sample_rows() -> Vec<Everything> {
    vec![
        Everything {
            small: -7,
            big: i64::MAX,
            count: u64::MAX,
            ratio: 0.25,
            score: 0.1 + 0.2,
            note: "plain".to_string(),
            active: true,
            seen_at: TimestampMs(1_700_000_000_000),
        },
        Everything {
            small: 0,
            big: i64::MIN,
            count: 0,
            ratio: -1.5e-8,
            score: f64::MIN_POSITIVE,
            note: String::new(),
            active: false,
            seen_at: TimestampMs(0),
        },
        Everything {
            small: 42,
            big: -1,
            count: 1,
            ratio: 3.25,
            score: -85.5,
            note: "héllo 世界 🌊".to_string(),
            active: true,
            seen_at: TimestampMs(-86_400_000),
        },
    ]
}

#[test]
fn all_cell_types_roundtrip_exactly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("everything.parquet");

    let rows = sample_rows();
    let mut writer = TableWriter::new(&path);
    writer.append_many(rows.clone());
    writer.finish().unwrap();

    let table = Table::open(&path).unwrap();
    let decoded: Vec<Everything> = table.read_all_as().unwrap();
    assert_eq!(decoded, rows);
}

#[test]
fn text_roundtrip_preserves_empty_and_multibyte() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("everything.parquet");

    let mut writer = TableWriter::new(&path);
    writer.append_many(sample_rows());
    writer.finish().unwrap();

    let table = Table::open(&path).unwrap();
    let notes = table.get_string_column("note").unwrap();
    assert_eq!(notes, vec!["plain", "", "héllo 世界 🌊"]);
}

#[test]
fn partial_codec_reads_subset_of_columns() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("everything.parquet");

    let rows = sample_rows();
    let mut writer = TableWriter::new(&path);
    writer.append_many(rows.clone());
    writer.finish().unwrap();

    // A different record type whose codec names only two of the columns.
    let table = Table::open(&path).unwrap();
    let decoded: Vec<JustScores> = table.read_all_as().unwrap();
    let expected: Vec<JustScores> = rows
        .iter()
        .map(|r| JustScores {
            big: r.big,
            score: r.score,
        })
        .collect();
    assert_eq!(decoded, expected);
}

#[test]
fn timestamps_roundtrip_as_millis() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("everything.parquet");

    let rows = sample_rows();
    let mut writer = TableWriter::new(&path);
    writer.append_many(rows.clone());
    writer.finish().unwrap();

    let table = Table::open(&path).unwrap();
    let millis: Vec<i64> = table
        .get_datetime_column("seen_at")
        .unwrap()
        .iter()
        .copied()
        .collect();
    let expected: Vec<i64> = rows.iter().map(|r| r.seen_at.millis()).collect();
    assert_eq!(millis, expected);
}
