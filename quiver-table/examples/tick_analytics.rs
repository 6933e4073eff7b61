//! Demonstration of the typed record round-trip and zero-copy analytics.
//!
//! Writes a small tick table, queries it back with projection + filter
//! pushdown, then sums a column through the chunked accessor without copying.

use std::sync::LazyLock;

use quiver_table::{
    field, FieldCodec, FilterOp, Query, Record, Table, TableWriter, TimestampMs, WriterConfig,
};

#[derive(Debug, Default, Clone)]
struct Tick {
    seq: i64,
    symbol: String,
    price: f64,
    volume: u64,
    at: TimestampMs,
}

static TICK_CODEC: LazyLock<FieldCodec<Tick>> = LazyLock::new(|| {
    FieldCodec::new()
        .with_field("seq", field!(Tick, seq))
        .with_field("symbol", field!(Tick, symbol))
        .with_field("price", field!(Tick, price))
        .with_field("volume", field!(Tick, volume))
        .with_field("at", field!(Tick, at))
});

impl Record for Tick {
    fn codec() -> &'static FieldCodec<Self> {
        &TICK_CODEC
    }
}

fn main() -> quiver_result::Result<()> {
    let dir = std::env::temp_dir().join("quiver_tick_demo");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("ticks.parquet");

    println!("=== Quiver Tick Demo ===\n");

    // Write 10k ticks with small row groups so the read side sees real chunks.
    let config = WriterConfig::snappy().with_max_row_group_size(2048);
    let mut writer = TableWriter::with_config(&path, config);
    writer.append_many((0..10_000).map(|i| Tick {
        seq: i,
        symbol: if i % 2 == 0 { "QQQ" } else { "SPY" }.to_string(),
        price: 100.0 + (i % 500) as f64 * 0.01,
        volume: (i as u64 % 97) + 1,
        at: TimestampMs(1_700_000_000_000 + i * 1_000),
    }));
    writer.finish()?;
    println!("wrote {} rows to {}", 10_000, path.display());

    // Typed query: projection + predicate pushdown, one engine scan.
    let spiky: Vec<Tick> = Query::new(&path)
        .select(field!(Tick, seq))?
        .select(field!(Tick, price))?
        .filter(field!(Tick, price), FilterOp::Gt, 104.5)?
        .collect()?;
    println!("{} ticks priced above 104.5", spiky.len());

    // Zero-copy analytics: iterate the chunked accessor directly.
    let table = Table::open(&path)?;
    let prices = table.get_column::<f64>("price")?;
    println!(
        "price column arrives in {} chunk(s) for {} rows",
        prices.num_chunks(),
        prices.len()
    );
    let mean: f64 = prices.iter().sum::<f64>() / prices.len() as f64;
    println!("mean price {mean:.4}");

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
