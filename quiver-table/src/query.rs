use std::any::type_name;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use quiver_result::{Error, Result};

use crate::cell::Cell;
use crate::codec::Record;
use crate::engine;
use crate::field::FieldRef;
use crate::handle::Table;
use crate::types::ScalarValue;

/// Comparison operator for a pushed-down filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// One predicate: column, operator, typed operand.
#[derive(Debug, Clone)]
pub(crate) struct Filter {
    pub(crate) column: String,
    pub(crate) op: FilterOp,
    pub(crate) value: ScalarValue,
}

/// Builder for filtered, projected reads of one table.
///
/// Accumulates column selections and typed filter predicates, then executes
/// exactly once: [`collect`](Self::collect) and
/// [`collect_table`](Self::collect_table) consume the builder, so a collected
/// query cannot be re-run.
///
/// Field references are resolved against `R`'s codec when the selection or
/// filter is added — an unregistered field fails before any I/O occurs. The
/// operand of [`filter`](Self::filter) has the field's own type, so a
/// mistyped predicate does not compile.
///
/// ```no_run
/// # use quiver_table::{field, FieldCodec, FilterOp, Query, Record};
/// # #[derive(Debug, Default, Clone)]
/// # struct Tick { id: i64, price: f64 }
/// # static CODEC: std::sync::LazyLock<FieldCodec<Tick>> = std::sync::LazyLock::new(|| {
/// #     FieldCodec::new()
/// #         .with_field("id", field!(Tick, id))
/// #         .with_field("price", field!(Tick, price))
/// # });
/// # impl Record for Tick { fn codec() -> &'static FieldCodec<Self> { &CODEC } }
/// # fn main() -> quiver_result::Result<()> {
/// let expensive: Vec<Tick> = Query::new("ticks.parquet")
///     .select(field!(Tick, id))?
///     .filter(field!(Tick, price), FilterOp::Gt, 100.0)?
///     .collect()?;
/// # Ok(())
/// # }
/// ```
pub struct Query<R: Record> {
    path: PathBuf,
    select: Vec<String>,
    filters: Vec<Filter>,
    limit: Option<usize>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Query<R> {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            select: Vec::new(),
            filters: Vec::new(),
            limit: None,
            _record: PhantomData,
        }
    }

    /// Select one output column by field reference.
    ///
    /// An empty selection means all columns in codec order. Fails with
    /// [`Error::FieldNotRegistered`] if the field was never added to `R`'s
    /// codec.
    pub fn select<T: Cell>(mut self, field: FieldRef<R, T>) -> Result<Self> {
        let name = R::codec().find_column_name(field.identity())?.to_string();
        self.select.push(name);
        Ok(self)
    }

    /// Select output columns by raw name.
    ///
    /// Names are validated against the file schema at execution; a name must
    /// also be registered in the codec for [`collect`](Self::collect) to
    /// decode it.
    pub fn select_columns<S: AsRef<str>, I: IntoIterator<Item = S>>(mut self, names: I) -> Self {
        self.select
            .extend(names.into_iter().map(|n| n.as_ref().to_string()));
        self
    }

    /// Add a typed filter predicate on a registered field.
    ///
    /// The operand type is the field's registered type; predicates compose
    /// conjunctively and are evaluated inside the engine's scan.
    pub fn filter<T: Cell>(mut self, field: FieldRef<R, T>, op: FilterOp, value: T) -> Result<Self> {
        let column = R::codec().find_column_name(field.identity())?.to_string();
        self.filters.push(Filter {
            column,
            op,
            value: value.into_scalar(),
        });
        Ok(self)
    }

    /// Cap the number of rows materialized, applied after filtering.
    pub fn limit(mut self, rows: usize) -> Self {
        self.limit = Some(rows);
        self
    }

    /// Execute the query and return the resulting table handle.
    ///
    /// The engine-level scan fetches the union of the selected columns and
    /// every predicate's column (selected order first, filter-only columns
    /// appended): filter correctness requires the predicate column to be
    /// present in the scan even when the caller never asked to see it. With
    /// no predicates this degenerates to a plain (possibly projected) open.
    pub fn collect_table(self) -> Result<Table> {
        self.run()
    }

    /// Execute the query and decode the rows into records.
    ///
    /// Runs only the field readers for the selected columns against the
    /// collected table, in a single engine scan; unselected fields keep their
    /// type's default value.
    pub fn collect(self) -> Result<Vec<R>> {
        let codec = R::codec();
        let positions: Vec<usize> = if self.select.is_empty() {
            (0..codec.len()).collect()
        } else {
            self.select
                .iter()
                .map(|name| {
                    codec.column_position(name).ok_or_else(|| {
                        Error::FieldNotRegistered(format!(
                            "column '{}' in codec for {}",
                            name,
                            type_name::<R>()
                        ))
                    })
                })
                .collect::<Result<_>>()?
        };

        let table = self.run()?;
        codec.read_selected(&table, &positions)
    }

    fn run(&self) -> Result<Table> {
        let scan_columns = self.scan_columns();
        let projection = if self.select.is_empty() {
            None
        } else {
            Some(scan_columns.as_slice())
        };

        let (schema, batches) = if self.filters.is_empty() && self.limit.is_none() {
            engine::read_table(&self.path, projection)?
        } else {
            engine::scan(&self.path, projection, &self.filters, self.limit)?
        };
        Ok(Table::from_parts(schema, batches))
    }

    /// Selected columns plus any filter-only columns, selected order first.
    fn scan_columns(&self) -> Vec<String> {
        let mut columns = self.select.clone();
        for filter in &self.filters {
            if !columns.iter().any(|c| c == &filter.column) {
                columns.push(filter.column.clone());
            }
        }
        columns
    }
}
