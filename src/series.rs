//! Aggregation of a parsed table into the category/value series.

use serde::{Deserialize, Serialize};

use crate::{numeric::to_number, resolve::ColumnSelection, sheet::RawTable};

/// One point of the normalized output series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub category: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        SeriesPoint {
            category: category.into(),
            value,
        }
    }
}

/// Target columns for non-empty-count aggregation. `All` means every header
/// except the first, which is assumed to label the rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SumColumns {
    All,
    Columns(Vec<String>),
}

impl SumColumns {
    /// Parses the configured value: the `ALL` sentinel (any case) or a
    /// comma-separated column list.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.eq_ignore_ascii_case("all") {
            return Some(SumColumns::All);
        }
        let columns = raw
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        (!columns.is_empty()).then_some(SumColumns::Columns(columns))
    }
}

/// Produces the output series under one of three modes.
///
/// A configured `sum_columns` always wins; otherwise a resolved value column
/// selects direct mapping, and its absence selects count-by-category. An
/// empty table yields an empty series in every mode.
pub fn aggregate(
    table: &RawTable,
    selection: &ColumnSelection,
    sum_columns: Option<&SumColumns>,
) -> Vec<SeriesPoint> {
    match (sum_columns, selection.value) {
        (Some(targets), _) => sum_column_series(table, targets),
        (None, Some(value)) => direct_series(table, selection.category, value),
        (None, None) => count_by_category(table, selection.category),
    }
}

/// One point per target column counting rows with a non-empty cell there.
/// Unmatched requested names are dropped; requested order is kept.
fn sum_column_series(table: &RawTable, targets: &SumColumns) -> Vec<SeriesPoint> {
    let indices: Vec<usize> = match targets {
        SumColumns::All => (1..table.headers.len()).collect(),
        SumColumns::Columns(names) => names
            .iter()
            .filter_map(|name| {
                table
                    .headers
                    .iter()
                    .position(|h| h.eq_ignore_ascii_case(name))
            })
            .collect(),
    };

    indices
        .into_iter()
        .map(|idx| {
            let filled = table
                .rows
                .iter()
                .filter(|row| {
                    row.get(idx)
                        .is_some_and(|cell| !cell.trim().is_empty())
                })
                .count();
            SeriesPoint::new(table.headers[idx].clone(), filled as f64)
        })
        .collect()
}

/// One point per record in source order; unparseable values map to zero
/// rather than dropping the row.
fn direct_series(table: &RawTable, category: usize, value: usize) -> Vec<SeriesPoint> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx, _)| {
            let label = table.cell(row_idx, category).to_string();
            let number = to_number(table.cell(row_idx, value)).unwrap_or(0.0);
            SeriesPoint::new(label, number)
        })
        .collect()
}

/// Groups records by trimmed category cell, first-seen order, skipping rows
/// whose category trims to empty.
fn count_by_category(table: &RawTable, category: usize) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = Vec::new();
    for row_idx in 0..table.rows.len() {
        let label = table.cell(row_idx, category).trim();
        if label.is_empty() {
            continue;
        }
        match points.iter_mut().find(|p| p.category == label) {
            Some(point) => point.value += 1.0,
            None => points.push(SeriesPoint::new(label, 1.0)),
        }
    }
    points
}

/// Series served when no sheet is configured or a refresh fails.
pub fn fallback_series() -> Vec<SeriesPoint> {
    [
        ("A", 12.0),
        ("B", 19.0),
        ("C", 3.0),
        ("D", 5.0),
        ("E", 2.0),
        ("F", 3.0),
    ]
    .into_iter()
    .map(|(category, value)| SeriesPoint::new(category, value))
    .collect()
}
