//! Category/value column resolution.
//!
//! With no schema to consult, the resolver decides which column carries
//! category labels and which carries values from per-column cell counts,
//! unless an explicit hint (column name or 1-based position) settles a slot
//! first. Resolution is a pure function of the parsed table and the hints,
//! so resolving twice always yields the same selection.

use log::warn;

use crate::{numeric::is_numeric, sheet::RawTable};

/// Non-empty and numeric cell counts for one column, recomputed per fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnStats {
    pub total: usize,
    pub numeric: usize,
}

impl ColumnStats {
    /// Share of non-empty cells that parse as numbers. An all-empty column
    /// counts as fraction zero rather than dividing by zero.
    pub fn numeric_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.numeric as f64 / self.total as f64
        }
    }
}

/// Resolved column indices. `category` always resolves; `value` staying
/// `None` switches aggregation over to count-by-category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSelection {
    pub category: usize,
    pub value: Option<usize>,
}

/// Counts non-empty and numeric cells for every header over all rows.
pub fn column_stats(table: &RawTable) -> Vec<ColumnStats> {
    let mut stats = vec![ColumnStats::default(); table.headers.len()];
    for row in &table.rows {
        for (idx, slot) in stats.iter_mut().enumerate() {
            let cell = row.get(idx).map(String::as_str).unwrap_or("");
            if cell.trim().is_empty() {
                continue;
            }
            slot.total += 1;
            if is_numeric(cell) {
                slot.numeric += 1;
            }
        }
    }
    stats
}

/// Resolves a column hint against the header list: an integer in
/// `[1, header_count]` selects by position, anything else matches a header
/// label case-insensitively. An unmatched hint is treated as absent.
pub fn resolve_hint(headers: &[String], hint: &str) -> Option<usize> {
    let hint = hint.trim();
    if hint.is_empty() {
        return None;
    }
    if let Ok(position) = hint.parse::<usize>()
        && (1..=headers.len()).contains(&position)
    {
        return Some(position - 1);
    }
    headers.iter().position(|h| h.eq_ignore_ascii_case(hint))
}

/// Picks the category and value columns, preferring hints over the
/// numeric-predominance heuristic. Ties break toward the first header in
/// source order.
pub fn resolve(
    table: &RawTable,
    category_hint: Option<&str>,
    value_hint: Option<&str>,
) -> ColumnSelection {
    if table.headers.is_empty() {
        return ColumnSelection {
            category: 0,
            value: None,
        };
    }

    let stats = column_stats(table);

    let category = category_hint
        .and_then(|hint| resolve_hint(&table.headers, hint))
        .unwrap_or_else(|| {
            stats
                .iter()
                .position(|s| s.numeric_fraction() < 0.5)
                .unwrap_or(0)
        });

    let value = match value_hint {
        Some(hint) => resolve_hint(&table.headers, hint).or_else(|| {
            warn!("value column hint '{hint}' did not match any header, using the heuristic");
            pick_value_column(&stats, category)
        }),
        None => pick_value_column(&stats, category),
    };

    ColumnSelection { category, value }
}

/// The value column is the non-category column with the most numeric cells,
/// provided at least one numeric cell exists. A strict `>` keeps the first
/// candidate on ties.
fn pick_value_column(stats: &[ColumnStats], category: usize) -> Option<usize> {
    if stats.len() < 2 {
        return None;
    }
    let mut best: Option<(usize, usize)> = None;
    for (idx, stat) in stats.iter().enumerate() {
        if idx == category {
            continue;
        }
        if best.is_none_or(|(_, count)| stat.numeric > count) {
            best = Some((idx, stat.numeric));
        }
    }
    best.and_then(|(idx, count)| (count > 0).then_some(idx))
}
