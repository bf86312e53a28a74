//! The two parses of a fetched CSV body.
//!
//! The same text is read two ways for two different consumers:
//!
//! - [`RawTable`]: header-keyed records for column resolution and
//!   aggregation, via the `csv` crate with an optional header-row override.
//! - [`Grid`]: a position-preserving parse for A1 addressing, where every
//!   line (blank lines included) stays at its original row index. The `csv`
//!   crate cannot produce this shape because it drops empty lines, so the
//!   grid uses its own quote-aware line scanner.

use crate::error::Error;

/// Header labels plus data rows. Row width may differ from header width;
/// missing cells read as empty strings through [`RawTable::cell`].
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parses the body into header-keyed records.
///
/// `header_row` is a 1-based line index: that line becomes the header line
/// and everything before it is discarded. `None` (or row 1) reads the body
/// as-is.
pub fn parse_records(body: &str, header_row: Option<usize>) -> Result<RawTable, Error> {
    let body = apply_header_row(body, header_row);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .double_quote(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

fn apply_header_row(body: &str, header_row: Option<usize>) -> std::borrow::Cow<'_, str> {
    match header_row {
        Some(row) if row > 1 => {
            let lines = body.split('\n').skip(row - 1).collect::<Vec<_>>();
            std::borrow::Cow::Owned(lines.join("\n"))
        }
        _ => std::borrow::Cow::Borrowed(body),
    }
}

/// Position-preserving parse of the full CSV body.
///
/// Every physical line is a row, blank lines included, so coordinate
/// arithmetic over the grid matches what the sheet shows.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn parse(body: &str) -> Self {
        let rows = body
            .split('\n')
            .map(|line| split_line(line.strip_suffix('\r').unwrap_or(line)))
            .collect();
        Grid { rows }
    }

    /// Out-of-bounds coordinates read as the empty string.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Splits one physical line on commas, honoring double-quoted fields and
/// doubled-quote escapes.
fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                other => current.push(other),
            }
        } else {
            match ch {
                ',' => cells.push(std::mem::take(&mut current)),
                '"' => in_quotes = true,
                other => current.push(other),
            }
        }
    }
    cells.push(current);
    cells
}
