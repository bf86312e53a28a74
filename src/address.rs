//! A1-notation cell and range reads over the position-preserving grid.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    sheet::Grid,
};

/// Zero-based grid coordinates decoded from an A1 reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

/// A rectangular window of the grid with display labels per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn reference_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z]+)(\d+)$").expect("A1 reference pattern"))
}

/// Decodes an A1 reference (`B6`, `AA1`) into zero-based coordinates.
/// Anything that is not strictly letters-then-digits is `None`.
pub fn resolve_address(reference: &str) -> Option<CellAddress> {
    let captures = reference_shape().captures(reference.trim())?;
    let col = column_index(&captures[1])?;
    let row: usize = captures[2].parse().ok()?;
    if row == 0 {
        return None;
    }
    Some(CellAddress {
        row: row - 1,
        col: col - 1,
    })
}

/// Column letters as a bijective base-26 numeral: `A` = 1, `Z` = 26,
/// `AA` = 27. Returns the 1-based column number, or `None` when the letter
/// run is long enough to overflow, which makes the reference invalid like
/// any other malformed input.
fn column_index(letters: &str) -> Option<usize> {
    letters.chars().try_fold(0usize, |acc, ch| {
        acc.checked_mul(26)?
            .checked_add(ch.to_ascii_uppercase() as usize - 'A' as usize + 1)
    })
}

/// Inverse of the column decoding: 0-based index to letters (`0` → `A`,
/// `26` → `AA`), used to label unheadered range columns.
pub fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut name = String::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        name.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    name
}

/// Looks up each reference in the grid, yielding pairs in request order.
/// Invalid references map to `None`; valid but out-of-bounds references
/// map to an empty string. A bad reference never fails the whole batch.
pub fn read_cells(grid: &Grid, references: &[String]) -> Vec<(String, Option<String>)> {
    references
        .iter()
        .map(|reference| {
            let value = resolve_address(reference)
                .map(|addr| grid.cell(addr.row, addr.col).to_string());
            (reference.trim().to_string(), value)
        })
        .collect()
}

/// Reads the rectangle spanned by two corner references, normalizing swapped
/// corners. Column labels come from `header_row` (1-based) when configured
/// and non-blank there, otherwise from the generated column name.
pub fn read_range(
    grid: &Grid,
    start: &str,
    end: &str,
    header_row: Option<usize>,
) -> Result<RangeData, Error> {
    let start_addr =
        resolve_address(start).ok_or_else(|| Error::Address(start.to_string()))?;
    let end_addr = resolve_address(end).ok_or_else(|| Error::Address(end.to_string()))?;

    let row_first = start_addr.row.min(end_addr.row);
    let row_last = start_addr.row.max(end_addr.row);
    let col_first = start_addr.col.min(end_addr.col);
    let col_last = start_addr.col.max(end_addr.col);

    let header_cells = header_row
        .and_then(|row| row.checked_sub(1))
        .and_then(|idx| grid.row(idx));

    let mut headers = Vec::with_capacity(col_last - col_first + 1);
    for col in col_first..=col_last {
        let label = header_cells
            .and_then(|cells| cells.get(col))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());
        headers.push(label.map_or_else(|| column_name(col), str::to_string));
    }

    let mut rows = Vec::with_capacity(row_last - row_first + 1);
    for row in row_first..=row_last {
        let mut line = Vec::with_capacity(col_last - col_first + 1);
        for col in col_first..=col_last {
            line.push(grid.cell(row, col).to_string());
        }
        rows.push(line);
    }

    Ok(RangeData { headers, rows })
}
