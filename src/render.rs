//! Elastic ASCII table output for the CLI.

use std::fmt::Write as _;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count().max(1))
        .collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_row(&mut output, headers, &widths);
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    push_row(&mut output, &rule, &widths);
    for row in rows {
        push_row(&mut output, row, &widths);
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (idx, width) in widths.iter().enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let cell = cells
            .get(idx)
            .map(|c| sanitize(c))
            .unwrap_or_default();
        let pad = width.saturating_sub(cell.chars().count());
        line.push_str(&cell);
        line.push_str(&" ".repeat(pad));
    }
    let _ = writeln!(output, "{}", line.trim_end());
}

// Control characters would break column alignment.
fn sanitize(cell: &str) -> String {
    cell.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

/// Formats a series value without a trailing `.0` for whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
