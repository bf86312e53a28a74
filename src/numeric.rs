//! Locale-aware numeric cell parsing.
//!
//! Published sheets mix European number formatting (`1.234,56`) with literal
//! date and time cells in neighboring columns. Naive coercion would read
//! `"14:30"` as a number, so the shape checks run before any cleanup and
//! their order matters: empty check, time shape, date shape, then the
//! thousands/decimal normalization.

use std::sync::OnceLock;

use regex::Regex;

fn time_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}:\d{2}(:\d{2})?$").expect("time shape pattern"))
}

fn date_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d[/-]\d").expect("date shape pattern"))
}

/// Parses a raw cell into a finite `f64`, or `None` when the cell is empty,
/// date/time-shaped, or not numeric under the dot-thousands/comma-decimal
/// convention. Percent signs and internal whitespace are ignored.
pub fn to_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if time_shape().is_match(trimmed) {
        return None;
    }
    if date_shape().is_match(trimmed) {
        return None;
    }
    let cleaned = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '%')
        .collect::<String>()
        .replace('.', "")
        .replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    value.is_finite().then_some(value)
}

/// True when the cell holds something [`to_number`] accepts.
pub fn is_numeric(raw: &str) -> bool {
    to_number(raw).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_time_shaped_cells() {
        assert_eq!(to_number("14:30"), None);
        assert_eq!(to_number("9:05:59"), None);
        assert_eq!(to_number(" 09:00 "), None);
    }

    #[test]
    fn rejects_date_shaped_cells() {
        assert_eq!(to_number("06/05/2024"), None);
        assert_eq!(to_number("2024-05-06"), None);
        assert_eq!(to_number("1-2"), None);
    }

    #[test]
    fn normalizes_thousands_and_decimal_comma() {
        assert_eq!(to_number("1.234,56"), Some(1234.56));
        assert_eq!(to_number("12,5%"), Some(12.5));
        assert_eq!(to_number(" 1 234 "), Some(1234.0));
    }
}
