//! Process-lifetime configuration, read once from the environment.
//!
//! Variable names follow the deployment convention of the dashboards this
//! feeds: `SHEET_CSV_URL` (or the `SHEET_ID`/`SHEET_GID` pair),
//! `SHEET_HEADER_ROW`, `SHEET_CATEGORY_COLUMN`, `SHEET_VALUE_COLUMN`,
//! `SHEET_SUM_COLUMNS`, and `CACHE_TTL_SECONDS`. Blank values count as
//! unset; a malformed TTL falls back to the default.

use std::env;

use log::warn;

use crate::series::SumColumns;

pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    pub csv_url: Option<String>,
    pub sheet_id: Option<String>,
    pub sheet_gid: Option<String>,
    /// 1-based line to substitute as the header line.
    pub header_row: Option<usize>,
    pub category_column: Option<String>,
    pub value_column: Option<String>,
    pub sum_columns: Option<SumColumns>,
    pub cache_ttl_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            csv_url: None,
            sheet_id: None,
            sheet_gid: None,
            header_row: None,
            category_column: None,
            value_column: None,
            sum_columns: None,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            csv_url: env_string("SHEET_CSV_URL"),
            sheet_id: env_string("SHEET_ID"),
            sheet_gid: env_string("SHEET_GID"),
            header_row: env_string("SHEET_HEADER_ROW").and_then(|raw| parse_header_row(&raw)),
            category_column: env_string("SHEET_CATEGORY_COLUMN"),
            value_column: env_string("SHEET_VALUE_COLUMN"),
            sum_columns: env_string("SHEET_SUM_COLUMNS")
                .as_deref()
                .and_then(SumColumns::parse),
            cache_ttl_seconds: env_string("CACHE_TTL_SECONDS")
                .and_then(|raw| match raw.parse::<u64>() {
                    Ok(ttl) => Some(ttl),
                    Err(_) => {
                        warn!("ignoring malformed CACHE_TTL_SECONDS '{raw}'");
                        None
                    }
                })
                .unwrap_or(DEFAULT_CACHE_TTL_SECONDS),
        }
    }

    /// The upstream URL: explicit `csv_url` first, then the published-sheet
    /// pair. `None` means no upstream is configured at all.
    pub fn resolved_url(&self) -> Option<String> {
        if let Some(url) = &self.csv_url {
            return Some(url.clone());
        }
        match (&self.sheet_id, &self.sheet_gid) {
            (Some(id), Some(gid)) => Some(crate::source::published_csv_url(id, gid)),
            _ => None,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_header_row(raw: &str) -> Option<usize> {
    match raw.parse::<usize>() {
        Ok(row) if row >= 1 => Some(row),
        _ => {
            warn!("ignoring malformed SHEET_HEADER_ROW '{raw}'");
            None
        }
    }
}
