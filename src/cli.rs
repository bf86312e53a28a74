use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Read published-sheet CSV exports as series, cells, or ranges",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the normalized category/value series
    Series(SeriesArgs),
    /// Look up individual cells by A1 reference
    Cells(CellsArgs),
    /// Read a rectangular range between two corner references
    Range(RangeArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Full CSV export URL (overrides SHEET_CSV_URL)
    #[arg(long)]
    pub url: Option<String>,
    /// Local CSV file to read instead of fetching
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// 1-based row to treat as the column-header row
    #[arg(long = "header-row")]
    pub header_row: Option<usize>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Category column hint (name or 1-based index)
    #[arg(long = "category-column")]
    pub category_column: Option<String>,
    /// Value column hint (name or 1-based index)
    #[arg(long = "value-column")]
    pub value_column: Option<String>,
    /// Columns to count non-empty cells for (comma-separated, or ALL)
    #[arg(long = "sum-columns")]
    pub sum_columns: Option<String>,
    /// Series cache TTL in seconds
    #[arg(long = "cache-ttl")]
    pub cache_ttl: Option<u64>,
}

#[derive(Debug, Args)]
pub struct CellsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// A1 references, comma-separated (e.g. B6,B7)
    #[arg(value_delimiter = ',', required = true)]
    pub cells: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RangeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Top-left corner of the range
    #[arg(long, default_value = "C7")]
    pub start: String,
    /// Bottom-right corner of the range
    #[arg(long, default_value = "D11")]
    pub end: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
