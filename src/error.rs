use thiserror::Error;

/// Failures that can cross the library boundary.
///
/// Cell and range lookups surface these directly; series normalization
/// swallows them and serves the fallback series instead (see
/// [`crate::cache::SeriesCache`]). A malformed A1 reference is never an
/// `Error`: it degrades to an absent result for just that reference.
#[derive(Debug, Error)]
pub enum Error {
    /// The upstream fetch failed or returned a non-success status.
    #[error("upstream fetch failed: {0}")]
    Transport(String),
    /// The fetched body could not be parsed as CSV.
    #[error("malformed CSV: {0}")]
    Parse(String),
    /// A range endpoint could not be resolved to a cell address.
    #[error("invalid cell reference '{0}'")]
    Address(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Transport(err.to_string())
    }
}
