//! Pluggable CSV text sources.
//!
//! The normalization pipeline only needs "the full CSV body or a transport
//! error", so the fetch is a small trait with an HTTP implementation for
//! published sheets and a file implementation for offline use and tests.

use std::path::PathBuf;

use log::debug;

use crate::error::Error;

/// CSV export URL of a published sheet tab.
pub fn published_csv_url(id: &str, gid: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/e/{id}/pub?gid={gid}&single=true&output=csv"
    )
}

/// Yields the full CSV body of the sheet, or fails with
/// [`Error::Transport`].
pub trait TextSource: Send + Sync {
    fn fetch_text(&self) -> impl Future<Output = Result<String, Error>> + Send;
}

/// Fetches the CSV export over HTTP. Non-2xx responses are transport
/// errors; a `cache-control: no-cache` header keeps intermediaries from
/// serving a stale export.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        HttpSource {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Builds the CSV export URL for a published sheet tab.
    pub fn for_published_sheet(id: &str, gid: &str) -> Self {
        Self::new(published_csv_url(id, gid))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TextSource for HttpSource {
    async fn fetch_text(&self) -> Result<String, Error> {
        debug!("fetching sheet CSV from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header("cache-control", "no-cache")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Reads the CSV body from a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl TextSource for FileSource {
    async fn fetch_text(&self) -> Result<String, Error> {
        debug!("reading sheet CSV from {}", self.path.display());
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

/// Source selected at runtime by the CLI.
#[derive(Debug, Clone)]
pub enum SheetSource {
    Http(HttpSource),
    File(FileSource),
}

impl TextSource for SheetSource {
    async fn fetch_text(&self) -> Result<String, Error> {
        match self {
            SheetSource::Http(source) => source.fetch_text().await,
            SheetSource::File(source) => source.fetch_text().await,
        }
    }
}
