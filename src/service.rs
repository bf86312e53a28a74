//! The facade consumed by whatever serves requests (an HTTP layer, the
//! bundled CLI, tests). Owns the source, the configuration, and the series
//! cache; constructed once per process.

use log::debug;

use crate::{
    address::{self, RangeData},
    cache::SeriesCache,
    config::Config,
    error::Error,
    resolve,
    series::{self, SeriesPoint, fallback_series},
    sheet::{self, Grid},
    source::TextSource,
};

pub struct SheetService<S> {
    source: Option<S>,
    config: Config,
    cache: SeriesCache,
}

impl<S: TextSource> SheetService<S> {
    /// `source` being `None` means no upstream is configured: the series
    /// endpoint then serves the fallback without attempting any fetch, and
    /// cell/range lookups fail with a transport error.
    pub fn new(source: Option<S>, config: Config) -> Self {
        let cache = SeriesCache::new(config.cache_ttl_seconds);
        SheetService {
            source,
            config,
            cache,
        }
    }

    /// The normalized category/value series, cached-or-fallback. Never
    /// fails: fetch and parse errors degrade to the fallback series.
    pub async fn series(&self) -> Vec<SeriesPoint> {
        let Some(source) = self.source.as_ref() else {
            debug!("no sheet source configured, serving fallback series");
            return fallback_series();
        };
        self.cache
            .get_or_refresh(|| async {
                let body = source.fetch_text().await?;
                self.normalize(&body)
            })
            .await
    }

    /// Looks up individual cells by A1 reference, answering in request
    /// order. Transport and parse errors propagate; malformed references
    /// come back as `None` without failing the batch. Not cached.
    pub async fn cells(
        &self,
        references: &[String],
    ) -> Result<Vec<(String, Option<String>)>, Error> {
        let grid = self.grid().await?;
        Ok(address::read_cells(&grid, references))
    }

    /// Reads a rectangular range between two corner references.
    pub async fn range(&self, start: &str, end: &str) -> Result<RangeData, Error> {
        let grid = self.grid().await?;
        address::read_range(&grid, start, end, self.config.header_row)
    }

    fn normalize(&self, body: &str) -> Result<Vec<SeriesPoint>, Error> {
        let table = sheet::parse_records(body, self.config.header_row)?;
        let selection = resolve::resolve(
            &table,
            self.config.category_column.as_deref(),
            self.config.value_column.as_deref(),
        );
        Ok(series::aggregate(
            &table,
            &selection,
            self.config.sum_columns.as_ref(),
        ))
    }

    async fn grid(&self) -> Result<Grid, Error> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| Error::Transport("no sheet source configured".to_string()))?;
        let body = source.fetch_text().await?;
        Ok(Grid::parse(&body))
    }
}
