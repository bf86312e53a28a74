//! Single-slot TTL cache for the normalized series.

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, warn};
use tokio::sync::Mutex;

use crate::{
    error::Error,
    series::{SeriesPoint, fallback_series},
};

/// The last produced series and when it was produced. A failed refresh
/// stores the fallback series here too, so the TTL window also throttles
/// retries against a broken upstream.
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<SeriesPoint>,
    fetched_at: DateTime<Utc>,
}

/// Time-boxed memo of the last series, constructed once and injected into
/// whatever serves requests.
///
/// The slot is an async mutex held across the refresh, so callers racing
/// past an expired TTL line up behind one in-flight fetch instead of each
/// hitting the upstream (single-flight).
#[derive(Debug)]
pub struct SeriesCache {
    slot: Mutex<Option<CacheEntry>>,
    ttl: TimeDelta,
}

impl SeriesCache {
    pub fn new(ttl_seconds: u64) -> Self {
        SeriesCache {
            slot: Mutex::new(None),
            ttl: TimeDelta::seconds(ttl_seconds.min(i64::MAX as u64) as i64),
        }
    }

    /// Returns the cached series while the TTL holds; otherwise runs
    /// `refresh` and stores its result. A refresh error is logged and
    /// replaced by the fallback series, which is cached like a success.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Vec<SeriesPoint>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<SeriesPoint>, Error>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(entry) = slot.as_ref()
            && Utc::now().signed_duration_since(entry.fetched_at) < self.ttl
        {
            debug!("series cache hit ({} point(s))", entry.data.len());
            return entry.data.clone();
        }

        let data = match refresh().await {
            Ok(series) => {
                debug!("series cache refreshed with {} point(s)", series.len());
                series
            }
            Err(err) => {
                warn!("series refresh failed, serving fallback: {err}");
                fallback_series()
            }
        };

        *slot = Some(CacheEntry {
            data: data.clone(),
            fetched_at: Utc::now(),
        });
        data
    }
}
