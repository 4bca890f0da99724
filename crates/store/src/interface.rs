//! Boundary traits between the aggregation engine and the document
//! store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use scan_core::{
    DailyStats, HourlyStats, LanguageStats, PeriodType, RegionalStats, Result, ScanEvent,
    WineRanking,
};

/// Time-bounded event query, optionally restricted to one winery.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Window start, inclusive.
    pub start: DateTime<Utc>,
    /// Window end, exclusive.
    pub end: DateTime<Utc>,
    pub winery_id: Option<String>,
}

impl EventFilter {
    /// Filter covering the UTC day boundaries of `date`.
    pub fn utc_day(date: NaiveDate, winery_id: Option<String>) -> Self {
        let start = date.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc();
        Self {
            start,
            end: start + chrono::Duration::days(1),
            winery_id,
        }
    }

    pub fn matches(&self, event: &ScanEvent) -> bool {
        if event.timestamp < self.start || event.timestamp >= self.end {
            return false;
        }
        match &self.winery_id {
            Some(winery_id) => &event.winery_id == winery_id,
            None => true,
        }
    }
}

/// Read interface over raw scan events.
///
/// Pagination is explicit: callers pass an offset and a page size and
/// loop until a short page comes back, so an arbitrarily large day can
/// be processed through bounded fetches.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list_events(
        &self,
        filter: &EventFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ScanEvent>>;
}

/// Read/write interface over the aggregate facet collections.
///
/// Upserts are keyed by each record's natural key and must be atomic:
/// re-running aggregation for the same day updates records in place, and
/// concurrent runs for the same key must not produce duplicate rows.
/// Range reads use inclusive date bounds; `wine_id = None` selects
/// winery-level records.
#[async_trait]
pub trait AggregateStore: Send + Sync {
    async fn upsert_daily(&self, record: &DailyStats) -> Result<()>;
    async fn upsert_regional(&self, record: &RegionalStats) -> Result<()>;
    async fn upsert_language(&self, record: &LanguageStats) -> Result<()>;
    async fn upsert_hourly(&self, record: &HourlyStats) -> Result<()>;
    async fn upsert_ranking(&self, record: &WineRanking) -> Result<()>;

    async fn list_daily(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyStats>>;

    async fn list_regional(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RegionalStats>>;

    async fn list_language(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LanguageStats>>;

    async fn list_hourly(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HourlyStats>>;

    /// Most recent ranking of the given period type within the range.
    async fn latest_ranking(
        &self,
        winery_id: &str,
        period_type: PeriodType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<WineRanking>>;
}
