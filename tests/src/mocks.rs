//! Mock store wrappers for failure-path tests.

use async_trait::async_trait;
use chrono::NaiveDate;

use scan_core::{
    DailyStats, Error, HourlyStats, LanguageStats, PeriodType, RegionalStats, Result, WineRanking,
};
use scan_store::{AggregateStore, MemoryStore};

/// Delegates to a real `MemoryStore` but fails every regional upsert,
/// for exercising per-facet failure isolation through the API.
pub struct RegionalFailStore {
    inner: MemoryStore,
}

impl RegionalFailStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AggregateStore for RegionalFailStore {
    async fn upsert_daily(&self, record: &DailyStats) -> Result<()> {
        self.inner.upsert_daily(record).await
    }

    async fn upsert_regional(&self, _record: &RegionalStats) -> Result<()> {
        Err(Error::store("regional collection unavailable"))
    }

    async fn upsert_language(&self, record: &LanguageStats) -> Result<()> {
        self.inner.upsert_language(record).await
    }

    async fn upsert_hourly(&self, record: &HourlyStats) -> Result<()> {
        self.inner.upsert_hourly(record).await
    }

    async fn upsert_ranking(&self, record: &WineRanking) -> Result<()> {
        self.inner.upsert_ranking(record).await
    }

    async fn list_daily(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyStats>> {
        self.inner.list_daily(winery_id, wine_id, start, end).await
    }

    async fn list_regional(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RegionalStats>> {
        self.inner.list_regional(winery_id, wine_id, start, end).await
    }

    async fn list_language(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LanguageStats>> {
        self.inner.list_language(winery_id, wine_id, start, end).await
    }

    async fn list_hourly(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HourlyStats>> {
        self.inner.list_hourly(winery_id, wine_id, start, end).await
    }

    async fn latest_ranking(
        &self,
        winery_id: &str,
        period_type: PeriodType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<WineRanking>> {
        self.inner
            .latest_ranking(winery_id, period_type, start, end)
            .await
    }
}
