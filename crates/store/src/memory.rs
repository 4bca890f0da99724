//! In-memory document store.
//!
//! Collections of JSON documents keyed by natural key, mirroring the
//! query-by-filter / upsert-by-key semantics of the production document
//! store. One lock serializes all writes, so upserts to the same natural
//! key can never race into duplicate rows. Collections iterate in key
//! order, which makes re-aggregation output byte-identical.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use scan_core::{
    DailyStats, Error, HourlyStats, LanguageStats, PeriodType, RegionalStats, Result, ScanEvent,
    WineRanking,
};

use crate::config::CollectionConfig;
use crate::interface::{AggregateStore, EventFilter, EventStore};

struct Inner {
    events: Vec<ScanEvent>,
    collections: HashMap<String, BTreeMap<String, serde_json::Value>>,
}

/// In-memory store holding raw events and all aggregate collections.
#[derive(Clone)]
pub struct MemoryStore {
    config: CollectionConfig,
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates a store with the configured aggregate collections
    /// registered and empty.
    pub fn new(config: CollectionConfig) -> Self {
        let collections = config
            .aggregate_collections()
            .iter()
            .map(|name| (name.to_string(), BTreeMap::new()))
            .collect();

        Self {
            config,
            inner: Arc::new(Mutex::new(Inner {
                events: Vec::new(),
                collections,
            })),
        }
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Appends raw scan events (the label-page view handler is external
    /// to this engine; tests and local runs seed events through here).
    pub fn insert_events(&self, events: Vec<ScanEvent>) {
        let mut inner = self.inner.lock();
        debug!(count = events.len(), "Seeding scan events");
        inner.events.extend(events);
        inner.events.sort_by_key(|e| e.timestamp);
    }

    pub fn event_count(&self) -> usize {
        self.inner.lock().events.len()
    }

    /// Raw documents of one collection in key order. Used by tests to
    /// compare whole collections across runs.
    pub fn dump(&self, collection: &str) -> Result<Vec<(String, serde_json::Value)>> {
        let inner = self.inner.lock();
        let docs = inner
            .collections
            .get(collection)
            .ok_or_else(|| Error::UnknownCollection(collection.to_string()))?;
        Ok(docs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn upsert_doc<T: Serialize>(&self, collection: &str, key: String, record: &T) -> Result<()> {
        let value = serde_json::to_value(record)?;
        let mut inner = self.inner.lock();
        let docs = inner
            .collections
            .get_mut(collection)
            .ok_or_else(|| Error::UnknownCollection(collection.to_string()))?;
        docs.insert(key, value);
        Ok(())
    }

    fn collect_docs<T, F>(&self, collection: &str, keep: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let inner = self.inner.lock();
        let docs = inner
            .collections
            .get(collection)
            .ok_or_else(|| Error::UnknownCollection(collection.to_string()))?;

        let mut records = Vec::new();
        for value in docs.values() {
            let record: T = serde_json::from_value(value.clone())?;
            if keep(&record) {
                records.push(record);
            }
        }
        Ok(records)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(CollectionConfig::default())
    }
}

fn wine_matches(record_wine: Option<&str>, wanted: Option<&str>) -> bool {
    record_wine == wanted
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(
        &self,
        filter: &EventFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ScanEvent>> {
        let inner = self.inner.lock();
        Ok(inner
            .events
            .iter()
            .filter(|e| filter.matches(e))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AggregateStore for MemoryStore {
    async fn upsert_daily(&self, record: &DailyStats) -> Result<()> {
        self.upsert_doc(&self.config.daily_stats, record.natural_key(), record)
    }

    async fn upsert_regional(&self, record: &RegionalStats) -> Result<()> {
        self.upsert_doc(&self.config.regional_stats, record.natural_key(), record)
    }

    async fn upsert_language(&self, record: &LanguageStats) -> Result<()> {
        self.upsert_doc(&self.config.language_stats, record.natural_key(), record)
    }

    async fn upsert_hourly(&self, record: &HourlyStats) -> Result<()> {
        self.upsert_doc(&self.config.hourly_stats, record.natural_key(), record)
    }

    async fn upsert_ranking(&self, record: &WineRanking) -> Result<()> {
        self.upsert_doc(&self.config.wine_rankings, record.natural_key(), record)
    }

    async fn list_daily(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyStats>> {
        self.collect_docs(&self.config.daily_stats, |r: &DailyStats| {
            r.winery_id == winery_id
                && wine_matches(r.wine_id.as_deref(), wine_id)
                && r.date >= start
                && r.date <= end
        })
    }

    async fn list_regional(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RegionalStats>> {
        self.collect_docs(&self.config.regional_stats, |r: &RegionalStats| {
            r.winery_id == winery_id
                && wine_matches(r.wine_id.as_deref(), wine_id)
                && r.date >= start
                && r.date <= end
        })
    }

    async fn list_language(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LanguageStats>> {
        self.collect_docs(&self.config.language_stats, |r: &LanguageStats| {
            r.winery_id == winery_id
                && wine_matches(r.wine_id.as_deref(), wine_id)
                && r.date >= start
                && r.date <= end
        })
    }

    async fn list_hourly(
        &self,
        winery_id: &str,
        wine_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HourlyStats>> {
        self.collect_docs(&self.config.hourly_stats, |r: &HourlyStats| {
            r.winery_id == winery_id
                && wine_matches(r.wine_id.as_deref(), wine_id)
                && r.date >= start
                && r.date <= end
        })
    }

    async fn latest_ranking(
        &self,
        winery_id: &str,
        period_type: PeriodType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<WineRanking>> {
        let mut rankings: Vec<WineRanking> =
            self.collect_docs(&self.config.wine_rankings, |r: &WineRanking| {
                r.winery_id == winery_id
                    && r.period_type == period_type
                    && r.date >= start
                    && r.date <= end
            })?;
        rankings.sort_by_key(|r| r.date);
        Ok(rankings.pop())
    }
}
