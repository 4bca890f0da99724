//! Aggregate facet records and their natural keys.
//!
//! Each record carries a natural composite key so re-running aggregation
//! for the same day updates rather than duplicates. `wine_id = None`
//! encodes the winery-level granularity; a present wine id scopes the
//! record to one wine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ranking period granularity. The orchestrator emits daily rankings;
/// the key leaves room for the coarser periods dashboards may add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Key fragment for the wine granularity; winery-level records use "-".
fn wine_key(wine_id: Option<&str>) -> &str {
    wine_id.unwrap_or("-")
}

/// Per-day scan totals with device split and a unique-visitor estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: NaiveDate,
    pub winery_id: String,
    /// `None` aggregates all wines of the winery for the day.
    pub wine_id: Option<String>,
    pub scan_count: u64,
    /// IP-cardinality estimate, not deduplicated identities.
    pub unique_visitors: u64,
    pub mobile_count: u64,
    pub tablet_count: u64,
    pub desktop_count: u64,
}

impl DailyStats {
    pub fn natural_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.date,
            self.winery_id,
            wine_key(self.wine_id.as_deref())
        )
    }
}

/// Per-day scan count for one (country, region, city) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalStats {
    pub date: NaiveDate,
    pub winery_id: String,
    pub wine_id: Option<String>,
    pub country_code: String,
    pub region_code: String,
    pub city: String,
    pub scan_count: u64,
}

impl RegionalStats {
    pub fn natural_key(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}",
            self.date,
            self.winery_id,
            wine_key(self.wine_id.as_deref()),
            self.country_code,
            self.region_code,
            self.city
        )
    }
}

/// Per-day scan count for one normalized language key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStats {
    pub date: NaiveDate,
    pub winery_id: String,
    pub wine_id: Option<String>,
    pub language: String,
    pub scan_count: u64,
}

impl LanguageStats {
    pub fn natural_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.date,
            self.winery_id,
            wine_key(self.wine_id.as_deref()),
            self.language
        )
    }
}

/// Per-day scan count for one UTC hour bucket. Written for all 24 hours
/// including zeros so hourly charts render flat lines rather than gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyStats {
    pub date: NaiveDate,
    /// 0-23, UTC.
    pub hour: u8,
    pub winery_id: String,
    pub wine_id: Option<String>,
    pub scan_count: u64,
}

impl HourlyStats {
    pub fn natural_key(&self) -> String {
        format!(
            "{}:{:02}:{}:{}",
            self.date,
            self.hour,
            self.winery_id,
            wine_key(self.wine_id.as_deref())
        )
    }
}

/// One entry of a wine ranking, 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub wine_id: String,
    pub wine_name: String,
    pub scan_count: u64,
    pub rank: u32,
}

/// Ordered wine popularity ranking for one winery. Entries are stored as
/// a structured list, never string-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WineRanking {
    pub date: NaiveDate,
    pub period_type: PeriodType,
    pub winery_id: String,
    pub entries: Vec<RankingEntry>,
}

impl WineRanking {
    pub fn natural_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.date,
            self.period_type.as_str(),
            self.winery_id
        )
    }
}
