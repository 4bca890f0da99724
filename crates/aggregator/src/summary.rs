//! Read-side dashboard summary builder.
//!
//! Composes winery-level aggregate records over a date-range preset into
//! the summary shape the dashboard renders. When the range holds no
//! aggregates at all, the sample-data generator supplies the summary
//! instead; partial real data is never blended with samples.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use scan_core::{limits, Error, PeriodType, RankingEntry, Result};
use scan_store::AggregateStore;
use telemetry::metrics;

use crate::sample;

/// Named relative date range requested by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangePreset {
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "90days")]
    NinetyDays,
    #[serde(rename = "year")]
    Year,
}

impl RangePreset {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "7days" => Ok(Self::SevenDays),
            "30days" => Ok(Self::ThirtyDays),
            "90days" => Ok(Self::NinetyDays),
            "year" => Ok(Self::Year),
            other => Err(Error::invalid_argument(format!(
                "unknown range preset '{}', expected 7days|30days|90days|year",
                other
            ))),
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            Self::SevenDays => 7,
            Self::ThirtyDays => 30,
            Self::NinetyDays => 90,
            Self::Year => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SevenDays => "7days",
            Self::ThirtyDays => "30days",
            Self::NinetyDays => "90days",
            Self::Year => "year",
        }
    }

    /// Concrete inclusive [start, end] pair ending today.
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (today - Duration::days(self.days() - 1), today)
    }

    /// The immediately preceding period of equal length.
    pub fn preceding(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let (start, _) = self.resolve(today);
        (start - Duration::days(self.days()), start - Duration::days(1))
    }
}

/// Resolved range echoed back in the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRange {
    pub preset: RangePreset,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One bucket of a facet breakdown with its share of the facet total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareEntry {
    pub key: String,
    pub count: u64,
    /// Rounded percentage of the facet total, 0-100.
    pub percent: u8,
}

/// Dashboard-ready summary for one winery over one range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub winery_id: String,
    pub range: SummaryRange,
    pub total_scans: u64,
    /// Sum of the stored per-day estimates; not re-deduplicated across
    /// days.
    pub unique_visitors: u64,
    /// Percent change versus the preceding equal-length period. Absent
    /// when the preceding period had no scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_percent: Option<f64>,
    pub devices: Vec<ShareEntry>,
    pub languages: Vec<ShareEntry>,
    pub countries: Vec<ShareEntry>,
    /// Scan counts per UTC hour, always 24 entries.
    pub hourly: Vec<u64>,
    pub top_wines: Vec<RankingEntry>,
    /// True when this summary was generated, not aggregated. Sample and
    /// real numbers are never mixed in one summary.
    pub sample: bool,
}

/// Builds dashboard summaries from the aggregate collections.
pub struct SummaryBuilder {
    aggregates: Arc<dyn AggregateStore>,
    top_wines: usize,
}

impl SummaryBuilder {
    pub fn new(aggregates: Arc<dyn AggregateStore>) -> Self {
        Self {
            aggregates,
            top_wines: limits::TOP_WINES_LIMIT,
        }
    }

    pub async fn build(&self, winery_id: &str, preset: RangePreset) -> Result<DashboardSummary> {
        self.build_as_of(winery_id, preset, Utc::now().date_naive()).await
    }

    /// Builds the summary with an explicit "today", for deterministic
    /// tests.
    pub async fn build_as_of(
        &self,
        winery_id: &str,
        preset: RangePreset,
        today: NaiveDate,
    ) -> Result<DashboardSummary> {
        let started = Instant::now();
        let (start, end) = preset.resolve(today);

        let daily = self.aggregates.list_daily(winery_id, None, start, end).await?;
        if daily.is_empty() {
            info!(winery_id = %winery_id, preset = preset.as_str(), "No aggregates in range, serving sample summary");
            metrics().sample_summaries_served.inc();
            return Ok(sample::sample_summary(winery_id, preset, today));
        }

        let total_scans: u64 = daily.iter().map(|d| d.scan_count).sum();
        let unique_visitors: u64 = daily.iter().map(|d| d.unique_visitors).sum();

        let (prev_start, prev_end) = preset.preceding(today);
        let previous = self
            .aggregates
            .list_daily(winery_id, None, prev_start, prev_end)
            .await?;
        let previous_scans: u64 = previous.iter().map(|d| d.scan_count).sum();
        let trend_percent = percent_change(previous_scans, total_scans);

        let mobile: u64 = daily.iter().map(|d| d.mobile_count).sum();
        let tablet: u64 = daily.iter().map(|d| d.tablet_count).sum();
        let desktop: u64 = daily.iter().map(|d| d.desktop_count).sum();
        let unknown = total_scans.saturating_sub(mobile + tablet + desktop);
        let devices = vec![
            share("mobile", mobile, total_scans),
            share("tablet", tablet, total_scans),
            share("desktop", desktop, total_scans),
            share("unknown", unknown, total_scans),
        ];

        let languages = self
            .language_shares(winery_id, start, end)
            .await?;
        let countries = self.country_shares(winery_id, start, end).await?;
        let hourly = self.hourly_distribution(winery_id, start, end).await?;

        let top_wines = match self
            .aggregates
            .latest_ranking(winery_id, PeriodType::Daily, start, end)
            .await?
        {
            Some(ranking) => {
                let mut entries = ranking.entries;
                entries.truncate(self.top_wines);
                entries
            }
            None => Vec::new(),
        };

        metrics().summaries_served.inc();
        metrics()
            .summary_latency_ms
            .observe(started.elapsed().as_millis() as u64);
        debug!(
            winery_id = %winery_id,
            preset = preset.as_str(),
            total_scans = total_scans,
            "Summary built from aggregates"
        );

        Ok(DashboardSummary {
            winery_id: winery_id.to_string(),
            range: SummaryRange { preset, start, end },
            total_scans,
            unique_visitors,
            trend_percent,
            devices,
            languages,
            countries,
            hourly,
            top_wines,
            sample: false,
        })
    }

    async fn language_shares(
        &self,
        winery_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ShareEntry>> {
        let records = self
            .aggregates
            .list_language(winery_id, None, start, end)
            .await?;
        let mut totals: std::collections::BTreeMap<String, u64> = Default::default();
        for record in records {
            *totals.entry(record.language).or_insert(0) += record.scan_count;
        }
        Ok(to_shares(totals))
    }

    async fn country_shares(
        &self,
        winery_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ShareEntry>> {
        let records = self
            .aggregates
            .list_regional(winery_id, None, start, end)
            .await?;
        let mut totals: std::collections::BTreeMap<String, u64> = Default::default();
        for record in records {
            *totals.entry(record.country_code).or_insert(0) += record.scan_count;
        }
        Ok(to_shares(totals))
    }

    async fn hourly_distribution(
        &self,
        winery_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<u64>> {
        let records = self
            .aggregates
            .list_hourly(winery_id, None, start, end)
            .await?;
        let mut buckets = vec![0u64; 24];
        for record in records {
            buckets[record.hour as usize % 24] += record.scan_count;
        }
        Ok(buckets)
    }
}

/// Bucket count as a rounded percentage of the total.
pub(crate) fn percent_of(count: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u8
}

pub(crate) fn share(key: &str, count: u64, total: u64) -> ShareEntry {
    ShareEntry {
        key: key.to_string(),
        count,
        percent: percent_of(count, total),
    }
}

/// Period-over-period percent change, one decimal, `None` when the
/// previous period is empty.
fn percent_change(previous: u64, current: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
    Some((change * 10.0).round() / 10.0)
}

/// Totals into sorted shares: count descending, key ascending on ties.
fn to_shares(totals: std::collections::BTreeMap<String, u64>) -> Vec<ShareEntry> {
    let facet_total: u64 = totals.values().sum();
    let mut shares: Vec<ShareEntry> = totals
        .into_iter()
        .map(|(key, count)| ShareEntry {
            percent: percent_of(count, facet_total),
            key,
            count,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then(a.key.cmp(&b.key)));
    shares
}
