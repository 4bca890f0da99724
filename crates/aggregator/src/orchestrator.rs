//! Aggregation orchestrator.
//!
//! One pass over a day's events produces all facets at both
//! granularities: winery-level records (`wine_id = None`) and wine-level
//! records. Every event counts into both, so dashboards can serve
//! per-wine and whole-winery views from the same collections.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use validator::Validate;

use scan_core::{
    count_by_device, count_by_hour, count_by_language, count_by_region, estimate_unique_visitors,
    limits, partition_by, rank_wines, tally_by_wine, DailyStats, HourlyStats, LanguageStats,
    PeriodType, RegionalStats, Result, ScanEvent, WineRanking,
};
use scan_store::{AggregateStore, EventFilter, EventStore};
use telemetry::metrics;

/// One winery whose processing did not complete cleanly. Facets that
/// were written before the failure stand; re-running the day repairs the
/// rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WineryFailure {
    pub winery_id: String,
    pub errors: Vec<String>,
}

/// Outcome of one aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReport {
    pub date: NaiveDate,
    pub events_seen: usize,
    /// Events dropped before grouping because they failed validation.
    pub events_rejected: usize,
    /// Wineries whose facets were all written successfully.
    pub wineries_processed: usize,
    pub failures: Vec<WineryFailure>,
    /// Set when the per-run event cap was hit. The day was aggregated
    /// from a partial window and should be re-run with a winery filter.
    pub truncated: bool,
}

impl AggregationReport {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            events_seen: 0,
            events_rejected: 0,
            wineries_processed: 0,
            failures: Vec::new(),
            truncated: false,
        }
    }

    pub fn nothing_to_aggregate(&self) -> bool {
        self.events_seen == 0
    }

    /// Human-readable outcome line for the trigger endpoint.
    pub fn message(&self) -> String {
        if self.nothing_to_aggregate() {
            return format!("No scan events found for {}", self.date);
        }
        let mut msg = format!(
            "Aggregated {} events for {} across {} wineries",
            self.events_seen, self.date, self.wineries_processed
        );
        if !self.failures.is_empty() {
            msg.push_str(&format!(", {} wineries reported errors", self.failures.len()));
        }
        if self.truncated {
            msg.push_str(" (event window truncated at the per-run cap)");
        }
        msg
    }
}

/// Rolls one UTC day of scan events into the six facet collections.
pub struct Aggregator {
    events: Arc<dyn EventStore>,
    aggregates: Arc<dyn AggregateStore>,
    page_size: usize,
    max_events: usize,
}

impl Aggregator {
    pub fn new(events: Arc<dyn EventStore>, aggregates: Arc<dyn AggregateStore>) -> Self {
        Self {
            events,
            aggregates,
            page_size: limits::FETCH_PAGE_SIZE,
            max_events: limits::MAX_EVENTS_PER_RUN,
        }
    }

    /// Override fetch limits (tests, backfill tooling).
    pub fn with_limits(mut self, page_size: usize, max_events: usize) -> Self {
        self.page_size = page_size.max(1);
        self.max_events = max_events.max(1);
        self
    }

    /// Aggregates all events within the UTC day boundaries of `date`,
    /// optionally restricted to one winery.
    ///
    /// A fetch failure is fatal and leaves no partial writes. Failures
    /// while processing one winery are collected into the report and do
    /// not stop the remaining wineries. Safe to re-run: facet records
    /// are upserted by natural key.
    pub async fn aggregate(
        &self,
        date: NaiveDate,
        winery_filter: Option<&str>,
    ) -> Result<AggregationReport> {
        let started = Instant::now();
        metrics().runs_started.inc();

        let filter = EventFilter::utc_day(date, winery_filter.map(Into::into));
        let (events, truncated) = match self.fetch_window(&filter).await {
            Ok(fetched) => fetched,
            Err(e) => {
                metrics().runs_failed.inc();
                error!(date = %date, error = %e, "Event window fetch failed, aborting run");
                return Err(e);
            }
        };

        if events.is_empty() {
            info!(date = %date, "No scan events in window, nothing to aggregate");
            metrics().runs_completed.inc();
            return Ok(AggregationReport::empty(date));
        }

        let events_seen = events.len();
        let (events, events_rejected) = discard_invalid(events);
        if truncated {
            metrics().runs_truncated.inc();
            warn!(
                date = %date,
                cap = self.max_events,
                "Event window truncated at per-run cap; day is partially aggregated"
            );
        }

        let mut report = AggregationReport {
            date,
            events_seen,
            events_rejected,
            wineries_processed: 0,
            failures: Vec::new(),
            truncated,
        };

        let by_winery = partition_by(&events, |e| &e.winery_id);
        for (winery_id, winery_events) in by_winery {
            let facet_errors = self.aggregate_winery(date, &winery_id, &winery_events).await;
            if facet_errors.is_empty() {
                report.wineries_processed += 1;
                metrics().wineries_processed.inc();
            } else {
                warn!(
                    winery_id = %winery_id,
                    errors = facet_errors.len(),
                    "Winery aggregation completed with errors"
                );
                metrics().winery_failures.inc();
                report.failures.push(WineryFailure {
                    winery_id,
                    errors: facet_errors,
                });
            }
        }

        metrics().runs_completed.inc();
        metrics().events_aggregated.inc_by(events.len() as u64);
        metrics().events_rejected.inc_by(events_rejected as u64);
        metrics()
            .aggregation_latency_ms
            .observe(started.elapsed().as_millis() as u64);

        info!(
            date = %date,
            events = report.events_seen,
            rejected = report.events_rejected,
            wineries = report.wineries_processed,
            failures = report.failures.len(),
            truncated = report.truncated,
            "Aggregation run complete"
        );
        Ok(report)
    }

    /// Pages through the event window up to the per-run cap. Returns the
    /// events and whether the cap cut the window short.
    async fn fetch_window(&self, filter: &EventFilter) -> Result<(Vec<ScanEvent>, bool)> {
        let mut events = Vec::new();
        loop {
            let remaining = self.max_events - events.len();
            let page_size = self.page_size.min(remaining);
            let page = self.events.list_events(filter, events.len(), page_size).await?;
            let short_page = page.len() < page_size;
            events.extend(page);

            if short_page {
                return Ok((events, false));
            }
            if events.len() >= self.max_events {
                // One more probe decides whether anything was cut off.
                let probe = self.events.list_events(filter, events.len(), 1).await?;
                return Ok((events, !probe.is_empty()));
            }
        }
    }

    /// Computes and upserts every facet for one winery: winery-level
    /// daily/regional/language/hourly plus the day's ranking, then the
    /// four non-ranking facets per wine. Individual facet failures are
    /// collected so one broken facet does not block the rest.
    async fn aggregate_winery(
        &self,
        date: NaiveDate,
        winery_id: &str,
        events: &[ScanEvent],
    ) -> Vec<String> {
        let mut errors = Vec::new();

        self.write_facets(date, winery_id, None, events, &mut errors)
            .await;

        let ranking = WineRanking {
            date,
            period_type: PeriodType::Daily,
            winery_id: winery_id.to_string(),
            entries: rank_wines(&tally_by_wine(events)),
        };
        if let Err(e) = self.aggregates.upsert_ranking(&ranking).await {
            metrics().facet_upsert_errors.inc();
            errors.push(format!("wine ranking: {}", e));
        }

        let by_wine = partition_by(events, |e| &e.wine_id);
        for (wine_id, wine_events) in by_wine {
            self.write_facets(date, winery_id, Some(&wine_id), &wine_events, &mut errors)
                .await;
        }

        errors
    }

    /// Writes the daily, regional, language, and hourly facets for one
    /// (winery, wine-or-all) scope.
    async fn write_facets(
        &self,
        date: NaiveDate,
        winery_id: &str,
        wine_id: Option<&str>,
        events: &[ScanEvent],
        errors: &mut Vec<String>,
    ) {
        let scope = |facet: &str| match wine_id {
            Some(wine) => format!("{} ({})", facet, wine),
            None => facet.to_string(),
        };
        let mut record_err = |facet: String, e: scan_core::Error| {
            metrics().facet_upsert_errors.inc();
            errors.push(format!("{}: {}", facet, e));
        };

        let devices = count_by_device(events);
        let daily = DailyStats {
            date,
            winery_id: winery_id.to_string(),
            wine_id: wine_id.map(Into::into),
            scan_count: events.len() as u64,
            unique_visitors: estimate_unique_visitors(events),
            mobile_count: devices.mobile,
            tablet_count: devices.tablet,
            desktop_count: devices.desktop,
        };
        if let Err(e) = self.aggregates.upsert_daily(&daily).await {
            record_err(scope("daily stats"), e);
        }

        for (country, country_node) in count_by_region(events) {
            for (region, region_node) in country_node.regions {
                for (city, scan_count) in region_node.cities {
                    let record = RegionalStats {
                        date,
                        winery_id: winery_id.to_string(),
                        wine_id: wine_id.map(Into::into),
                        country_code: country.clone(),
                        region_code: region.clone(),
                        city,
                        scan_count,
                    };
                    if let Err(e) = self.aggregates.upsert_regional(&record).await {
                        record_err(scope("regional stats"), e);
                    }
                }
            }
        }

        for (language, scan_count) in count_by_language(events) {
            let record = LanguageStats {
                date,
                winery_id: winery_id.to_string(),
                wine_id: wine_id.map(Into::into),
                language,
                scan_count,
            };
            if let Err(e) = self.aggregates.upsert_language(&record).await {
                record_err(scope("language stats"), e);
            }
        }

        // All 24 hours, zeros included, so hourly charts never have gaps.
        let hourly = count_by_hour(events);
        for (hour, &scan_count) in hourly.iter().enumerate() {
            let record = HourlyStats {
                date,
                hour: hour as u8,
                winery_id: winery_id.to_string(),
                wine_id: wine_id.map(Into::into),
                scan_count,
            };
            if let Err(e) = self.aggregates.upsert_hourly(&record).await {
                record_err(scope("hourly stats"), e);
            }
        }
    }
}

/// Drops events that fail field validation, keeping the rest. Returns
/// the surviving events and the rejected count.
fn discard_invalid(events: Vec<ScanEvent>) -> (Vec<ScanEvent>, usize) {
    let before = events.len();
    let events: Vec<ScanEvent> = events
        .into_iter()
        .filter(|event| match event.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(winery_id = %event.winery_id, error = %e, "Discarding malformed scan event");
                false
            }
        })
        .collect();
    let rejected = before - events.len();
    (events, rejected)
}
