//! Sample-data generator for wineries without aggregates yet.
//!
//! New tenants see a plausible-looking dashboard instead of an empty
//! one. The shapes are fixed weight tables with light jitter so every
//! render looks alive but stays in realistic proportions. Generated
//! summaries always carry `sample: true`.

use chrono::NaiveDate;
use rand::Rng;

use scan_core::RankingEntry;

use crate::summary::{
    percent_of, share, DashboardSummary, RangePreset, ShareEntry, SummaryRange,
};

const DEVICE_WEIGHTS: [(&str, f64); 3] = [("mobile", 0.68), ("tablet", 0.09), ("desktop", 0.23)];

const LANGUAGE_WEIGHTS: [(&str, f64); 5] = [
    ("en", 0.34),
    ("cs", 0.26),
    ("de", 0.20),
    ("fr", 0.12),
    ("it", 0.08),
];

const COUNTRY_WEIGHTS: [(&str, f64); 5] = [
    ("CZ", 0.31),
    ("DE", 0.24),
    ("US", 0.20),
    ("FR", 0.14),
    ("IT", 0.11),
];

/// Relative scan volume per UTC hour. Peaks around lunch and dinner,
/// near-quiet overnight.
const HOURLY_SHAPE: [f64; 24] = [
    0.2, 0.1, 0.1, 0.1, 0.1, 0.2, 0.4, 0.8, 1.2, 1.6, 2.0, 2.8, //
    3.6, 3.2, 2.4, 2.0, 2.2, 2.6, 3.0, 3.8, 3.4, 2.2, 1.2, 0.6,
];

const SAMPLE_WINES: [&str; 5] = [
    "Riesling Reserve",
    "Pinot Noir Estate",
    "Chardonnay Barrel Select",
    "Cabernet Sauvignon",
    "Sauvignon Blanc",
];

/// Builds a generated summary for the requested winery and range.
pub fn sample_summary(winery_id: &str, preset: RangePreset, today: NaiveDate) -> DashboardSummary {
    let mut rng = rand::thread_rng();
    let (start, end) = preset.resolve(today);

    // Volume scales with range length so longer ranges look busier.
    let per_day = rng.gen_range(9..=16);
    let total_scans = preset.days() as u64 * per_day;
    let unique_visitors = (total_scans as f64 * rng.gen_range(0.55..0.75)) as u64;

    let devices = weighted_shares(&DEVICE_WEIGHTS, total_scans, &mut rng);
    let languages = weighted_shares(&LANGUAGE_WEIGHTS, total_scans, &mut rng);
    let countries = weighted_shares(&COUNTRY_WEIGHTS, total_scans, &mut rng);

    let shape_total: f64 = HOURLY_SHAPE.iter().sum();
    let hourly: Vec<u64> = HOURLY_SHAPE
        .iter()
        .map(|weight| {
            let base = total_scans as f64 * weight / shape_total;
            (base * rng.gen_range(0.85..1.15)).round() as u64
        })
        .collect();

    let mut remaining = total_scans;
    let mut previous = u64::MAX;
    let top_wines: Vec<RankingEntry> = SAMPLE_WINES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let drawn = (remaining as f64 * rng.gen_range(0.25..0.40)) as u64;
            let scans = drawn.min(previous);
            previous = scans;
            remaining = remaining.saturating_sub(scans);
            RankingEntry {
                wine_id: format!("sample-wine-{}", i + 1),
                wine_name: (*name).to_string(),
                scan_count: scans,
                rank: i as u32 + 1,
            }
        })
        .collect();

    DashboardSummary {
        winery_id: winery_id.to_string(),
        range: SummaryRange { preset, start, end },
        total_scans,
        unique_visitors,
        trend_percent: None,
        devices,
        languages,
        countries,
        hourly,
        top_wines,
        sample: true,
    }
}

fn weighted_shares(
    weights: &[(&str, f64)],
    total: u64,
    rng: &mut impl Rng,
) -> Vec<ShareEntry> {
    let mut entries: Vec<ShareEntry> = weights
        .iter()
        .map(|(key, weight)| {
            let count = (total as f64 * weight * rng.gen_range(0.9..1.1)).round() as u64;
            share(key, count, 0)
        })
        .collect();
    let facet_total: u64 = entries.iter().map(|e| e.count).sum();
    for entry in &mut entries {
        entry.percent = percent_of(entry.count, facet_total);
    }
    entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.key.cmp(&b.key)));
    entries
}
