//! Pure grouping functions over scan event slices.
//!
//! Every function attributes events with missing fields to an explicit
//! `"unknown"` bucket, so the sum of all bucket counts always equals the
//! input event count.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::event::{DeviceType, ScanEvent};

/// Scan counts split by device class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceCounts {
    pub mobile: u64,
    pub tablet: u64,
    pub desktop: u64,
    pub unknown: u64,
}

impl DeviceCounts {
    pub fn total(&self) -> u64 {
        self.mobile + self.tablet + self.desktop + self.unknown
    }
}

/// Counts events per device class, case-insensitively.
pub fn count_by_device(events: &[ScanEvent]) -> DeviceCounts {
    let mut counts = DeviceCounts::default();
    for event in events {
        match event.device() {
            DeviceType::Mobile => counts.mobile += 1,
            DeviceType::Tablet => counts.tablet += 1,
            DeviceType::Desktop => counts.desktop += 1,
            DeviceType::Unknown => counts.unknown += 1,
        }
    }
    counts
}

/// Counts events per normalized two-letter language key.
pub fn count_by_language(events: &[ScanEvent]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for event in events {
        *counts.entry(event.language_key()).or_insert(0) += 1;
    }
    counts
}

/// Counts events per UTC hour. All 24 buckets are always present,
/// including zero-count hours.
pub fn count_by_hour(events: &[ScanEvent]) -> [u64; 24] {
    let mut buckets = [0u64; 24];
    for event in events {
        buckets[event.hour_utc() as usize % 24] += 1;
    }
    buckets
}

/// Region-level node of the geographic breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionCounts {
    pub total: u64,
    pub cities: BTreeMap<String, u64>,
}

/// Country-level node of the geographic breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCounts {
    pub total: u64,
    pub regions: BTreeMap<String, RegionCounts>,
}

/// Three-level country -> region -> city grouping with running totals at
/// every level, built in a single pass.
pub fn count_by_region(events: &[ScanEvent]) -> BTreeMap<String, CountryCounts> {
    let mut countries: BTreeMap<String, CountryCounts> = BTreeMap::new();
    for event in events {
        let (country, region, city) = event.geo();
        let country_node = countries.entry(country).or_default();
        country_node.total += 1;
        let region_node = country_node.regions.entry(region).or_default();
        region_node.total += 1;
        *region_node.cities.entry(city).or_insert(0) += 1;
    }
    countries
}

/// Scan tally for one wine, with display metadata from the first event
/// seen for that wine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WineTally {
    pub wine_id: String,
    pub wine_name: Option<String>,
    pub wine_batch: Option<String>,
    pub wine_vintage: Option<String>,
    pub scans: u64,
}

/// Groups events by wine id in first-seen order. The order matters: the
/// ranking function breaks ties by it.
pub fn tally_by_wine(events: &[ScanEvent]) -> Vec<WineTally> {
    let mut tallies: Vec<WineTally> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for event in events {
        let at = match index.get(&event.wine_id) {
            Some(&at) => at,
            None => {
                tallies.push(WineTally {
                    wine_id: event.wine_id.clone(),
                    wine_name: event.wine_name.clone(),
                    wine_batch: event.wine_batch.clone(),
                    wine_vintage: event.wine_vintage.clone(),
                    scans: 0,
                });
                index.insert(event.wine_id.clone(), tallies.len() - 1);
                tallies.len() - 1
            }
        };
        tallies[at].scans += 1;
    }
    tallies
}

/// Unique-visitor estimate: distinct IP tokens, with all missing IPs
/// collapsing into one shared token.
pub fn estimate_unique_visitors(events: &[ScanEvent]) -> u64 {
    let mut tokens: BTreeSet<&str> = BTreeSet::new();
    for event in events {
        tokens.insert(
            event
                .ip_address
                .as_deref()
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
                .unwrap_or(crate::event::UNKNOWN_KEY),
        );
    }
    tokens.len() as u64
}

/// Partitions events by a key function, preserving per-group event order.
/// Returns groups in sorted key order so aggregation output is
/// deterministic across runs.
pub fn partition_by<F>(events: &[ScanEvent], key: F) -> BTreeMap<String, Vec<ScanEvent>>
where
    F: Fn(&ScanEvent) -> &str,
{
    let mut groups: BTreeMap<String, Vec<ScanEvent>> = BTreeMap::new();
    for event in events {
        groups
            .entry(key(event).to_string())
            .or_default()
            .push(event.clone());
    }
    groups
}
