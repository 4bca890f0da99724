//! Scan event definitions.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Bucket key used whenever a grouping field is absent. Events missing a
/// field are never dropped; they land here so bucket sums always equal
/// the input event count.
pub const UNKNOWN_KEY: &str = "unknown";

/// Device class recognized by the device grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
    Unknown,
}

impl DeviceType {
    /// Case-insensitive parse; anything unrecognized maps to `Unknown`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("mobile") => Self::Mobile,
            Some("tablet") => Self::Tablet,
            Some("desktop") => Self::Desktop,
            _ => Self::Unknown,
        }
    }
}

/// One recorded view of a wine's public label page via its QR code.
///
/// Events are append-only and immutable; aggregation is a pure read of a
/// time-bounded event set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    /// When the view occurred.
    pub timestamp: DateTime<Utc>,
    #[validate(length(min = 1, max = 64))]
    pub winery_id: String,
    #[validate(length(min = 1, max = 64))]
    pub wine_id: String,
    /// Display strings captured at scan time so later renames do not
    /// rewrite historical rankings.
    #[validate(length(max = 256))]
    pub wine_name: Option<String>,
    #[validate(length(max = 128))]
    pub wine_batch: Option<String>,
    #[validate(length(max = 16))]
    pub wine_vintage: Option<String>,
    /// Free-form device string ("mobile", "TABLET", ...).
    #[validate(length(max = 32))]
    pub device_type: Option<String>,
    /// Locale string chosen on the label page (e.g. "cs-CZ").
    #[validate(length(max = 16))]
    pub language_used: Option<String>,
    /// Browser Accept-Language fallback.
    #[validate(length(max = 16))]
    pub browser_language: Option<String>,
    #[validate(length(max = 8))]
    pub country_code: Option<String>,
    #[validate(length(max = 64))]
    pub region_code: Option<String>,
    #[validate(length(max = 128))]
    pub city: Option<String>,
    /// Cardinality token for unique-visitor estimates. Never copied into
    /// aggregate records.
    #[validate(length(max = 45))]
    pub ip_address: Option<String>,
}

impl ScanEvent {
    pub fn device(&self) -> DeviceType {
        DeviceType::parse(self.device_type.as_deref())
    }

    /// Normalized language key: lowercase first two characters of
    /// `language_used`, falling back to `browser_language`, falling back
    /// to `"unknown"`. Empty strings count as absent.
    pub fn language_key(&self) -> String {
        for raw in [&self.language_used, &self.browser_language] {
            if let Some(raw) = raw.as_deref() {
                let key: String = raw
                    .trim()
                    .chars()
                    .take(2)
                    .flat_map(char::to_lowercase)
                    .collect();
                if !key.is_empty() {
                    return key;
                }
            }
        }
        UNKNOWN_KEY.to_string()
    }

    /// Hour of day in UTC. Scanners are globally distributed, so hourly
    /// bucketing is UTC everywhere.
    pub fn hour_utc(&self) -> u32 {
        self.timestamp.hour()
    }

    /// (country, region, city) with `"unknown"` at each missing level,
    /// independently.
    pub fn geo(&self) -> (String, String, String) {
        (
            geo_level(self.country_code.as_deref()),
            geo_level(self.region_code.as_deref()),
            geo_level(self.city.as_deref()),
        )
    }
}

fn geo_level(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN_KEY.to_string(),
    }
}
