//! Collection-name configuration.

use serde::{Deserialize, Serialize};

/// Maps each facet to the collection/table identifier it is stored
/// under. Injected at store construction so the engine stays
/// storage-agnostic; no collection name is compiled into a use site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    #[serde(default = "default_scan_events")]
    pub scan_events: String,
    #[serde(default = "default_daily_stats")]
    pub daily_stats: String,
    #[serde(default = "default_regional_stats")]
    pub regional_stats: String,
    #[serde(default = "default_language_stats")]
    pub language_stats: String,
    #[serde(default = "default_hourly_stats")]
    pub hourly_stats: String,
    #[serde(default = "default_wine_rankings")]
    pub wine_rankings: String,
}

fn default_scan_events() -> String {
    "scan_events".to_string()
}

fn default_daily_stats() -> String {
    "daily_stats".to_string()
}

fn default_regional_stats() -> String {
    "regional_stats".to_string()
}

fn default_language_stats() -> String {
    "language_stats".to_string()
}

fn default_hourly_stats() -> String {
    "hourly_stats".to_string()
}

fn default_wine_rankings() -> String {
    "wine_rankings".to_string()
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            scan_events: default_scan_events(),
            daily_stats: default_daily_stats(),
            regional_stats: default_regional_stats(),
            language_stats: default_language_stats(),
            hourly_stats: default_hourly_stats(),
            wine_rankings: default_wine_rankings(),
        }
    }
}

impl CollectionConfig {
    /// All aggregate collection names, in facet order.
    pub fn aggregate_collections(&self) -> [&str; 5] {
        [
            &self.daily_stats,
            &self.regional_stats,
            &self.language_stats,
            &self.hourly_stats,
            &self.wine_rankings,
        ]
    }
}
