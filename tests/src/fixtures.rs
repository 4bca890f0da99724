//! Test fixtures and scan-event builders.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use scan_core::ScanEvent;

/// The fixed day most tests aggregate.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

pub fn at_hour(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(
        &date
            .and_hms_opt(hour, 30, 0)
            .expect("valid time"),
    )
}

/// Builder for scan events with sensible defaults.
pub struct ScanEventBuilder {
    event: ScanEvent,
}

impl ScanEventBuilder {
    pub fn new(winery_id: &str, wine_id: &str) -> Self {
        Self {
            event: ScanEvent {
                timestamp: at_hour(test_date(), 9),
                winery_id: winery_id.to_string(),
                wine_id: wine_id.to_string(),
                wine_name: Some(format!("Wine {}", wine_id)),
                wine_batch: None,
                wine_vintage: Some("2022".to_string()),
                device_type: Some("mobile".to_string()),
                language_used: Some("cs-CZ".to_string()),
                browser_language: None,
                country_code: Some("CZ".to_string()),
                region_code: Some("Moravia".to_string()),
                city: Some("Brno".to_string()),
                ip_address: Some("198.51.100.10".to_string()),
            },
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.event.timestamp = timestamp;
        self
    }

    pub fn hour(mut self, hour: u32) -> Self {
        self.event.timestamp = at_hour(self.event.timestamp.date_naive(), hour);
        self
    }

    pub fn device(mut self, device: &str) -> Self {
        self.event.device_type = Some(device.to_string());
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        self.event.language_used = Some(language.to_string());
        self
    }

    pub fn geo(mut self, country: &str, region: &str, city: &str) -> Self {
        self.event.country_code = Some(country.to_string());
        self.event.region_code = Some(region.to_string());
        self.event.city = Some(city.to_string());
        self
    }

    pub fn ip(mut self, ip: &str) -> Self {
        self.event.ip_address = Some(ip.to_string());
        self
    }

    pub fn build(self) -> ScanEvent {
        self.event
    }
}

/// Shorthand for a default event.
pub fn scan(winery_id: &str, wine_id: &str) -> ScanEvent {
    ScanEventBuilder::new(winery_id, wine_id).build()
}

/// N default events for one wine, each from a distinct IP.
pub fn scans(winery_id: &str, wine_id: &str, n: usize) -> Vec<ScanEvent> {
    (0..n)
        .map(|i| {
            ScanEventBuilder::new(winery_id, wine_id)
                .ip(&format!("198.51.100.{}", i + 1))
                .build()
        })
        .collect()
}
