use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Envelope the CLI writes around scraped records.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapeReport<T> {
    pub platform: String,
    pub source: String,
    pub scraped_at: String,
    pub total_records: usize,
    pub records: T,
    pub version: String,
}

impl<T> ScrapeReport<T> {
    pub fn new(platform: &str, source: &str, total_records: usize, records: T) -> Self {
        Self {
            platform: platform.to_string(),
            source: source.to_string(),
            scraped_at: Utc::now().to_rfc3339(),
            total_records,
            records,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
