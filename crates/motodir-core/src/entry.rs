use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical directory row for one accepted repair shop.
///
/// `place_id` is derived from the upstream record's type and id, so the same
/// upstream element always maps to the same key and re-ingestion is
/// idempotent at the store boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub place_id: String,
    pub name: String,
    pub address: String,
    /// `"CityName, Country"` of the crawl location that found the shop.
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: String,
    pub website: String,
    pub hours: String,
    pub business_type: String,
    /// Unknown at ingestion time; `"N/A"` until curated.
    pub rating: String,
    pub reviews_count: i32,
    /// Kilometres from the crawl location center, rounded to two decimals.
    pub distance_from_city_center: f64,
    pub is_city_center: bool,
    pub city_center_lat: f64,
    pub city_center_lon: f64,
    pub added_by: String,
    pub scraped_at: DateTime<Utc>,
}
