//! Row types for the `repair_shops` table.

use chrono::{DateTime, Utc};

/// A row from the `repair_shops` table.
///
/// Columns filled by later curation (`last_verified`, `is_active`) are
/// included; the crawl agent never writes them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RepairShopRow {
    pub id: i64,
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: String,
    pub website: String,
    pub hours: String,
    pub business_type: String,
    pub rating: String,
    pub reviews_count: i32,
    pub distance_from_city_center: Option<f64>,
    pub is_city_center: Option<bool>,
    pub city_center_lat: Option<f64>,
    pub city_center_lon: Option<f64>,
    pub added_by: Option<String>,
    pub scraped_at: DateTime<Utc>,
    pub last_verified: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
