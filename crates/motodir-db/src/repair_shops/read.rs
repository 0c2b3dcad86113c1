//! Read operations for the `repair_shops` table.

use sqlx::PgPool;

use super::types::RepairShopRow;

/// List directory rows ordered by name, as the directory site shows them.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_repair_shops(pool: &PgPool, limit: i64) -> Result<Vec<RepairShopRow>, sqlx::Error> {
    sqlx::query_as::<_, RepairShopRow>(
        "SELECT id, place_id, name, address, city, latitude, longitude, phone, website, hours, \
                business_type, rating, reviews_count, distance_from_city_center, is_city_center, \
                city_center_lat, city_center_lon, added_by, scraped_at, last_verified, \
                is_active, created_at \
         FROM repair_shops \
         ORDER BY name ASC, id ASC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Total number of rows in the directory.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_repair_shops(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM repair_shops")
        .fetch_one(pool)
        .await
}

/// One-row read against the directory table. Hosted stores pause idle
/// projects; touching the table once per run keeps it awake.
///
/// Returns whether the table holds at least one row.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn keep_alive(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let row: Option<String> =
        sqlx::query_scalar::<_, String>("SELECT place_id FROM repair_shops LIMIT 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}
