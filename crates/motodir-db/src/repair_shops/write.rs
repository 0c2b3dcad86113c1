//! Write operations for the `repair_shops` table.

use chrono::{DateTime, Utc};
use motodir_core::{ConflictPolicy, DirectoryEntry};
use sqlx::PgPool;

use crate::DbError;

const UNIQUE_VIOLATION: &str = "23505";

const INSERT_FROM_UNNEST: &str = "INSERT INTO repair_shops \
         (place_id, name, address, city, latitude, longitude, phone, website, hours, \
          business_type, rating, reviews_count, distance_from_city_center, is_city_center, \
          city_center_lat, city_center_lon, added_by, scraped_at) \
     SELECT * FROM UNNEST(\
          $1::text[], $2::text[], $3::text[], $4::text[], $5::float8[], $6::float8[], \
          $7::text[], $8::text[], $9::text[], $10::text[], $11::text[], $12::int4[], \
          $13::float8[], $14::bool[], $15::float8[], $16::float8[], $17::text[], \
          $18::timestamptz[])";

/// Column-wise copy of a batch for UNNEST binding.
#[derive(Default)]
struct Columns {
    place_ids: Vec<String>,
    names: Vec<String>,
    addresses: Vec<String>,
    cities: Vec<String>,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    phones: Vec<String>,
    websites: Vec<String>,
    hours: Vec<String>,
    business_types: Vec<String>,
    ratings: Vec<String>,
    reviews_counts: Vec<i32>,
    distances: Vec<f64>,
    is_city_centers: Vec<bool>,
    center_lats: Vec<f64>,
    center_lons: Vec<f64>,
    added_bys: Vec<String>,
    scraped_ats: Vec<DateTime<Utc>>,
}

impl Columns {
    fn from_entries(entries: &[DirectoryEntry]) -> Self {
        let mut c = Self::default();
        for e in entries {
            c.place_ids.push(e.place_id.clone());
            c.names.push(e.name.clone());
            c.addresses.push(e.address.clone());
            c.cities.push(e.city.clone());
            c.latitudes.push(e.latitude);
            c.longitudes.push(e.longitude);
            c.phones.push(e.phone.clone());
            c.websites.push(e.website.clone());
            c.hours.push(e.hours.clone());
            c.business_types.push(e.business_type.clone());
            c.ratings.push(e.rating.clone());
            c.reviews_counts.push(e.reviews_count);
            c.distances.push(e.distance_from_city_center);
            c.is_city_centers.push(e.is_city_center);
            c.center_lats.push(e.city_center_lat);
            c.center_lons.push(e.city_center_lon);
            c.added_bys.push(e.added_by.clone());
            c.scraped_ats.push(e.scraped_at);
        }
        c
    }
}

/// Bulk-insert directory entries in one round-trip.
///
/// Returns the number of rows newly inserted.
///
/// - [`ConflictPolicy::Ignore`]: rows whose `place_id` already exists are
///   skipped (`ON CONFLICT (place_id) DO NOTHING`); the rest of the batch is
///   inserted.
/// - [`ConflictPolicy::Reject`]: the statement has no conflict clause, so a
///   single existing `place_id` fails the whole batch with
///   [`DbError::DuplicateKey`] and nothing is written.
///
/// # Errors
///
/// Returns [`DbError::DuplicateKey`] on a unique violation under `Reject`, or
/// [`DbError::Sqlx`] for any other database failure.
pub async fn insert_repair_shops(
    pool: &PgPool,
    entries: &[DirectoryEntry],
    policy: ConflictPolicy,
) -> Result<u64, DbError> {
    if entries.is_empty() {
        return Ok(0);
    }

    let columns = Columns::from_entries(entries);
    let sql = match policy {
        ConflictPolicy::Ignore => format!(
            "{INSERT_FROM_UNNEST} ON CONFLICT (place_id) DO NOTHING RETURNING place_id"
        ),
        ConflictPolicy::Reject => format!("{INSERT_FROM_UNNEST} RETURNING place_id"),
    };

    let inserted: Vec<String> = sqlx::query_scalar::<_, String>(&sql)
        .bind(&columns.place_ids)
        .bind(&columns.names)
        .bind(&columns.addresses)
        .bind(&columns.cities)
        .bind(&columns.latitudes)
        .bind(&columns.longitudes)
        .bind(&columns.phones)
        .bind(&columns.websites)
        .bind(&columns.hours)
        .bind(&columns.business_types)
        .bind(&columns.ratings)
        .bind(&columns.reviews_counts)
        .bind(&columns.distances)
        .bind(&columns.is_city_centers)
        .bind(&columns.center_lats)
        .bind(&columns.center_lons)
        .bind(&columns.added_bys)
        .bind(&columns.scraped_ats)
        .fetch_all(pool)
        .await
        .map_err(map_unique_violation)?;

    Ok(inserted.len() as u64)
}

fn map_unique_violation(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return DbError::DuplicateKey(db_err.message().to_owned());
        }
    }
    DbError::Sqlx(err)
}
