//! Live integration tests for motodir-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness, which needs `DATABASE_URL` pointing at a server it may
//! create databases on. Run with `cargo test -p motodir-db -- --ignored`.

use chrono::{TimeZone, Utc};
use motodir_core::{ConflictPolicy, DirectoryEntry};
use motodir_db::{
    count_repair_shops, insert_repair_shops, keep_alive, list_repair_shops, DbError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_entry(place_id: &str, name: &str) -> DirectoryEntry {
    DirectoryEntry {
        place_id: place_id.to_string(),
        name: name.to_string(),
        address: "12, Via Roma, 00100, Rome".to_string(),
        city: "Rome, Italy".to_string(),
        latitude: 41.903,
        longitude: 12.496,
        phone: "N/A".to_string(),
        website: "N/A".to_string(),
        hours: "N/A".to_string(),
        business_type: "Motorcycle repair shop".to_string(),
        rating: "N/A".to_string(),
        reviews_count: 0,
        distance_from_city_center: 0.03,
        is_city_center: true,
        city_center_lat: 41.9028,
        city_center_lon: 12.4964,
        added_by: "auto_agent".to_string(),
        scraped_at: Utc.with_ymd_and_hms(2025, 3, 2, 2, 0, 0).unwrap(),
    }
}

// ---------------------------------------------------------------------------
// Section 1: Bulk insert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn insert_writes_every_column(pool: sqlx::PgPool) {
    let entry = make_entry("osm_node_1", "MotoFix");
    let added = insert_repair_shops(&pool, &[entry], ConflictPolicy::Ignore)
        .await
        .expect("insert failed");
    assert_eq!(added, 1);

    let rows = list_repair_shops(&pool, 10).await.expect("list failed");
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.place_id, "osm_node_1");
    assert_eq!(row.address, "12, Via Roma, 00100, Rome");
    assert_eq!(row.added_by.as_deref(), Some("auto_agent"));
    assert_eq!(row.is_city_center, Some(true));
    assert!(row.is_active, "is_active should default to true");
    assert!(row.last_verified.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn empty_batch_is_a_no_op(pool: sqlx::PgPool) {
    let added = insert_repair_shops(&pool, &[], ConflictPolicy::Reject)
        .await
        .expect("empty insert should succeed");
    assert_eq!(added, 0);
    assert_eq!(count_repair_shops(&pool).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Section 2: Conflict policy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn ignore_policy_skips_existing_place_ids(pool: sqlx::PgPool) {
    insert_repair_shops(&pool, &[make_entry("osm_node_1", "MotoFix")], ConflictPolicy::Ignore)
        .await
        .expect("first insert failed");

    let batch = [
        make_entry("osm_node_1", "MotoFix"),
        make_entry("osm_way_2", "Officina Moto Nord"),
    ];
    let added = insert_repair_shops(&pool, &batch, ConflictPolicy::Ignore)
        .await
        .expect("second insert failed");

    assert_eq!(added, 1, "only the new place_id counts as added");
    assert_eq!(count_repair_shops(&pool).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn reject_policy_fails_whole_batch_on_duplicate(pool: sqlx::PgPool) {
    insert_repair_shops(&pool, &[make_entry("osm_node_1", "MotoFix")], ConflictPolicy::Reject)
        .await
        .expect("first insert failed");

    let batch = [
        make_entry("osm_way_2", "Officina Moto Nord"),
        make_entry("osm_node_1", "MotoFix"),
    ];
    let result = insert_repair_shops(&pool, &batch, ConflictPolicy::Reject).await;

    assert!(
        matches!(result, Err(DbError::DuplicateKey(_))),
        "expected DuplicateKey, got: {result:?}"
    );
    assert_eq!(count_repair_shops(&pool).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Section 3: Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn list_is_ordered_by_name_and_limited(pool: sqlx::PgPool) {
    let batch = [
        make_entry("osm_node_1", "Zeta Moto"),
        make_entry("osm_node_2", "Alfa Motori"),
        make_entry("osm_node_3", "Moto Bruno"),
    ];
    insert_repair_shops(&pool, &batch, ConflictPolicy::Ignore)
        .await
        .expect("insert failed");

    let rows = list_repair_shops(&pool, 2).await.expect("list failed");
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Alfa Motori", "Moto Bruno"]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn keep_alive_reports_whether_rows_exist(pool: sqlx::PgPool) {
    assert!(!keep_alive(&pool).await.expect("keep_alive failed"));

    insert_repair_shops(&pool, &[make_entry("osm_node_1", "MotoFix")], ConflictPolicy::Ignore)
        .await
        .expect("insert failed");

    assert!(keep_alive(&pool).await.expect("keep_alive failed"));
}
