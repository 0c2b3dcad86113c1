//! Subcommand handlers. Each one is called from `main` with the loaded
//! configuration.

use motodir_core::{load_geo_index, AppConfig};
use motodir_db::PoolConfig;
use motodir_scraper::OverpassClient;

use crate::crawl::{load_state, run_once, PgSink, RunSettings, RunSummary};

/// Crawl the next batch of locations and persist the advanced cursor.
pub(crate) async fn run(config: &AppConfig) -> anyhow::Result<RunSummary> {
    let index = load_geo_index(&config.cities_path)?;

    let pool =
        motodir_db::connect_pool(&config.database_url, PoolConfig::from_app_config(config))
            .await?;
    let applied = motodir_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "applied pending migrations");
    }

    let client = OverpassClient::new(
        &config.overpass_url,
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )?;
    let sink = PgSink::new(pool, config.insert_conflict_policy);

    tracing::info!(
        env = ?config.env,
        overpass = client.endpoint(),
        state = %config.state_path.display(),
        batch = config.cities_per_run,
        locations = index.len(),
        "starting crawl run"
    );

    let summary = run_once(
        &config.state_path,
        &index,
        &client,
        &sink,
        &RunSettings::from_app_config(config),
    )
    .await?;
    Ok(summary)
}

/// Print the persisted crawl state and the next window without crawling.
pub(crate) fn status(config: &AppConfig) -> anyhow::Result<()> {
    let index = load_geo_index(&config.cities_path)?;
    let state = load_state(&config.state_path, index.len());

    let upcoming: Vec<String> = index
        .window(state.current_city_index, config.cities_per_run)
        .map(|(_, location)| location.display_city())
        .collect();

    println!("state file:       {}", config.state_path.display());
    println!("total runs:       {}", state.total_runs);
    println!("total shops added: {}", state.total_shops_added);
    println!(
        "cities completed: {}/{}",
        state.cities_completed.len(),
        index.len()
    );
    println!("next index:       {}", state.current_city_index);
    println!("next batch:       {}", upcoming.join("; "));
    match state.last_run_at {
        Some(at) => println!("last run:         {}", at.to_rfc3339()),
        None => println!("last run:         never"),
    }
    Ok(())
}

/// Ping the store, report the row count, and list the first `limit` rows of
/// the directory in display order.
pub(crate) async fn check_db(config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let pool =
        motodir_db::connect_pool(&config.database_url, PoolConfig::from_app_config(config))
            .await?;
    motodir_db::ping(&pool).await?;
    println!("store reachable");

    let total = motodir_db::count_repair_shops(&pool).await?;
    println!("repair shops in directory: {total}");

    let rows = motodir_db::list_repair_shops(&pool, limit).await?;
    if rows.is_empty() {
        println!("directory is empty");
        return Ok(());
    }
    for row in rows {
        println!(
            "{:<40} {:<28} {}{}",
            row.name,
            row.city,
            row.address,
            if row.is_active { "" } else { " (inactive)" }
        );
    }
    Ok(())
}
