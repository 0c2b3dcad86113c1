use crate::app_config::{AppConfig, ConflictPolicy, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the real environment so they can
/// be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("MOTODIR_ENV", "development"))?;
    let log_level = or_default("MOTODIR_LOG_LEVEL", "info");
    let cities_path = PathBuf::from(or_default("MOTODIR_CITIES_PATH", "./config/cities.yaml"));
    let state_path = PathBuf::from(or_default("MOTODIR_STATE_PATH", "./agent-state.json"));
    let overpass_url = or_default(
        "MOTODIR_OVERPASS_URL",
        "https://overpass-api.de/api/interpreter",
    );

    let db_max_connections = parse_u32("MOTODIR_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("MOTODIR_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("MOTODIR_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("MOTODIR_SCRAPER_REQUEST_TIMEOUT_SECS", "60")?;
    let scraper_user_agent = or_default(
        "MOTODIR_SCRAPER_USER_AGENT",
        "motodir/0.1 (repair-shop-directory)",
    );
    let scraper_max_retries = parse_u32("MOTODIR_SCRAPER_MAX_RETRIES", "2")?;
    let scraper_retry_backoff_base_secs =
        parse_u64("MOTODIR_SCRAPER_RETRY_BACKOFF_BASE_SECS", "5")?;

    let cities_per_run = parse_usize("MOTODIR_CITIES_PER_RUN", "3")?;
    if cities_per_run == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "MOTODIR_CITIES_PER_RUN".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let inter_city_delay_ms = parse_u64("MOTODIR_INTER_CITY_DELAY_MS", "3000")?;

    let insert_conflict_policy = or_default("MOTODIR_INSERT_CONFLICT_POLICY", "ignore")
        .parse::<ConflictPolicy>()
        .map_err(|reason| ConfigError::InvalidEnvVar {
            var: "MOTODIR_INSERT_CONFLICT_POLICY".to_string(),
            reason,
        })?;

    let agent_cron = or_default("MOTODIR_AGENT_CRON", "0 0 2 * * SUN");

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        cities_path,
        state_path,
        overpass_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        cities_per_run,
        inter_city_delay_ms,
        insert_conflict_policy,
        agent_cron,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MOTODIR_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
