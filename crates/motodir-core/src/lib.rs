pub mod app_config;
pub mod cities;
pub mod config;
pub mod crawl_state;
pub mod entry;
pub mod geo;

pub use app_config::{AppConfig, ConflictPolicy, Environment};
pub use cities::{load_geo_index, parse_geo_index, GeoIndex, Location};
pub use config::{load_app_config, load_app_config_from_env};
pub use crawl_state::CrawlState;
pub use entry::DirectoryEntry;
pub use geo::{haversine_km, round_km, CITY_CENTER_RADIUS_KM, EARTH_RADIUS_KM, SEARCH_RADIUS_KM};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read geo-index file {path}: {source}")]
    CitiesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse geo-index file: {0}")]
    CitiesFileParse(#[from] serde_yaml::Error),

    #[error("geo-index validation failed: {0}")]
    Validation(String),
}
