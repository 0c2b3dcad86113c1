//! The geo-index: the ordered ring of locations the agent crawls.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One crawl target: a city center the spatial query is anchored on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Location {
    /// `"Name, Country"`, the form stored in the directory's `city` column.
    #[must_use]
    pub fn display_city(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Validated, non-empty, ordered list of locations.
///
/// The order is the crawl order; the crawl cursor indexes into it.
#[derive(Debug, Clone)]
pub struct GeoIndex {
    cities: Vec<Location>,
}

#[derive(Debug, Deserialize)]
struct CitiesFile {
    cities: Vec<Location>,
}

impl GeoIndex {
    /// Build an index from an in-memory list, applying the same validation as
    /// the YAML loader.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the list is empty or any entry is
    /// malformed or duplicated.
    pub fn new(cities: Vec<Location>) -> Result<Self, ConfigError> {
        validate_cities(&cities)?;
        Ok(Self { cities })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Always `false` for a validated index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Location> {
        self.cities.get(index)
    }

    /// The `size` locations starting at `start`, wrapping around the end of the
    /// index. Each item carries its absolute index.
    ///
    /// A `size` larger than the index yields some locations more than once.
    pub fn window(&self, start: usize, size: usize) -> impl Iterator<Item = (usize, &Location)> {
        let len = self.cities.len();
        (0..size).map(move |offset| {
            let idx = (start + offset) % len;
            (idx, &self.cities[idx])
        })
    }
}

/// Load and validate the geo-index from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_geo_index(path: &Path) -> Result<GeoIndex, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CitiesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_geo_index(&content)
}

/// Parse and validate a geo-index from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text does not parse or fails validation.
pub fn parse_geo_index(yaml: &str) -> Result<GeoIndex, ConfigError> {
    let file: CitiesFile = serde_yaml::from_str(yaml)?;
    GeoIndex::new(file.cities)
}

fn validate_cities(cities: &[Location]) -> Result<(), ConfigError> {
    if cities.is_empty() {
        return Err(ConfigError::Validation(
            "geo-index must contain at least one city".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for city in cities {
        if city.name.trim().is_empty() || city.country.trim().is_empty() {
            return Err(ConfigError::Validation(
                "city name and country must be non-empty".to_string(),
            ));
        }

        if !city.latitude.is_finite() || !(-90.0..=90.0).contains(&city.latitude) {
            return Err(ConfigError::Validation(format!(
                "city '{}' has invalid latitude {}",
                city.name, city.latitude
            )));
        }
        if !city.longitude.is_finite() || !(-180.0..=180.0).contains(&city.longitude) {
            return Err(ConfigError::Validation(format!(
                "city '{}' has invalid longitude {}",
                city.name, city.longitude
            )));
        }

        let key = (city.name.to_lowercase(), city.country.to_lowercase());
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate city: '{}'",
                city.display_city()
            )));
        }
    }

    Ok(())
}
