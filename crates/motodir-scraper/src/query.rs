//! Overpass QL query construction.

use std::fmt::Write as _;

use motodir_core::Location;

use crate::types::REPAIR_TAG_COMBINATIONS;

/// Server-side evaluation budget requested in the query header.
pub const SERVICE_TIMEOUT_SECS: u32 = 25;

const GEOMETRIES: [&str; 2] = ["node", "way"];

/// Build the spatial query for one location.
///
/// Selects nodes and ways matching any of [`REPAIR_TAG_COMBINATIONS`] within
/// `radius_km` of the location center. Ways are returned with their computed
/// `center` so every element carries a coordinate pair.
#[must_use]
pub fn build_overpass_query(location: &Location, radius_km: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let radius_m = (radius_km * 1000.0).round() as u64;
    let around = format!(
        "(around:{radius_m},{},{})",
        location.latitude, location.longitude
    );

    let mut query = format!("[out:json][timeout:{SERVICE_TIMEOUT_SECS}];\n(\n");
    for combo in REPAIR_TAG_COMBINATIONS {
        let filters: String = combo
            .iter()
            .map(|(key, value)| format!("[\"{key}\"=\"{value}\"]"))
            .collect();
        for geometry in GEOMETRIES {
            let _ = writeln!(query, "  {geometry}{filters}{around};");
        }
    }
    query.push_str(");\nout center;\n");
    query
}
