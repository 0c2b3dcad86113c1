//! Normalization from accepted candidates to [`motodir_core::DirectoryEntry`].

use chrono::{DateTime, Utc};
use motodir_core::{round_km, DirectoryEntry, Location};

use crate::filter::Accepted;
use crate::types::RawCandidate;

/// Provenance stamp for rows written by the crawl agent.
pub const ADDED_BY: &str = "auto_agent";
pub const BUSINESS_TYPE: &str = "Motorcycle repair shop";
/// Placeholder for contact fields and rating the source does not provide.
pub const NOT_AVAILABLE: &str = "N/A";
pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

const ADDRESS_PARTS: [&str; 5] = [
    "addr:housenumber",
    "addr:street",
    "addr:postcode",
    "addr:city",
    "addr:country",
];

/// Stable directory key for an upstream element: `osm_<type>_<id>`.
#[must_use]
pub fn place_id_for(element_type: &str, id: i64) -> String {
    format!("osm_{element_type}_{id}")
}

/// Human-readable address from the `addr:*` tags, in house number, street,
/// postcode, city, country order.
#[must_use]
pub fn build_address(candidate: &RawCandidate) -> String {
    let parts: Vec<&str> = ADDRESS_PARTS
        .iter()
        .filter_map(|key| candidate.tag(key))
        .collect();
    if parts.is_empty() {
        ADDRESS_NOT_AVAILABLE.to_string()
    } else {
        parts.join(", ")
    }
}

/// Map an accepted candidate found around `location` to its directory row.
///
/// Rating and review count are unknown at ingestion time and get neutral
/// values.
#[must_use]
pub fn normalize_candidate(
    candidate: &RawCandidate,
    accepted: &Accepted,
    location: &Location,
    scraped_at: DateTime<Utc>,
) -> DirectoryEntry {
    let or_na = |keys: &[&str]| -> String {
        candidate
            .first_tag(keys)
            .unwrap_or(NOT_AVAILABLE)
            .to_string()
    };

    DirectoryEntry {
        place_id: place_id_for(&candidate.element_type, candidate.id),
        name: candidate.display_name().to_string(),
        address: build_address(candidate),
        city: location.display_city(),
        latitude: candidate.latitude,
        longitude: candidate.longitude,
        phone: or_na(&["phone", "contact:phone"]),
        website: or_na(&["website", "contact:website"]),
        hours: or_na(&["opening_hours"]),
        business_type: BUSINESS_TYPE.to_string(),
        rating: NOT_AVAILABLE.to_string(),
        reviews_count: 0,
        distance_from_city_center: round_km(accepted.distance_km),
        is_city_center: accepted.is_city_center,
        city_center_lat: location.latitude,
        city_center_lon: location.longitude,
        added_by: ADDED_BY.to_string(),
        scraped_at,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
