//! Overpass API response types and the raw candidate record.
//!
//! ## Observed shape
//!
//! The interpreter answers `[out:json]` queries with
//! `{"version": .., "generator": .., "osm3s": {..}, "elements": [..]}`.
//! Nodes carry `lat`/`lon` directly. Ways only carry coordinates when the
//! query asks for `out center;`, in which case they have a `center` object.
//! `tags` is absent on untagged elements. When the server hits its own
//! timeout or memory limit it still answers 200 with a partial (often empty)
//! `elements` array and a `remark` string describing the failure.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Tag combinations that mark an element as a motorcycle repair business.
///
/// Each inner slice is a conjunction of `key = value` pairs; an element
/// matches if any one combination matches. Shared by the query builder and
/// the tag-precision gate so both test the same thing.
pub const REPAIR_TAG_COMBINATIONS: [&[(&str, &str)]; 3] = [
    &[("shop", "motorcycle"), ("service:repair", "yes")],
    &[("shop", "motorcycle_repair")],
    &[("craft", "motorcycle_repair")],
];

/// Top-level interpreter response.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
    /// Server-side runtime error notice, if any.
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// A single element as returned by the interpreter.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    /// `node`, `way`, or `relation`.
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl OverpassElement {
    /// Convert to a [`RawCandidate`], using the way center when the element
    /// has no direct coordinates.
    ///
    /// Returns `None` when no usable (finite) coordinate pair exists; such
    /// elements are dropped before filtering and never counted as rejects.
    #[must_use]
    pub fn into_candidate(self) -> Option<RawCandidate> {
        let (latitude, longitude) = match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => (lat, lon),
            (_, _, Some(center)) => (center.lat, center.lon),
            _ => return None,
        };
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        Some(RawCandidate {
            element_type: self.element_type,
            id: self.id,
            latitude,
            longitude,
            tags: self.tags,
        })
    }
}

/// A point of interest as found by the spatial query, prior to filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandidate {
    pub element_type: String,
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub tags: BTreeMap<String, String>,
}

impl RawCandidate {
    /// Value of `key`, treating an empty string the same as an absent tag.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// First present tag among `keys`.
    #[must_use]
    pub fn first_tag(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.tag(k))
    }

    /// `name`, then `name:en`, then the literal `"Unknown"`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_tag(&["name", "name:en"]).unwrap_or("Unknown")
    }

    /// Whether the tags match one of [`REPAIR_TAG_COMBINATIONS`].
    #[must_use]
    pub fn is_tagged_motorcycle_repair(&self) -> bool {
        REPAIR_TAG_COMBINATIONS.iter().any(|combo| {
            combo
                .iter()
                .all(|(key, value)| self.tag(key) == Some(*value))
        })
    }
}
