//! Quality filter: decides which candidates are trustworthy enough to publish.
//!
//! A candidate runs through [`GATES`] in order. The first gate that fails
//! decides the rejection reason; a candidate that clears every gate is
//! accepted with its distance from the location center. Each gate checks a
//! separate concern, so the order only affects which reason is reported.

use std::collections::BTreeMap;
use std::fmt;

use motodir_core::{haversine_km, round_km, Location, CITY_CENTER_RADIUS_KM, SEARCH_RADIUS_KM};

use crate::types::RawCandidate;

/// Names that say nothing about the business when used on their own.
const GENERIC_NAMES: [&str; 6] = ["shop", "garage", "moto", "motor", "service", "repair"];

/// Bicycle words across the crawled languages. Substring match on the
/// lower-cased name.
const BICYCLE_KEYWORDS: [&str; 16] = [
    "bicycle", "bike", "bikes", "vélo", "velo", "fahrrad", "bici", "cykel", "fiets", "pyörä",
    "rower", "bicicleta", "cycle", "cycling", "pushbike", "pedal",
];

/// Tokens that mark a name containing a bicycle word as a motorcycle business
/// anyway ("Motorcycle Center", "MC-Service", "Moto Bike Roma").
const MOTORCYCLE_TOKENS: [&str; 5] = ["motor", "moto", "mc ", "motorcycle", "mc-"];

const ADDRESS_KEYS: [&str; 4] = ["addr:housenumber", "addr:street", "addr:postcode", "addr:city"];
const MIN_ADDRESS_PARTS: usize = 3;

const CLOSURE_KEYS: [&str; 3] = ["disused", "abandoned", "demolished"];

/// Why a candidate was turned away.
///
/// `Display` renders the stable, human-readable reason used in logs and
/// run statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    NoValidName,
    GenericName,
    BicycleKeyword(&'static str),
    NoStreetAddress,
    IncompleteAddress { parts: usize },
    TooFar { distance_km: f64, radius_km: f64 },
    NotTaggedAsRepair,
    SalesOnly,
    InvalidCoordinates,
    Closed,
}

impl Rejection {
    /// Reason category without per-candidate detail, for aggregate tallies.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::NoValidName => "no_valid_name",
            Rejection::GenericName => "generic_name",
            Rejection::BicycleKeyword(_) => "bicycle_keyword",
            Rejection::NoStreetAddress => "no_street_address",
            Rejection::IncompleteAddress { .. } => "incomplete_address",
            Rejection::TooFar { .. } => "too_far",
            Rejection::NotTaggedAsRepair => "not_tagged_as_repair",
            Rejection::SalesOnly => "sales_only",
            Rejection::InvalidCoordinates => "invalid_coordinates",
            Rejection::Closed => "closed",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoValidName => write!(f, "No valid name"),
            Rejection::GenericName => write!(f, "Generic name only"),
            Rejection::BicycleKeyword(keyword) => write!(f, "Bicycle keyword: {keyword}"),
            Rejection::NoStreetAddress => write!(f, "No street address"),
            Rejection::IncompleteAddress { parts } => {
                write!(f, "Incomplete address ({parts}/{MIN_ADDRESS_PARTS}+ parts)")
            }
            Rejection::TooFar {
                distance_km,
                radius_km,
            } => write!(f, "Too far ({distance_km:.2}km > {radius_km}km)"),
            Rejection::NotTaggedAsRepair => {
                write!(f, "Not explicitly tagged as motorcycle repair")
            }
            Rejection::SalesOnly => {
                write!(f, "Motorcycle sales only, no repair service tagged")
            }
            Rejection::InvalidCoordinates => write!(f, "Invalid coordinates"),
            Rejection::Closed => write!(f, "Marked as closed/abandoned"),
        }
    }
}

/// Derived fields of an accepted candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accepted {
    pub distance_km: f64,
    pub is_city_center: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterVerdict {
    Accepted(Accepted),
    Rejected(Rejection),
}

impl FilterVerdict {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, FilterVerdict::Accepted(_))
    }

    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            FilterVerdict::Accepted(_) => None,
            FilterVerdict::Rejected(rejection) => Some(rejection.to_string()),
        }
    }

    #[must_use]
    pub fn distance_km(&self) -> Option<f64> {
        match self {
            FilterVerdict::Accepted(accepted) => Some(accepted.distance_km),
            FilterVerdict::Rejected(_) => None,
        }
    }
}

/// What each gate sees: the candidate, its resolved name, and its distance
/// from the location center.
struct GateInput<'a> {
    candidate: &'a RawCandidate,
    name: &'a str,
    distance_km: f64,
}

type Gate = fn(&GateInput<'_>) -> Result<(), Rejection>;

const GATES: [Gate; 9] = [
    name_validity,
    bicycle_exclusion,
    street_presence,
    address_completeness,
    radius_enforcement,
    tag_precision,
    sales_only_exclusion,
    coordinate_sanity,
    closure_flags,
];

/// Classify one candidate found around `location`.
#[must_use]
pub fn evaluate(candidate: &RawCandidate, location: &Location) -> FilterVerdict {
    let distance_km = haversine_km(
        location.latitude,
        location.longitude,
        candidate.latitude,
        candidate.longitude,
    );
    let input = GateInput {
        candidate,
        name: candidate.display_name(),
        distance_km,
    };

    for gate in GATES {
        if let Err(rejection) = gate(&input) {
            return FilterVerdict::Rejected(rejection);
        }
    }

    FilterVerdict::Accepted(Accepted {
        distance_km,
        is_city_center: distance_km <= CITY_CENTER_RADIUS_KM,
    })
}

/// A rejected candidate, kept for logging and statistics.
#[derive(Debug, Clone)]
pub struct RejectedCandidate {
    pub name: String,
    pub rejection: Rejection,
}

/// Result of screening one location's candidates.
#[derive(Debug, Default)]
pub struct Screened {
    pub approved: Vec<(RawCandidate, Accepted)>,
    pub rejected: Vec<RejectedCandidate>,
}

impl Screened {
    /// Rejection counts keyed by [`Rejection::kind`].
    #[must_use]
    pub fn rejection_tally(&self) -> BTreeMap<&'static str, usize> {
        let mut tally = BTreeMap::new();
        for rejected in &self.rejected {
            *tally.entry(rejected.rejection.kind()).or_insert(0) += 1;
        }
        tally
    }
}

/// Run every candidate through [`evaluate`], splitting approved from rejected.
#[must_use]
pub fn screen_candidates(candidates: Vec<RawCandidate>, location: &Location) -> Screened {
    let mut screened = Screened::default();
    for candidate in candidates {
        match evaluate(&candidate, location) {
            FilterVerdict::Accepted(accepted) => screened.approved.push((candidate, accepted)),
            FilterVerdict::Rejected(rejection) => {
                tracing::debug!(
                    city = %location.name,
                    name = candidate.display_name(),
                    reason = %rejection,
                    "candidate rejected"
                );
                screened.rejected.push(RejectedCandidate {
                    name: candidate.display_name().to_owned(),
                    rejection,
                });
            }
        }
    }
    screened
}

/// Radius check on a precomputed distance, compared at the hundredths of a
/// kilometre that rows store. The boundary itself is inside.
///
/// # Errors
///
/// Returns [`Rejection::TooFar`] when `distance_km`, rounded to hundredths,
/// exceeds `radius_km`.
pub fn check_radius(distance_km: f64, radius_km: f64) -> Result<(), Rejection> {
    if round_km(distance_km) > radius_km {
        return Err(Rejection::TooFar {
            distance_km,
            radius_km,
        });
    }
    Ok(())
}

fn name_validity(input: &GateInput<'_>) -> Result<(), Rejection> {
    let name = input.name.trim();
    if name == "Unknown" || name.chars().count() < 3 {
        return Err(Rejection::NoValidName);
    }
    let lower = name.to_lowercase();
    if GENERIC_NAMES.contains(&lower.as_str()) {
        return Err(Rejection::GenericName);
    }
    Ok(())
}

fn bicycle_exclusion(input: &GateInput<'_>) -> Result<(), Rejection> {
    let lower = input.name.to_lowercase();
    let Some(&keyword) = BICYCLE_KEYWORDS.iter().find(|kw| lower.contains(**kw)) else {
        return Ok(());
    };
    if MOTORCYCLE_TOKENS.iter().any(|token| lower.contains(*token)) {
        return Ok(());
    }
    Err(Rejection::BicycleKeyword(keyword))
}

fn street_presence(input: &GateInput<'_>) -> Result<(), Rejection> {
    match input.candidate.tag("addr:street") {
        Some(street) if street.chars().count() > 2 => Ok(()),
        _ => Err(Rejection::NoStreetAddress),
    }
}

fn address_completeness(input: &GateInput<'_>) -> Result<(), Rejection> {
    let parts = ADDRESS_KEYS
        .iter()
        .filter(|key| input.candidate.tag(key).is_some())
        .count();
    if parts < MIN_ADDRESS_PARTS {
        return Err(Rejection::IncompleteAddress { parts });
    }
    Ok(())
}

fn radius_enforcement(input: &GateInput<'_>) -> Result<(), Rejection> {
    check_radius(input.distance_km, SEARCH_RADIUS_KM)
}

fn tag_precision(input: &GateInput<'_>) -> Result<(), Rejection> {
    if input.candidate.is_tagged_motorcycle_repair() {
        Ok(())
    } else {
        Err(Rejection::NotTaggedAsRepair)
    }
}

fn sales_only_exclusion(input: &GateInput<'_>) -> Result<(), Rejection> {
    let candidate = input.candidate;
    if candidate.tag("shop") == Some("motorcycle") && candidate.tag("service:repair").is_none() {
        return Err(Rejection::SalesOnly);
    }
    Ok(())
}

fn coordinate_sanity(input: &GateInput<'_>) -> Result<(), Rejection> {
    let candidate = input.candidate;
    if candidate.latitude == 0.0 && candidate.longitude == 0.0 {
        return Err(Rejection::InvalidCoordinates);
    }
    Ok(())
}

fn closure_flags(input: &GateInput<'_>) -> Result<(), Rejection> {
    if CLOSURE_KEYS
        .iter()
        .any(|key| input.candidate.tag(key) == Some("yes"))
    {
        return Err(Rejection::Closed);
    }
    Ok(())
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
