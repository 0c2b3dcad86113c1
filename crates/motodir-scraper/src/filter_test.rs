use motodir_core::EARTH_RADIUS_KM;

use super::*;

fn rome() -> Location {
    Location {
        name: "Rome".to_string(),
        country: "Italy".to_string(),
        latitude: 41.9028,
        longitude: 12.4964,
    }
}

/// Degrees of latitude spanning `km` along a meridian.
fn lat_offset(km: f64) -> f64 {
    (km / EARTH_RADIUS_KM).to_degrees()
}

fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// A candidate that clears every gate when placed at the Rome center.
fn good_tags() -> Vec<(&'static str, &'static str)> {
    vec![
        ("shop", "motorcycle_repair"),
        ("name", "MotoFix"),
        ("addr:street", "Via Roma"),
        ("addr:housenumber", "12"),
        ("addr:postcode", "00100"),
        ("addr:city", "Rome"),
    ]
}

fn candidate_at(lat: f64, lon: f64, pairs: &[(&str, &str)]) -> RawCandidate {
    RawCandidate {
        element_type: "node".to_string(),
        id: 1001,
        latitude: lat,
        longitude: lon,
        tags: tags(pairs),
    }
}

fn candidate(pairs: &[(&str, &str)]) -> RawCandidate {
    let center = rome();
    candidate_at(center.latitude, center.longitude, pairs)
}

/// `good_tags` with `key` replaced (or added) by `value`.
fn with(key: &'static str, value: &'static str) -> Vec<(&'static str, &'static str)> {
    let mut pairs: Vec<_> = good_tags().into_iter().filter(|(k, _)| *k != key).collect();
    pairs.push((key, value));
    pairs
}

/// `good_tags` with `key` removed.
fn without(key: &str) -> Vec<(&'static str, &'static str)> {
    good_tags().into_iter().filter(|(k, _)| *k != key).collect()
}

fn reason(c: &RawCandidate) -> String {
    evaluate(c, &rome())
        .reason()
        .unwrap_or_else(|| "accepted".to_string())
}

// -----------------------------------------------------------------------
// Acceptance
// -----------------------------------------------------------------------

#[test]
fn well_formed_candidate_at_center_is_accepted_as_city_center() {
    let verdict = evaluate(&candidate(&good_tags()), &rome());
    assert!(verdict.is_pass(), "got {verdict:?}");
    let FilterVerdict::Accepted(accepted) = verdict else {
        unreachable!()
    };
    assert!(accepted.distance_km.abs() < 1e-9);
    assert!(accepted.is_city_center);
}

#[test]
fn city_center_flag_uses_ten_km_threshold() {
    let center = rome();
    let near = candidate_at(center.latitude + lat_offset(9.5), center.longitude, &good_tags());
    let far = candidate_at(center.latitude + lat_offset(10.5), center.longitude, &good_tags());

    assert!(matches!(
        evaluate(&near, &center),
        FilterVerdict::Accepted(Accepted { is_city_center: true, .. })
    ));
    assert!(matches!(
        evaluate(&far, &center),
        FilterVerdict::Accepted(Accepted { is_city_center: false, .. })
    ));
}

#[test]
fn explicit_repair_flag_on_motorcycle_shop_is_accepted() {
    let pairs = [
        ("shop", "motorcycle"),
        ("service:repair", "yes"),
        ("name", "Ducati Roma Service"),
        ("addr:street", "Via Tiburtina"),
        ("addr:housenumber", "100"),
        ("addr:postcode", "00159"),
    ];
    assert_eq!(reason(&candidate(&pairs)), "accepted");
}

// -----------------------------------------------------------------------
// Gate 1: name validity
// -----------------------------------------------------------------------

#[test]
fn missing_name_is_rejected() {
    assert_eq!(reason(&candidate(&without("name"))), "No valid name");
}

#[test]
fn english_name_is_used_when_local_name_missing() {
    let mut pairs = without("name");
    pairs.push(("name:en", "Rome Moto Works"));
    assert_eq!(reason(&candidate(&pairs)), "accepted");
}

#[test]
fn short_and_placeholder_names_are_rejected() {
    assert_eq!(reason(&candidate(&with("name", "AB"))), "No valid name");
    assert_eq!(reason(&candidate(&with("name", "Unknown"))), "No valid name");
}

#[test]
fn blank_or_padded_short_names_are_rejected() {
    for name in ["   ", "\t", " AB ", "  Unknown  "] {
        assert_eq!(
            reason(&candidate(&with("name", name))),
            "No valid name",
            "name {name:?}"
        );
    }
    assert_eq!(reason(&candidate(&with("name", "  MotoFix  "))), "accepted");
}

#[test]
fn lone_generic_word_is_rejected() {
    for generic in ["Garage", "shop", "MOTO", "Motor", "Service", "repair"] {
        assert_eq!(
            reason(&candidate(&with("name", generic))),
            "Generic name only",
            "name {generic}"
        );
    }
}

#[test]
fn generic_word_inside_longer_name_is_fine() {
    assert_eq!(reason(&candidate(&with("name", "Garage Rossi"))), "accepted");
}

// -----------------------------------------------------------------------
// Gate 2: bicycle exclusion
// -----------------------------------------------------------------------

#[test]
fn bicycle_keyword_without_motor_token_is_rejected() {
    assert_eq!(
        reason(&candidate(&with("name", "City Bicycle Repair"))),
        "Bicycle keyword: bicycle"
    );
    assert_eq!(
        reason(&candidate(&with("name", "Fahrradwerkstatt Mitte"))),
        "Bicycle keyword: fahrrad"
    );
    assert_eq!(
        reason(&candidate(&with("name", "Atelier Vélo"))),
        "Bicycle keyword: vélo"
    );
}

#[test]
fn bicycle_keyword_with_motor_token_passes() {
    assert_eq!(
        reason(&candidate(&with("name", "Bicycle & Motor Service"))),
        "accepted"
    );
    assert_eq!(
        reason(&candidate(&with("name", "Motorcycle Clinic"))),
        "accepted"
    );
    assert_eq!(reason(&candidate(&with("name", "MC-Bike Roma"))), "accepted");
}

#[test]
fn keyword_substring_match_can_over_reject() {
    // "Pedalino" contains "pedal"; kept as a substring match.
    assert_eq!(
        reason(&candidate(&with("name", "Officina Pedalino"))),
        "Bicycle keyword: pedal"
    );
}

// -----------------------------------------------------------------------
// Gates 3-4: street and address completeness
// -----------------------------------------------------------------------

#[test]
fn missing_street_is_rejected_whatever_the_other_fields() {
    let center = rome();
    let far_lat = center.latitude + lat_offset(80.0);
    let variants: Vec<RawCandidate> = vec![
        candidate(&without("addr:street")),
        candidate_at(far_lat, center.longitude, &without("addr:street")),
        candidate(&[("shop", "bicycle"), ("name", "Officina Rossi")]),
        candidate(&[
            ("craft", "motorcycle_repair"),
            ("name", "Officina Rossi"),
            ("disused", "yes"),
            ("addr:housenumber", "3"),
            ("addr:postcode", "00100"),
            ("addr:city", "Rome"),
        ]),
        candidate_at(0.0, 0.0, &without("addr:street")),
    ];
    for c in &variants {
        assert_eq!(reason(c), "No street address", "candidate {c:?}");
    }
}

#[test]
fn two_letter_street_is_rejected() {
    assert_eq!(
        reason(&candidate(&with("addr:street", "Via"))),
        "accepted",
        "three characters is enough"
    );
    assert_eq!(
        reason(&candidate(&with("addr:street", "XY"))),
        "No street address"
    );
}

#[test]
fn incomplete_address_reports_part_count() {
    let pairs = [
        ("shop", "motorcycle_repair"),
        ("name", "MotoFix"),
        ("addr:street", "Via Roma"),
        ("addr:city", "Rome"),
    ];
    assert_eq!(
        reason(&candidate(&pairs)),
        "Incomplete address (2/3+ parts)"
    );
}

#[test]
fn three_of_four_address_parts_suffice() {
    assert_eq!(reason(&candidate(&without("addr:postcode"))), "accepted");
}

// -----------------------------------------------------------------------
// Gate 5: radius
// -----------------------------------------------------------------------

#[test]
fn radius_boundary_is_inclusive() {
    assert!(check_radius(30.0, SEARCH_RADIUS_KM).is_ok());
    assert!(check_radius(SEARCH_RADIUS_KM + 1e-12, SEARCH_RADIUS_KM).is_ok());
    let err = check_radius(30.01, SEARCH_RADIUS_KM).unwrap_err();
    assert_eq!(err.to_string(), "Too far (30.01km > 30km)");
}

#[test]
fn candidate_just_inside_radius_is_accepted_just_outside_is_rejected() {
    let center = rome();
    let inside = candidate_at(
        center.latitude + lat_offset(29.99),
        center.longitude,
        &good_tags(),
    );
    let outside = candidate_at(
        center.latitude + lat_offset(30.01),
        center.longitude,
        &good_tags(),
    );
    assert_eq!(reason(&inside), "accepted");
    assert_eq!(reason(&outside), "Too far (30.01km > 30km)");
}

#[test]
fn candidate_exactly_on_radius_is_accepted() {
    let center = rome();
    let on_edge = candidate_at(
        center.latitude + lat_offset(30.0),
        center.longitude,
        &good_tags(),
    );
    let FilterVerdict::Accepted(accepted) = evaluate(&on_edge, &center) else {
        panic!("candidate on the 30 km boundary should be accepted");
    };
    assert!((accepted.distance_km - 30.0).abs() < 1e-6);
    assert!(!accepted.is_city_center);
}

// -----------------------------------------------------------------------
// Gates 6-7: tag precision and sales-only
// -----------------------------------------------------------------------

#[test]
fn motorcycle_shop_with_repair_no_is_not_tagged_as_repair() {
    let mut pairs = with("shop", "motorcycle");
    pairs.push(("service:repair", "no"));
    assert_eq!(
        reason(&candidate(&pairs)),
        "Not explicitly tagged as motorcycle repair"
    );
}

#[test]
fn unrelated_shop_type_is_not_tagged_as_repair() {
    assert_eq!(
        reason(&candidate(&with("shop", "car_repair"))),
        "Not explicitly tagged as motorcycle repair"
    );
}

#[test]
fn motorcycle_dealer_without_repair_flag_is_sales_only() {
    // craft tag satisfies tag precision; the bare shop=motorcycle marks a dealer.
    let mut pairs = with("shop", "motorcycle");
    pairs.push(("craft", "motorcycle_repair"));
    assert_eq!(
        reason(&candidate(&pairs)),
        "Motorcycle sales only, no repair service tagged"
    );
}

// -----------------------------------------------------------------------
// Gates 8-9: coordinates and closure
// -----------------------------------------------------------------------

#[test]
fn null_island_is_rejected() {
    let gulf = Location {
        name: "Null".to_string(),
        country: "Atlantic".to_string(),
        latitude: 0.0,
        longitude: 0.05,
    };
    let at_origin = candidate_at(0.0, 0.0, &good_tags());
    let on_equator = candidate_at(0.0, 0.1, &good_tags());
    assert_eq!(
        evaluate(&at_origin, &gulf).reason().as_deref(),
        Some("Invalid coordinates")
    );
    assert!(evaluate(&on_equator, &gulf).is_pass());
}

#[test]
fn closure_flags_are_rejected() {
    for key in ["disused", "abandoned", "demolished"] {
        let mut pairs = good_tags();
        pairs.push((key, "yes"));
        assert_eq!(
            reason(&candidate(&pairs)),
            "Marked as closed/abandoned",
            "flag {key}"
        );
    }
    let mut pairs = good_tags();
    pairs.push(("disused", "no"));
    assert_eq!(reason(&candidate(&pairs)), "accepted");
}

// -----------------------------------------------------------------------
// Ordering and screening
// -----------------------------------------------------------------------

#[test]
fn first_failing_gate_decides_the_reason() {
    let center = rome();
    // No street AND too far AND closed: street comes first.
    let mut pairs = without("addr:street");
    pairs.push(("abandoned", "yes"));
    let c = candidate_at(center.latitude + lat_offset(50.0), center.longitude, &pairs);
    assert_eq!(reason(&c), "No street address");
}

#[test]
fn screen_candidates_splits_and_tallies() {
    let center = rome();
    let candidates = vec![
        candidate(&good_tags()),
        candidate(&with("name", "Bike Shop Roma")),
        candidate(&without("addr:street")),
        candidate(&without("name")),
        candidate_at(center.latitude + lat_offset(45.0), center.longitude, &good_tags()),
    ];

    let screened = screen_candidates(candidates, &center);
    assert_eq!(screened.approved.len(), 1);
    assert_eq!(screened.rejected.len(), 4);
    assert_eq!(screened.rejected[0].name, "Bike Shop Roma");
    assert_eq!(screened.rejected[2].name, "Unknown");

    let tally = screened.rejection_tally();
    assert_eq!(tally.get("bicycle_keyword"), Some(&1));
    assert_eq!(tally.get("no_street_address"), Some(&1));
    assert_eq!(tally.get("no_valid_name"), Some(&1));
    assert_eq!(tally.get("too_far"), Some(&1));
}
