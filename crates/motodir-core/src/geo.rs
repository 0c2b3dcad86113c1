//! Great-circle distance helpers.

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius of the spatial query around each location, and the hard cut-off
/// enforced again by the quality filter.
pub const SEARCH_RADIUS_KM: f64 = 30.0;

/// Accepted shops at or within this distance are flagged `is_city_center`.
pub const CITY_CENTER_RADIUS_KM: f64 = 10.0;

/// Haversine distance in kilometres between two `(lat, lon)` points in degrees.
///
/// NaN inputs propagate to a NaN result; callers guard against non-finite
/// coordinates before calling.
#[must_use]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Round a distance to the hundredths of a kilometre that rows store and
/// logs print.
#[must_use]
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROME: (f64, f64) = (41.9028, 12.4964);
    const MILAN: (f64, f64) = (45.4642, 9.1900);
    const DUBLIN: (f64, f64) = (53.3498, -6.2603);

    #[test]
    fn round_km_keeps_two_decimals() {
        assert!((round_km(12.345_678) - 12.35).abs() < 1e-12);
        assert!((round_km(30.0 + 1e-12) - 30.0).abs() < f64::EPSILON);
        assert!(round_km(f64::NAN).is_nan());
    }

    #[test]
    fn distance_to_self_is_zero() {
        for (lat, lon) in [ROME, MILAN, DUBLIN, (0.0, 0.0), (-33.86, 151.21)] {
            assert!(haversine_km(lat, lon, lat, lon).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [(ROME, MILAN), (MILAN, DUBLIN), (DUBLIN, ROME), ((0.0, 179.9), (0.0, -179.9))];
        for (a, b) in pairs {
            let ab = haversine_km(a.0, a.1, b.0, b.1);
            let ba = haversine_km(b.0, b.1, a.0, a.1);
            assert!((ab - ba).abs() < 1e-9, "asymmetric: {ab} vs {ba}");
        }
    }

    #[test]
    fn rome_to_milan_is_about_477_km() {
        let d = haversine_km(ROME.0, ROME.1, MILAN.0, MILAN.1);
        assert!((d - 477.0).abs() < 2.0, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_km(10.0, 20.0, 11.0, 20.0);
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antimeridian_crossing_takes_the_short_way() {
        let d = haversine_km(0.0, 179.9, 0.0, -179.9);
        assert!(d < 25.0, "got {d}");
    }

    #[test]
    fn nan_propagates() {
        assert!(haversine_km(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }
}
