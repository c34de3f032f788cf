use crate::models::{BoundingBox, Coordinates};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude
const KM_PER_DEGREE: f64 = 111.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// Spherical approximation, good enough at city scale. NaN in any input
/// yields NaN.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance between two coordinate pairs
#[inline]
pub fn distance_between(from: &Coordinates, to: &Coordinates) -> f64 {
    haversine_distance(from.lat, from.lon, to.lat, to.lon)
}

/// Degree box around the import centre, used as the Overpass `(s,w,n,e)` filter
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;
    let lon_delta = radius_km / (KM_PER_DEGREE * lat.to_radians().cos().abs());

    BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::HaversineDistance;

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london_lat = 51.5074;
        let london_lon = -0.1278;
        let paris_lat = 48.8566;
        let paris_lon = 2.3522;

        let distance = haversine_distance(london_lat, london_lon, paris_lat, paris_lon);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine_distance(9.9252, 78.1198, 9.9252, 78.1198), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let there = haversine_distance(9.93, 78.12, 9.91, 78.10);
        let back = haversine_distance(9.91, 78.10, 9.93, 78.12);
        assert_eq!(there, back);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(haversine_distance(f64::NAN, 78.12, 9.91, 78.10).is_nan());
        assert!(haversine_distance(9.93, 78.12, 9.91, f64::NAN).is_nan());
    }

    #[test]
    fn test_monotonic_with_separation() {
        let near = haversine_distance(9.92, 78.11, 9.93, 78.11);
        let mid = haversine_distance(9.92, 78.11, 9.95, 78.11);
        let far = haversine_distance(9.92, 78.11, 10.02, 78.11);
        assert!(near < mid && mid < far);
    }

    #[test]
    fn test_agrees_with_geo_crate() {
        let a = Coordinates::new(9.93, 78.12);
        let b = Coordinates::new(9.91, 78.10);

        let ours = distance_between(&a, &b);
        let theirs_km = geo::Point::from(a).haversine_distance(&geo::Point::from(b)) / 1000.0;

        // geo uses a slightly larger mean radius (6371.0088 km)
        assert!((ours - theirs_km).abs() < 0.001, "{} vs {}", ours, theirs_km);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = calculate_bounding_box(40.7128, -74.0060, 10.0);

        assert!(bbox.min_lat < 40.7128);
        assert!(bbox.max_lat > 40.7128);
        assert!(bbox.min_lon < -74.0060);
        assert!(bbox.max_lon > -74.0060);

        // Check approximate size (20km / 111km per degree = ~0.18 degrees)
        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.18).abs() < 0.02, "Lat span should be ~0.18 degrees");
    }
}
