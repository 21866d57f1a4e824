//! # Geometry
//!
//! Spherical cap membership for location search.
//!
//! Stored coordinates are strings, so every record is parsed on each query.
//! There is no spatial index; the data set is small enough to scan.
//!
//! Radii come in as kilometers and are turned into an angle by dividing by
//! [`EARTH_RADIUS_KM`]. Existing clients depend on that exact constant.

/// Mean equatorial radius used to convert search radii to radians.
pub const EARTH_RADIUS_KM: f64 = 6378.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> Option<Self> {
        let valid = longitude.is_finite()
            && latitude.is_finite()
            && (-180.0..=180.0).contains(&longitude)
            && (-90.0..=90.0).contains(&latitude);

        valid.then_some(Self {
            longitude,
            latitude,
        })
    }

    /// Parses stored text coordinates, longitude first.
    pub fn parse(longitude: &str, latitude: &str) -> Option<Self> {
        let longitude = longitude.trim().parse().ok()?;
        let latitude = latitude.trim().parse().ok()?;

        Self::new(longitude, latitude)
    }

    pub fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Great circle angle between two points in radians (haversine).
pub fn central_angle(a: Point, b: Point) -> f64 {
    let (lat_a, lat_b) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat_b - lat_a;
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * h.sqrt().min(1.0).asin()
}

pub fn distance_km(a: Point, b: Point) -> f64 {
    central_angle(a, b) * EARTH_RADIUS_KM
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCap {
    pub center: Point,
    /// Angular radius in radians.
    pub radius: f64,
}

impl SphericalCap {
    pub fn from_km(center: Point, radius_km: f64) -> Self {
        Self {
            center,
            radius: radius_km / EARTH_RADIUS_KM,
        }
    }

    /// Inclusive at the boundary.
    pub fn contains(&self, point: Point) -> bool {
        central_angle(self.center, point) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(longitude: f64, latitude: f64) -> Point {
        Point::new(longitude, latitude).unwrap()
    }

    #[test]
    fn test_parse_keeps_longitude_first() {
        let parsed = Point::parse("77.0", "12.9").unwrap();

        assert_eq!(parsed.longitude, 77.0);
        assert_eq!(parsed.latitude, 12.9);
        assert_eq!(parsed.coordinates(), [77.0, 12.9]);
    }

    #[test]
    fn test_parse_rejects_garbage_and_out_of_range() {
        assert!(Point::parse("abc", "12.9").is_none());
        assert!(Point::parse("77.0", "").is_none());
        assert!(Point::parse("77.0", "NaN").is_none());
        assert!(Point::parse("181", "0").is_none());
        assert!(Point::parse("0", "-90.5").is_none());
        assert!(Point::parse(" -73.99 ", "40.73").is_some());
    }

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = point(77.0, 12.9);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let km = distance_km(point(0.0, 0.0), point(0.0, 1.0));
        let expected = EARTH_RADIUS_KM * 1f64.to_radians();

        assert!((km - expected).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = point(77.5946, 12.9716);
        let b = point(72.8777, 19.0760);

        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
        // Bangalore to Mumbai, roughly 840 km
        assert!((800.0..900.0).contains(&distance_km(a, b)));
    }

    #[test]
    fn test_cap_contains() {
        let cap = SphericalCap::from_km(point(77.0, 12.9), 5.0);

        assert!(cap.contains(point(77.0, 12.9)));
        assert!(cap.contains(point(77.02, 12.91)));
        assert!(!cap.contains(point(77.1, 12.9)));
        assert!(!cap.contains(point(0.0, 0.0)));
    }

    #[test]
    fn test_cap_radius_in_radians() {
        let cap = SphericalCap::from_km(point(0.0, 0.0), EARTH_RADIUS_KM);
        assert_eq!(cap.radius, 1.0);
    }

    #[test]
    fn test_zero_radius_only_matches_center() {
        let center = point(10.0, 10.0);
        let cap = SphericalCap::from_km(center, 0.0);

        assert!(cap.contains(center));
        assert!(!cap.contains(point(10.0, 10.0001)));
    }

    #[test]
    fn test_cap_crosses_antimeridian() {
        let cap = SphericalCap::from_km(point(179.99, 0.0), 5.0);
        assert!(cap.contains(point(-179.99, 0.0)));
    }
}
