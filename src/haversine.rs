//! Great-circle distances between stops.
//!
//! Straight-line distance ignores roads, which is fine for ordering a handful
//! of stops within a city and estimating a padded travel time.

use crate::model::Coordinate;
use crate::traits::DistanceProvider;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Total length of an open path visiting `points` in order.
pub fn path_length_km<D: DistanceProvider>(provider: &D, points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| provider.distance_km(pair[0], pair[1]))
        .sum()
}

/// Haversine-based distance provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineDistance;

impl DistanceProvider for HaversineDistance {
    fn distance_km(&self, from: Coordinate, to: Coordinate) -> f64 {
        haversine_km(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let p = Coordinate::new(21.0285, 105.8542);
        assert!(haversine_km(p, p) < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Hanoi (21.03, 105.85) to Ho Chi Minh City (10.82, 106.63)
        // Actual distance ~1,140 km
        let dist = haversine_km(Coordinate::new(21.03, 105.85), Coordinate::new(10.82, 106.63));
        assert!(dist > 1100.0 && dist < 1180.0, "Hanoi to HCMC should be ~1140km, got {}", dist);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let dist = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((dist - 111.19).abs() < 0.1, "got {}", dist);
    }

    #[test]
    fn test_matrix_diagonal_is_zero_and_symmetric() {
        let locations = vec![
            Coordinate::new(21.02, 105.85),
            Coordinate::new(21.03, 105.84),
            Coordinate::new(21.04, 105.83),
        ];
        let matrix = HaversineDistance.matrix_for(&locations);

        for i in 0..locations.len() {
            assert_eq!(matrix[i][i], 0.0, "Diagonal should be zero");
        }
        assert_eq!(matrix[0][1], matrix[1][0], "Matrix should be symmetric");
    }

    #[test]
    fn test_path_length_is_open() {
        let points = [Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)];
        let open = path_length_km(&HaversineDistance, &points);
        assert!((open - haversine_km(points[0], points[1])).abs() < 1e-9);
        assert_eq!(path_length_km(&HaversineDistance, &points[..1]), 0.0);
    }
}
