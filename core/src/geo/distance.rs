use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the spherical approximation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn as_pair(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Great-circle distance between two positions using the haversine formula.
///
/// Inputs are not range-checked; NaN or out-of-range degrees yield a
/// meaningless but non-panicking result.
pub fn distance_km(position: &Position, destination: &Position) -> f64 {
    let lat1 = position.latitude.to_radians();
    let lat2 = destination.latitude.to_radians();
    let delta_lat = (destination.latitude - position.latitude).to_radians();
    let delta_lon = (destination.longitude - position.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        let p = Position::new(51.4468853, 5.4848275);
        assert_eq!(distance_km(&p, &p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(1.0, 0.0);
        let d = distance_km(&a, &b);
        assert!((d - 111.19).abs() < 0.05, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Position::new(52.0, 7.0);
        let b = Position::new(51.4468853, 5.4848275);
        assert!((distance_km(&a, &b) - distance_km(&b, &a)).abs() < 1e-9);
        // Roughly 120 km between the two test points.
        assert!((distance_km(&a, &b) - 120.0).abs() < 5.0);
    }

    #[test]
    fn antipodes_do_not_overflow_asin() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(0.0, 180.0);
        let d = distance_km(&a, &b);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn nan_input_propagates() {
        let a = Position::new(f64::NAN, 0.0);
        let b = Position::new(0.0, 0.0);
        assert!(distance_km(&a, &b).is_nan());
    }
}
