pub mod distance;

pub use distance::{distance_km, Position, EARTH_RADIUS_KM};
