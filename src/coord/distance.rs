//! Great-circle distance

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::coord::Coordinates;

/// Calculate the distance between two points in meters (Haversine formula)
///
/// Treats the Earth as a sphere of radius [`EARTH_RADIUS_METERS`]. The result
/// is symmetric in its arguments and zero for identical points. NaN inputs
/// propagate to the output.
pub fn haversine_distance(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lng = (p2.lng - p1.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_METERS * c
}
