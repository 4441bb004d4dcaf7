//! Great-circle distance on a spherical earth.

use crate::models::geo::GeoPoint;

/// Mean earth radius used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance in meters. Non-finite inputs yield NaN.
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // min() keeps asin in domain when rounding pushes h a hair above 1
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}
