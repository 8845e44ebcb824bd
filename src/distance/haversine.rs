//! Haversine great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::GeoPoint;
///
/// let p = GeoPoint::new(52.52, 13.405);
/// assert_eq!(p.lat(), 52.52);
/// assert_eq!(p.lon(), 13.405);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude in degrees.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to another point in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Great-circle distance between two coordinates in kilometers.
///
/// Uses the haversine formula on a spherical Earth of radius
/// [`EARTH_RADIUS_KM`]. Identical points yield exactly zero.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::haversine_km;
///
/// assert_eq!(haversine_km(10.0, 20.0, 10.0, 20.0), 0.0);
/// // One degree of latitude is roughly 111.2 km.
/// let d = haversine_km(0.0, 0.0, 1.0, 0.0);
/// assert!((d - 111.19).abs() < 0.01);
/// ```
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
