//! Great-circle distance and explicit distance edges.
//!
//! Provides the haversine distance used everywhere a straight-line estimate
//! is needed, plus a table of explicit edges that override it.

mod edges;
mod haversine;

pub use edges::{DistanceEdge, DistanceEdges};
pub use haversine::{haversine_km, GeoPoint, EARTH_RADIUS_KM};
