//! Explicit distance edges with great-circle fallback.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::GeoPoint;
use crate::models::NodeId;

/// Travelled distance and time between two locations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceEdge {
    /// Distance in kilometers.
    pub distance_km: f64,
    /// Travel time in minutes.
    pub travel_minutes: f64,
}

impl DistanceEdge {
    /// Creates an edge from distance and travel time.
    pub fn new(distance_km: f64, travel_minutes: f64) -> Self {
        Self {
            distance_km,
            travel_minutes,
        }
    }

    /// Derives an edge from the great-circle distance at a constant speed.
    pub fn great_circle(from: &GeoPoint, to: &GeoPoint, speed_kmh: f64) -> Self {
        let distance_km = from.distance_km(to);
        Self {
            distance_km,
            travel_minutes: distance_km / speed_kmh * 60.0,
        }
    }
}

/// Directed edge overrides between location nodes.
///
/// The location graph is fully connected: any pair without an explicit
/// edge falls back to the great-circle estimate. Explicit edges model road
/// detours and replace the estimate for their direction only.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::{DistanceEdge, DistanceEdges, GeoPoint};
/// use u_dispatch::models::NodeId;
///
/// let mut edges = DistanceEdges::new();
/// edges.insert(NodeId::new(0), NodeId::new(1), DistanceEdge::new(12.0, 30.0));
///
/// let a = GeoPoint::new(0.0, 0.0);
/// let b = GeoPoint::new(0.0, 0.05);
/// let forward = edges.resolve(NodeId::new(0), NodeId::new(1), &a, &b, 40.0);
/// assert_eq!(forward.distance_km, 12.0);
///
/// // The reverse direction has no override and uses the great-circle value.
/// let back = edges.resolve(NodeId::new(1), NodeId::new(0), &b, &a, 40.0);
/// assert!(back.distance_km < 12.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DistanceEdges {
    edges: HashMap<(NodeId, NodeId), DistanceEdge>,
}

impl DistanceEdges {
    /// Creates an empty override table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the edge from `from` to `to`, replacing any previous override.
    pub fn insert(&mut self, from: NodeId, to: NodeId, edge: DistanceEdge) {
        self.edges.insert((from, to), edge);
    }

    /// Sets the same edge in both directions.
    pub fn insert_symmetric(&mut self, a: NodeId, b: NodeId, edge: DistanceEdge) {
        self.insert(a, b, edge);
        self.insert(b, a, edge);
    }

    /// Returns the explicit edge from `from` to `to`, if any.
    pub fn get(&self, from: NodeId, to: NodeId) -> Option<&DistanceEdge> {
        self.edges.get(&(from, to))
    }

    /// Returns the explicit edge if present, otherwise the great-circle estimate.
    pub fn resolve(
        &self,
        from: NodeId,
        to: NodeId,
        from_point: &GeoPoint,
        to_point: &GeoPoint,
        speed_kmh: f64,
    ) -> DistanceEdge {
        match self.get(from, to) {
            Some(edge) => *edge,
            None => DistanceEdge::great_circle(from_point, to_point, speed_kmh),
        }
    }

    /// Number of explicit edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if no explicit edges are stored.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
