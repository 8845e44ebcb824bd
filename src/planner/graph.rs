//! Weighted directed graph over location nodes.

use std::collections::HashMap;

use crate::distance::{DistanceEdge, DistanceEdges};
use crate::models::{LocationNode, LocationRegistry, NodeId};

/// Which edge attribute becomes the graph weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMetric {
    /// Distance in kilometers.
    DistanceKm,
    /// Travel time in minutes.
    TravelMinutes,
}

impl EdgeMetric {
    /// Extracts this metric from an edge.
    pub fn weight(self, edge: &DistanceEdge) -> f64 {
        match self {
            EdgeMetric::DistanceKm => edge.distance_km,
            EdgeMetric::TravelMinutes => edge.travel_minutes,
        }
    }
}

/// Adjacency mapping from node to `(neighbor, weight)` pairs.
///
/// Weights must be non-negative. Neighbors keep their insertion order.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::NodeId;
/// use u_dispatch::planner::Graph;
///
/// let mut g = Graph::new();
/// g.add_undirected(NodeId::new(0), NodeId::new(1), 5.0);
/// assert_eq!(g.neighbors(NodeId::new(1)), &[(NodeId::new(0), 5.0)]);
/// assert_eq!(g.edge_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: HashMap<NodeId, Vec<(NodeId, f64)>>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directed edge.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) {
        self.adjacency.entry(from).or_default().push((to, weight));
        self.adjacency.entry(to).or_default();
    }

    /// Adds the same weight in both directions.
    pub fn add_undirected(&mut self, a: NodeId, b: NodeId, weight: f64) {
        self.add_edge(a, b, weight);
        self.add_edge(b, a, weight);
    }

    /// Outgoing edges of `node`; empty for unknown nodes.
    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, f64)] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if the node appears in the graph.
    pub fn contains(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Iterates over all nodes in arbitrary order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Iterates over all directed edges as `(from, to, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(&from, out)| out.iter().map(move |&(to, w)| (from, to, w)))
    }

    /// Builds the complete directed graph over every registered node.
    ///
    /// Pairs with an explicit edge use it; all others use the great-circle
    /// estimate at `speed_kmh`.
    pub fn from_locations(
        registry: &LocationRegistry,
        overrides: &DistanceEdges,
        metric: EdgeMetric,
        speed_kmh: f64,
    ) -> Self {
        Self::from_nodes(registry.nodes(), overrides, metric, speed_kmh)
    }

    /// Builds the complete directed graph over `nodes` only.
    pub fn from_nodes(
        nodes: &[LocationNode],
        overrides: &DistanceEdges,
        metric: EdgeMetric,
        speed_kmh: f64,
    ) -> Self {
        let mut graph = Self::new();
        for from in nodes {
            for to in nodes {
                if from.id() == to.id() {
                    continue;
                }
                let edge =
                    overrides.resolve(from.id(), to.id(), &from.point(), &to.point(), speed_kmh);
                graph.add_edge(from.id(), to.id(), metric.weight(&edge));
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::GeoPoint;
    use crate::models::NodeKind;

    #[test]
    fn test_add_edge_registers_both_nodes() {
        let mut g = Graph::new();
        g.add_edge(NodeId::new(1), NodeId::new(2), 3.0);
        assert!(g.contains(NodeId::new(2)));
        assert!(g.neighbors(NodeId::new(2)).is_empty());
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn test_unknown_node_has_no_neighbors() {
        let g = Graph::new();
        assert!(g.neighbors(NodeId::new(42)).is_empty());
    }

    #[test]
    fn test_from_locations_complete() {
        let mut reg = LocationRegistry::new();
        let a = reg.ensure(NodeKind::Depot, 1, GeoPoint::new(0.0, 0.0));
        let b = reg.ensure(NodeKind::Producer, 1, GeoPoint::new(0.0, 1.0));
        let c = reg.ensure(NodeKind::Destination, 1, GeoPoint::new(1.0, 1.0));

        let mut overrides = DistanceEdges::new();
        overrides.insert(a, b, DistanceEdge::new(200.0, 240.0));

        let g = Graph::from_locations(&reg, &overrides, EdgeMetric::DistanceKm, 40.0);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 6);

        let ab = g.neighbors(a).iter().find(|(n, _)| *n == b).map(|e| e.1);
        assert_eq!(ab, Some(200.0));
        let ba = g.neighbors(b).iter().find(|(n, _)| *n == a).map(|e| e.1);
        assert!((ba.expect("edge") - 111.19).abs() < 0.01);
        assert!(g.neighbors(c).iter().all(|(n, _)| *n != c));
    }

    #[test]
    fn test_from_nodes_subset() {
        let mut reg = LocationRegistry::new();
        let a = reg.ensure(NodeKind::Depot, 1, GeoPoint::new(0.0, 0.0));
        reg.ensure(NodeKind::Producer, 1, GeoPoint::new(0.0, 1.0));
        let c = reg.ensure(NodeKind::Destination, 1, GeoPoint::new(1.0, 1.0));
        let subset: Vec<LocationNode> = [a, c]
            .iter()
            .filter_map(|&id| reg.get(id).cloned())
            .collect();

        let g = Graph::from_nodes(&subset, &DistanceEdges::new(), EdgeMetric::DistanceKm, 40.0);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 2);
        assert!(g.contains(a) && g.contains(c));
    }

    #[test]
    fn test_from_locations_minutes() {
        let mut reg = LocationRegistry::new();
        let a = reg.ensure(NodeKind::Depot, 1, GeoPoint::new(0.0, 0.0));
        reg.ensure(NodeKind::Producer, 1, GeoPoint::new(0.0, 1.0));
        let g = Graph::from_locations(&reg, &DistanceEdges::new(), EdgeMetric::TravelMinutes, 40.0);
        let (_, minutes) = g.neighbors(a)[0];
        assert!((minutes - 111.195 / 40.0 * 60.0).abs() < 0.1);
    }
}
