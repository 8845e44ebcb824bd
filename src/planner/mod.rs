//! Point-to-point shortest paths between location nodes.
//!
//! - [`dijkstra`]: uniform-cost search, O((V + E) log V)
//! - [`astar`]: great-circle guided search with the same optimal cost
//!
//! Both run on a [`Graph`] with non-negative weights and return `None`
//! when the target is unreachable. [`shortest_path`] dispatches on an
//! [`Algorithm`] tag, which is also what a route records.

mod astar;
mod dijkstra;
mod frontier;
mod graph;
mod search;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::distance::GeoPoint;
use crate::models::NodeId;

pub use astar::{astar, astar_with_speed, GreatCircleHeuristic};
pub use dijkstra::dijkstra;
pub use graph::{EdgeMetric, Graph};

/// Planning speed in km/h used to turn great-circle distance into minutes.
pub const PLANNING_SPEED_KMH: f64 = 40.0;

/// Coordinate lookup for graph nodes.
pub type Coordinates = HashMap<NodeId, GeoPoint>;

/// Path-planning method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    /// Uniform-cost search.
    Dijkstra,
    /// Heuristic-guided search.
    #[default]
    AStar,
}

/// Total weight and node sequence of a shortest path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortestPath {
    /// Sum of edge weights along the path.
    pub cost: f64,
    /// Nodes from start to end, both included.
    pub path: Vec<NodeId>,
}

/// Computes the shortest path with the selected algorithm.
///
/// `coords` feeds the A* heuristic; without it A* degrades to uniform-cost
/// search. Dijkstra ignores it.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::NodeId;
/// use u_dispatch::planner::{shortest_path, Algorithm, Graph};
///
/// let mut g = Graph::new();
/// g.add_edge(NodeId::new(1), NodeId::new(2), 4.0);
/// let sp = shortest_path(&g, NodeId::new(1), NodeId::new(2), None, Algorithm::AStar);
/// assert_eq!(sp.map(|p| p.cost), Some(4.0));
/// assert!(shortest_path(&g, NodeId::new(2), NodeId::new(1), None, Algorithm::Dijkstra).is_none());
/// ```
pub fn shortest_path(
    graph: &Graph,
    start: NodeId,
    end: NodeId,
    coords: Option<&Coordinates>,
    algorithm: Algorithm,
) -> Option<ShortestPath> {
    let result = match (algorithm, coords) {
        (Algorithm::AStar, Some(coords)) => astar(graph, start, end, coords),
        (Algorithm::AStar, None) | (Algorithm::Dijkstra, _) => dijkstra(graph, start, end),
    };
    trace!(
        ?algorithm,
        %start,
        %end,
        cost = ?result.as_ref().map(|p| p.cost),
        "shortest path"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (Graph, Coordinates) {
        let (a, b, c) = (NodeId::new(0), NodeId::new(1), NodeId::new(2));
        let mut g = Graph::new();
        g.add_undirected(a, b, 5.0);
        g.add_undirected(b, c, 5.0);
        g.add_undirected(a, c, 20.0);
        let coords = Coordinates::from([
            (a, GeoPoint::new(0.0, 0.0)),
            (b, GeoPoint::new(0.0, 1.0)),
            (c, GeoPoint::new(1.0, 1.0)),
        ]);
        (g, coords)
    }

    #[test]
    fn test_both_algorithms_agree_on_triangle() {
        let (g, coords) = triangle();
        for algorithm in [Algorithm::Dijkstra, Algorithm::AStar] {
            let sp = shortest_path(&g, NodeId::new(0), NodeId::new(2), Some(&coords), algorithm)
                .expect("reachable");
            assert!((sp.cost - 10.0).abs() < 1e-10);
            assert_eq!(sp.path, vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]);
        }
    }

    #[test]
    fn test_algorithm_serde_tags() {
        assert_eq!(
            serde_json::to_string(&Algorithm::AStar).expect("serialize"),
            "\"A_STAR\""
        );
        assert_eq!(
            serde_json::from_str::<Algorithm>("\"DIJKSTRA\"").expect("deserialize"),
            Algorithm::Dijkstra
        );
    }

    #[test]
    fn test_default_algorithm() {
        assert_eq!(Algorithm::default(), Algorithm::AStar);
    }
}
