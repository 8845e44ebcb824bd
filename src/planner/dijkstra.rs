//! Uniform-cost search (Dijkstra).
//!
//! # Algorithm
//!
//! Tentative costs start at 0 for the source and infinity elsewhere. The
//! node with the smallest tentative cost is extracted from a binary-heap
//! frontier and its neighbors are relaxed. Nodes are finalized in
//! non-decreasing cost order, so the search ends as soon as the target is
//! extracted.
//!
//! # Complexity
//!
//! O((V + E) log V).
//!
//! # Reference
//!
//! Dijkstra, E.W. (1959). "A note on two problems in connexion with graphs",
//! *Numerische Mathematik* 1, 269-271.

use super::search::best_first;
use super::{Graph, ShortestPath};
use crate::models::NodeId;

/// Shortest path from `start` to `end` by uniform-cost search.
///
/// Returns `None` when `end` is unreachable.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::NodeId;
/// use u_dispatch::planner::{dijkstra, Graph};
///
/// let (a, b, c) = (NodeId::new(0), NodeId::new(1), NodeId::new(2));
/// let mut g = Graph::new();
/// g.add_undirected(a, b, 5.0);
/// g.add_undirected(b, c, 5.0);
/// g.add_undirected(a, c, 20.0);
///
/// let sp = dijkstra(&g, a, c).unwrap();
/// assert_eq!(sp.cost, 10.0);
/// assert_eq!(sp.path, vec![a, b, c]);
/// ```
pub fn dijkstra(graph: &Graph, start: NodeId, end: NodeId) -> Option<ShortestPath> {
    best_first(graph, start, end, |_| 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(id: u64) -> NodeId {
        NodeId::new(id)
    }

    #[test]
    fn test_triangle() {
        let mut g = Graph::new();
        g.add_undirected(n(0), n(1), 5.0);
        g.add_undirected(n(1), n(2), 5.0);
        g.add_undirected(n(0), n(2), 20.0);
        let sp = dijkstra(&g, n(0), n(2)).expect("reachable");
        assert!((sp.cost - 10.0).abs() < 1e-10);
        assert_eq!(sp.path, vec![n(0), n(1), n(2)]);
    }

    #[test]
    fn test_unreachable() {
        let mut g = Graph::new();
        g.add_edge(n(0), n(1), 1.0);
        g.add_edge(n(2), n(3), 1.0);
        assert!(dijkstra(&g, n(0), n(3)).is_none());
    }

    #[test]
    fn test_directed_edges_respected() {
        let mut g = Graph::new();
        g.add_edge(n(0), n(1), 1.0);
        assert!(dijkstra(&g, n(1), n(0)).is_none());
    }

    #[test]
    fn test_start_equals_end() {
        let mut g = Graph::new();
        g.add_edge(n(0), n(1), 1.0);
        let sp = dijkstra(&g, n(0), n(0)).expect("trivial");
        assert_eq!(sp.cost, 0.0);
        assert_eq!(sp.path, vec![n(0)]);
    }

    #[test]
    fn test_start_missing_from_graph() {
        let g = Graph::new();
        assert!(dijkstra(&g, n(0), n(1)).is_none());
    }

    #[test]
    fn test_longer_path_cheaper() {
        // 0 -> 3 direct costs 10, the chain 0-1-2-3 costs 3.
        let mut g = Graph::new();
        g.add_edge(n(0), n(3), 10.0);
        g.add_edge(n(0), n(1), 1.0);
        g.add_edge(n(1), n(2), 1.0);
        g.add_edge(n(2), n(3), 1.0);
        let sp = dijkstra(&g, n(0), n(3)).expect("reachable");
        assert!((sp.cost - 3.0).abs() < 1e-10);
        assert_eq!(sp.path, vec![n(0), n(1), n(2), n(3)]);
    }

    #[test]
    fn test_zero_weight_edges() {
        let mut g = Graph::new();
        g.add_edge(n(0), n(1), 0.0);
        g.add_edge(n(1), n(2), 0.0);
        let sp = dijkstra(&g, n(0), n(2)).expect("reachable");
        assert_eq!(sp.cost, 0.0);
        assert_eq!(sp.path.len(), 3);
    }

    #[test]
    fn test_tie_first_inserted_wins() {
        // Two equal-cost routes to 3; the neighbor inserted first (1) wins.
        let mut g = Graph::new();
        g.add_edge(n(0), n(1), 1.0);
        g.add_edge(n(0), n(2), 1.0);
        g.add_edge(n(1), n(3), 1.0);
        g.add_edge(n(2), n(3), 1.0);
        let sp = dijkstra(&g, n(0), n(3)).expect("reachable");
        assert_eq!(sp.path, vec![n(0), n(1), n(3)]);
    }
}
