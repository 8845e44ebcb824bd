//! Heuristic-guided search (A*).
//!
//! # Algorithm
//!
//! Same relaxation loop as [`dijkstra`](super::dijkstra), but the frontier
//! is keyed by `g(n) + h(n)` where `h` is the great-circle distance from `n`
//! to the target converted to minutes at a planning speed.
//!
//! # Admissibility
//!
//! `h` must never overestimate the remaining cost. The planning speed is
//! therefore raised to the fastest great-circle speed implied by any edge
//! of the graph (`km / (weight / 60)`), with [`PLANNING_SPEED_KMH`] as the
//! floor. With that speed `h` is consistent, and A* returns the same cost
//! as Dijkstra.
//!
//! Calibration needs a coordinate for every node: an edge through a node
//! without one says nothing about the speed. If any node of the graph lacks
//! coordinates, `h = 0` everywhere and the search is uniform-cost.
//!
//! # Reference
//!
//! Hart, P.E., Nilsson, N.J. & Raphael, B. (1968). "A Formal Basis for the
//! Heuristic Determination of Minimum Cost Paths", *IEEE Transactions on
//! Systems Science and Cybernetics* 4(2), 100-107.

use super::search::best_first;
use super::{Coordinates, Graph, ShortestPath, PLANNING_SPEED_KMH};
use crate::distance::GeoPoint;
use crate::models::NodeId;

/// Great-circle travel-time estimate towards a fixed target.
#[derive(Debug, Clone, Copy)]
pub struct GreatCircleHeuristic {
    target: Option<GeoPoint>,
    speed_kmh: f64,
}

impl GreatCircleHeuristic {
    /// Builds the heuristic for `end`, calibrating its speed on `graph`.
    ///
    /// `min_speed_kmh` is the planning speed floor. The heuristic is zero
    /// unless `coords` covers every node of `graph` and `end`.
    pub fn calibrated(
        graph: &Graph,
        coords: &Coordinates,
        end: NodeId,
        min_speed_kmh: f64,
    ) -> Self {
        let mut speed_kmh = min_speed_kmh;
        let covered =
            coords.contains_key(&end) && graph.nodes().all(|node| coords.contains_key(&node));
        if !covered {
            return Self {
                target: None,
                speed_kmh,
            };
        }
        for (from, to, weight) in graph.edges() {
            let (Some(a), Some(b)) = (coords.get(&from), coords.get(&to)) else {
                continue;
            };
            let km = a.distance_km(b);
            if km <= 0.0 {
                continue;
            }
            let edge_speed = if weight > 0.0 {
                km / weight * 60.0
            } else {
                f64::INFINITY
            };
            speed_kmh = speed_kmh.max(edge_speed);
        }
        Self {
            target: coords.get(&end).copied(),
            speed_kmh,
        }
    }

    /// Speed used to convert kilometers to minutes.
    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    /// Estimated minutes from `point` to the target; zero if unknown.
    pub fn estimate(&self, point: Option<&GeoPoint>) -> f64 {
        match (point, self.target) {
            (Some(p), Some(target)) if self.speed_kmh.is_finite() => {
                p.distance_km(&target) / self.speed_kmh * 60.0
            }
            _ => 0.0,
        }
    }
}

/// Shortest path from `start` to `end` by A* at the default planning speed.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use u_dispatch::distance::GeoPoint;
/// use u_dispatch::models::NodeId;
/// use u_dispatch::planner::{astar, Graph};
///
/// let (a, b, c) = (NodeId::new(0), NodeId::new(1), NodeId::new(2));
/// let mut g = Graph::new();
/// g.add_undirected(a, b, 5.0);
/// g.add_undirected(b, c, 5.0);
/// g.add_undirected(a, c, 20.0);
///
/// let coords = HashMap::from([
///     (a, GeoPoint::new(0.0, 0.0)),
///     (b, GeoPoint::new(0.0, 1.0)),
///     (c, GeoPoint::new(1.0, 1.0)),
/// ]);
/// let sp = astar(&g, a, c, &coords).unwrap();
/// assert_eq!(sp.cost, 10.0);
/// assert_eq!(sp.path, vec![a, b, c]);
/// ```
pub fn astar(
    graph: &Graph,
    start: NodeId,
    end: NodeId,
    coords: &Coordinates,
) -> Option<ShortestPath> {
    astar_with_speed(graph, start, end, coords, PLANNING_SPEED_KMH)
}

/// A* with an explicit planning speed floor.
pub fn astar_with_speed(
    graph: &Graph,
    start: NodeId,
    end: NodeId,
    coords: &Coordinates,
    min_speed_kmh: f64,
) -> Option<ShortestPath> {
    let heuristic = GreatCircleHeuristic::calibrated(graph, coords, end, min_speed_kmh);
    best_first(graph, start, end, |node| heuristic.estimate(coords.get(&node)))
}
