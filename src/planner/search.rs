//! Shared best-first relaxation loop.

use std::collections::HashMap;

use super::frontier::Frontier;
use super::{Graph, ShortestPath};
use crate::models::NodeId;

/// Runs a best-first search keyed by `cost + heuristic(node)`.
///
/// A node may be re-expanded when a cheaper cost is found later; entries
/// whose cost is above the best known cost are skipped as stale. The search
/// stops the moment `end` is extracted.
pub(crate) fn best_first<H>(
    graph: &Graph,
    start: NodeId,
    end: NodeId,
    heuristic: H,
) -> Option<ShortestPath>
where
    H: Fn(NodeId) -> f64,
{
    let mut best: HashMap<NodeId, f64> = HashMap::new();
    let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
    let mut frontier = Frontier::new();

    best.insert(start, 0.0);
    frontier.push(start, 0.0, heuristic(start));

    while let Some(entry) = frontier.pop() {
        let known = best.get(&entry.node).copied().unwrap_or(f64::INFINITY);
        if entry.cost > known {
            continue;
        }

        if entry.node == end {
            return Some(ShortestPath {
                cost: entry.cost,
                path: reconstruct(&previous, start, end),
            });
        }

        for &(next, weight) in graph.neighbors(entry.node) {
            let tentative = entry.cost + weight;
            if tentative < best.get(&next).copied().unwrap_or(f64::INFINITY) {
                best.insert(next, tentative);
                previous.insert(next, entry.node);
                frontier.push(next, tentative, tentative + heuristic(next));
            }
        }
    }

    None
}

fn reconstruct(previous: &HashMap<NodeId, NodeId>, start: NodeId, end: NodeId) -> Vec<NodeId> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match previous.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
