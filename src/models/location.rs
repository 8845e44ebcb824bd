//! Location nodes and the lazily populated node registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::NodeId;
use crate::distance::GeoPoint;

/// What a location node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// A producer's inventory site where packages are picked up.
    Producer,
    /// A delivery destination.
    Destination,
    /// A vehicle depot.
    Depot,
    /// Where a vehicle stood when a route was planned, keyed by route id.
    RouteStart,
}

/// A point in the routing graph.
///
/// Nodes are immutable once created. `reference_id` points at the row of the
/// owning entity (producer, destination, or depot) in external storage, or
/// at the route for [`NodeKind::RouteStart`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationNode {
    id: NodeId,
    kind: NodeKind,
    reference_id: u64,
    point: GeoPoint,
}

impl LocationNode {
    /// Creates a node.
    pub fn new(id: NodeId, kind: NodeKind, reference_id: u64, point: GeoPoint) -> Self {
        Self {
            id,
            kind,
            reference_id,
            point,
        }
    }

    /// Node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Id of the owning entity.
    pub fn reference_id(&self) -> u64 {
        self.reference_id
    }

    /// Coordinates of this node.
    pub fn point(&self) -> GeoPoint {
        self.point
    }
}

/// Arena of location nodes indexed by [`NodeId`].
///
/// Nodes are created lazily the first time a `(kind, reference_id)` pair is
/// referenced. Later references return the existing node, even if different
/// coordinates are supplied.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::GeoPoint;
/// use u_dispatch::models::{LocationRegistry, NodeKind};
///
/// let mut registry = LocationRegistry::new();
/// let a = registry.ensure(NodeKind::Producer, 10, GeoPoint::new(1.0, 2.0));
/// let b = registry.ensure(NodeKind::Producer, 10, GeoPoint::new(9.0, 9.0));
/// assert_eq!(a, b);
/// assert_eq!(registry.len(), 1);
/// assert_eq!(registry.point(a), Some(GeoPoint::new(1.0, 2.0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    nodes: Vec<LocationNode>,
    by_reference: HashMap<(NodeKind, u64), NodeId>,
}

impl LocationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for `(kind, reference_id)`, creating it on first use.
    pub fn ensure(&mut self, kind: NodeKind, reference_id: u64, point: GeoPoint) -> NodeId {
        if let Some(&id) = self.by_reference.get(&(kind, reference_id)) {
            return id;
        }
        let id = NodeId::new(self.nodes.len() as u64);
        self.nodes
            .push(LocationNode::new(id, kind, reference_id, point));
        self.by_reference.insert((kind, reference_id), id);
        id
    }

    /// Looks up an existing node by owner reference.
    pub fn find(&self, kind: NodeKind, reference_id: u64) -> Option<NodeId> {
        self.by_reference.get(&(kind, reference_id)).copied()
    }

    /// Returns the node with the given id.
    pub fn get(&self, id: NodeId) -> Option<&LocationNode> {
        usize::try_from(id.get())
            .ok()
            .and_then(|idx| self.nodes.get(idx))
    }

    /// Coordinates of the node with the given id.
    pub fn point(&self, id: NodeId) -> Option<GeoPoint> {
        self.get(id).map(LocationNode::point)
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> &[LocationNode] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no nodes exist.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Coordinate lookup for every node, as consumed by the A* heuristic.
    pub fn coordinates(&self) -> HashMap<NodeId, GeoPoint> {
        self.nodes.iter().map(|n| (n.id(), n.point())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lazy_creation() {
        let mut reg = LocationRegistry::new();
        assert!(reg.is_empty());
        let p = reg.ensure(NodeKind::Producer, 1, GeoPoint::new(0.0, 0.0));
        let d = reg.ensure(NodeKind::Destination, 1, GeoPoint::new(1.0, 1.0));
        assert_ne!(p, d);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.find(NodeKind::Destination, 1), Some(d));
        assert_eq!(reg.find(NodeKind::Depot, 1), None);
    }

    #[test]
    fn test_registry_get() {
        let mut reg = LocationRegistry::new();
        let id = reg.ensure(NodeKind::Depot, 5, GeoPoint::new(3.0, 4.0));
        let node = reg.get(id).expect("node exists");
        assert_eq!(node.kind(), NodeKind::Depot);
        assert_eq!(node.reference_id(), 5);
        assert!(reg.get(NodeId::new(99)).is_none());
    }

    #[test]
    fn test_coordinates() {
        let mut reg = LocationRegistry::new();
        let a = reg.ensure(NodeKind::Producer, 1, GeoPoint::new(0.0, 1.0));
        let coords = reg.coordinates();
        assert_eq!(coords.get(&a), Some(&GeoPoint::new(0.0, 1.0)));
    }

    #[test]
    fn test_node_kind_serde() {
        let json = serde_json::to_string(&NodeKind::Destination).expect("serialize");
        assert_eq!(json, "\"DESTINATION\"");
    }
}
