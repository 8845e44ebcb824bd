//! Pickup and delivery tasks.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{NodeId, Package, PackageId, TaskId};
use crate::distance::GeoPoint;

/// Whether a task loads or unloads cargo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    /// Load a package at its producer.
    Pickup,
    /// Unload a package at its destination.
    Delivery,
}

/// Execution status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started.
    Pending,
    /// Started, not yet confirmed.
    InProgress,
    /// Done.
    Completed,
}

/// One stop on a route.
///
/// Tasks are created in bulk when a route is planned. Afterwards only the
/// priority order and the status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    kind: TaskKind,
    node: NodeId,
    point: GeoPoint,
    package: Option<PackageId>,
    deadline: Option<Timestamp>,
    required_sections: u32,
    priority_order: u32,
    status: TaskStatus,
}

impl Task {
    /// Creates a pending task not linked to any package.
    pub fn new(id: TaskId, kind: TaskKind, node: NodeId, point: GeoPoint) -> Self {
        Self {
            id,
            kind,
            node,
            point,
            package: None,
            deadline: None,
            required_sections: 0,
            priority_order: 0,
            status: TaskStatus::Pending,
        }
    }

    /// Creates the pickup task for a package at its producer node.
    pub fn pickup(id: TaskId, package: &Package, node: NodeId) -> Self {
        Self::new(id, TaskKind::Pickup, node, package.producer().point).for_package(package)
    }

    /// Creates the delivery task for a package at its destination node.
    pub fn delivery(id: TaskId, package: &Package, node: NodeId) -> Self {
        Self::new(id, TaskKind::Delivery, node, package.destination().point).for_package(package)
    }

    fn for_package(mut self, package: &Package) -> Self {
        self.package = Some(package.id());
        self.deadline = package.deadline();
        self.required_sections = package.required_sections();
        self
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: Timestamp) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the cargo size handled by this task.
    pub fn with_required_sections(mut self, sections: u32) -> Self {
        self.required_sections = sections;
        self
    }

    /// Sets the initial priority order.
    pub fn with_priority_order(mut self, order: u32) -> Self {
        self.priority_order = order;
        self
    }

    /// Task id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Pickup or delivery.
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Target node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Coordinates of the target node.
    pub fn point(&self) -> GeoPoint {
        self.point
    }

    /// Linked package, if any.
    pub fn package(&self) -> Option<PackageId> {
        self.package
    }

    /// Deadline inherited from the package.
    pub fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    /// Sections loaded or unloaded by this task.
    pub fn required_sections(&self) -> u32 {
        self.required_sections
    }

    /// Position in the execution order (1 = next).
    pub fn priority_order(&self) -> u32 {
        self.priority_order
    }

    /// Current status.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns `true` while the task has not been started.
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub(crate) fn set_priority_order(&mut self, order: u32) {
        self.priority_order = order;
    }

    pub(crate) fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Site;

    fn package() -> Package {
        Package::new(
            PackageId::new(9),
            4,
            Site::new(1, GeoPoint::new(0.0, 0.0)),
            Site::new(2, GeoPoint::new(1.0, 1.0)),
        )
        .with_deadline(Timestamp::UNIX_EPOCH)
    }

    #[test]
    fn test_pickup_from_package() {
        let t = Task::pickup(TaskId::new(1), &package(), NodeId::new(3));
        assert_eq!(t.kind(), TaskKind::Pickup);
        assert_eq!(t.point(), GeoPoint::new(0.0, 0.0));
        assert_eq!(t.package(), Some(PackageId::new(9)));
        assert_eq!(t.required_sections(), 4);
        assert_eq!(t.deadline(), Some(Timestamp::UNIX_EPOCH));
        assert!(t.is_pending());
    }

    #[test]
    fn test_delivery_from_package() {
        let t = Task::delivery(TaskId::new(2), &package(), NodeId::new(4));
        assert_eq!(t.kind(), TaskKind::Delivery);
        assert_eq!(t.node(), NodeId::new(4));
        assert_eq!(t.point(), GeoPoint::new(1.0, 1.0));
    }

    #[test]
    fn test_standalone_task() {
        let t = Task::new(TaskId::new(5), TaskKind::Delivery, NodeId::new(0), GeoPoint::new(0.0, 0.0))
            .with_required_sections(2)
            .with_priority_order(3);
        assert!(t.package().is_none());
        assert!(t.deadline().is_none());
        assert_eq!(t.required_sections(), 2);
        assert_eq!(t.priority_order(), 3);
    }
}
