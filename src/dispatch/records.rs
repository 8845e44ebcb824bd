//! Records handed back to the caller for persistence.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::{PackageId, RouteId, TaskId, TaskKind};

/// Price and timing of a task at the moment it starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskQuote {
    /// Route the task belongs to.
    pub route: RouteId,
    /// Started task.
    pub task: TaskId,
    /// Package handled by the task, if any.
    pub package: Option<PackageId>,
    /// Predicted price per section.
    pub cost_per_section: f64,
    /// Producer to destination distance used for pricing, in kilometers.
    pub distance_km: f64,
    /// Active routes when the task started.
    pub demand: u32,
    /// Start time.
    pub started_at: Timestamp,
    /// Expected completion of the haul.
    pub estimated_completion: Timestamp,
}

/// Outcome of a completed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTask {
    /// Route the task belongs to.
    pub route: RouteId,
    /// Completed task.
    pub task: TaskId,
    /// Pickup or delivery.
    pub kind: TaskKind,
    /// Package handled by the task, if any.
    pub package: Option<PackageId>,
    /// Sections actually loaded or unloaded.
    pub sections: u32,
    /// Price per section quoted at start.
    pub cost_per_section: f64,
    /// `cost_per_section × sections × (distance_km / 1440) / 4`.
    pub total_cost: f64,
    /// Completion time.
    pub completed_at: Timestamp,
    /// Vehicle load after the task.
    pub vehicle_used: u32,
    /// Pending tasks in their new order.
    pub remaining: Vec<TaskId>,
    /// Whether this task finished the route.
    pub route_completed: bool,
}

/// Total price of a completed task.
///
/// ```text
/// total = cost_per_section × sections × (distance_km / (60 × 24)) / 4
/// ```
pub fn total_cost(cost_per_section: f64, sections: u32, distance_km: f64) -> f64 {
    cost_per_section * f64::from(sections) * (distance_km / (60.0 * 24.0)) / 4.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_cost() {
        // 1440 km is one unit of distance factor.
        assert!((total_cost(400.0, 2, 1440.0) - 200.0).abs() < 1e-10);
        assert_eq!(total_cost(400.0, 0, 1440.0), 0.0);
        assert_eq!(total_cost(400.0, 3, 0.0), 0.0);
    }
}
