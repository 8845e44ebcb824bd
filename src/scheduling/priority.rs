//! Composite task priority scores.
//!
//! ```text
//! priority = α·urgency + β·proximity + γ·type_preference
//! ```
//!
//! Lower scores run sooner. The type preference flips with the vehicle's
//! fill ratio: a nearly full vehicle prefers deliveries, a mostly empty one
//! prefers pickups.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::distance::GeoPoint;
use crate::models::{CapacitySnapshot, Task, TaskKind};

/// Distance at which proximity saturates, in kilometers.
pub const PROXIMITY_CAP_KM: f64 = 100.0;

/// Urgency used for tasks without a deadline.
pub const DEFAULT_URGENCY: f64 = 0.5;

/// Weights of the three priority components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    /// Urgency weight (α).
    pub alpha: f64,
    /// Proximity weight (β).
    pub beta: f64,
    /// Type preference weight (γ).
    pub gamma: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.3,
            gamma: 0.2,
        }
    }
}

/// Urgency in `[0.3, 1.0]`: higher when the deadline is closer.
///
/// # Examples
///
/// ```
/// use jiff::{SignedDuration, Timestamp};
/// use u_dispatch::scheduling::urgency;
///
/// let now = Timestamp::UNIX_EPOCH;
/// assert_eq!(urgency(None, now), 0.5);
/// assert_eq!(urgency(Some(now + SignedDuration::from_hours(1)), now), 0.9);
/// assert_eq!(urgency(Some(now + SignedDuration::from_hours(48)), now), 0.3);
/// ```
pub fn urgency(deadline: Option<Timestamp>, now: Timestamp) -> f64 {
    let Some(deadline) = deadline else {
        return DEFAULT_URGENCY;
    };
    let hours = deadline.duration_since(now).as_secs_f64() / 3600.0;
    if hours < 0.0 {
        1.0
    } else if hours < 2.0 {
        0.9
    } else if hours < 6.0 {
        0.7
    } else if hours < 24.0 {
        0.5
    } else {
        0.3
    }
}

/// Proximity in `[0, 1]`: distance over [`PROXIMITY_CAP_KM`], capped at 1.
pub fn proximity(from: &GeoPoint, to: &GeoPoint) -> f64 {
    (from.distance_km(to) / PROXIMITY_CAP_KM).min(1.0)
}

/// Type preference for a task kind at the given fill level.
pub fn type_preference(kind: TaskKind, capacity: &CapacitySnapshot) -> f64 {
    let fill = capacity.fill_ratio();
    match kind {
        TaskKind::Delivery if fill >= 0.8 => 0.2,
        TaskKind::Pickup if fill >= 0.8 => 0.8,
        TaskKind::Delivery if fill >= 0.5 => 0.4,
        TaskKind::Pickup if fill >= 0.5 => 0.6,
        TaskKind::Pickup => 0.4,
        TaskKind::Delivery => 0.6,
    }
}

/// Scores and orders tasks for one vehicle state.
///
/// # Examples
///
/// ```
/// use jiff::Timestamp;
/// use u_dispatch::distance::GeoPoint;
/// use u_dispatch::models::{CapacitySnapshot, NodeId, Task, TaskId, TaskKind};
/// use u_dispatch::scheduling::PriorityScheduler;
///
/// let here = GeoPoint::new(0.0, 0.0);
/// let stop = GeoPoint::new(0.0, 0.1);
/// let tasks = vec![
///     Task::new(TaskId::new(1), TaskKind::Pickup, NodeId::new(1), stop),
///     Task::new(TaskId::new(2), TaskKind::Delivery, NodeId::new(2), stop),
/// ];
///
/// let full = CapacitySnapshot::new(10, 9);
/// let ordered = PriorityScheduler::default().reorder(&tasks, &here, &full, Timestamp::now());
/// assert_eq!(ordered[0].id(), TaskId::new(2));
/// assert_eq!(ordered[0].priority_order(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriorityScheduler {
    weights: PriorityWeights,
}

impl PriorityScheduler {
    /// Creates a scheduler with custom weights.
    pub fn new(weights: PriorityWeights) -> Self {
        Self { weights }
    }

    /// Component weights.
    pub fn weights(&self) -> &PriorityWeights {
        &self.weights
    }

    /// Composite score of one task; lower runs sooner.
    pub fn score(
        &self,
        task: &Task,
        location: &GeoPoint,
        capacity: &CapacitySnapshot,
        now: Timestamp,
    ) -> f64 {
        let w = &self.weights;
        w.alpha * urgency(task.deadline(), now)
            + w.beta * proximity(location, &task.point())
            + w.gamma * type_preference(task.kind(), capacity)
    }

    /// Returns the tasks sorted by ascending score with `priority_order`
    /// set to `1..=n`.
    ///
    /// The sort is stable, so equal scores keep their input order and
    /// repeated calls on the same state give the same order.
    pub fn reorder(
        &self,
        tasks: &[Task],
        location: &GeoPoint,
        capacity: &CapacitySnapshot,
        now: Timestamp,
    ) -> Vec<Task> {
        let mut scored: Vec<(f64, Task)> = tasks
            .iter()
            .map(|t| (self.score(t, location, capacity, now), t.clone()))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        scored
            .into_iter()
            .zip(1u32..)
            .map(|((_, mut task), order)| {
                task.set_priority_order(order);
                task
            })
            .collect()
    }
}

/// [`PriorityScheduler::reorder`] with the default weights.
pub fn reorder_tasks(
    tasks: &[Task],
    location: &GeoPoint,
    capacity: &CapacitySnapshot,
    now: Timestamp,
) -> Vec<Task> {
    PriorityScheduler::default().reorder(tasks, location, capacity, now)
}
