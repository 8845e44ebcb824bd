//! Routes: an ordered task list executed by one vehicle.

use serde::{Deserialize, Serialize};

use super::{RouteId, Task, TaskId, TaskStatus, VehicleId};
use crate::planner::Algorithm;
use crate::scheduling::ScheduleError;

/// Lifecycle status of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStatus {
    /// Created, no task started yet.
    Planned,
    /// At least one task started.
    Active,
    /// Every task completed.
    Completed,
}

/// The tasks assigned to a single vehicle, with their execution order.
///
/// A route enforces the execution-order invariant: only the pending task
/// with the lowest `priority_order` may be started.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::GeoPoint;
/// use u_dispatch::models::{NodeId, Route, RouteId, Task, TaskId, TaskKind, VehicleId};
/// use u_dispatch::planner::Algorithm;
///
/// let p = GeoPoint::new(0.0, 0.0);
/// let mut route = Route::new(RouteId::new(1), VehicleId::new(0), Algorithm::AStar);
/// route.push_task(Task::new(TaskId::new(1), TaskKind::Pickup, NodeId::new(0), p).with_priority_order(1));
/// route.push_task(Task::new(TaskId::new(2), TaskKind::Delivery, NodeId::new(1), p).with_priority_order(2));
///
/// assert!(route.start_task(TaskId::new(2)).is_err());
/// route.start_task(TaskId::new(1)).unwrap();
/// route.complete_task(TaskId::new(1)).unwrap();
/// assert_eq!(route.top_pending().map(|t| t.id()), Some(TaskId::new(2)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    id: RouteId,
    vehicle_id: VehicleId,
    tasks: Vec<Task>,
    status: RouteStatus,
    algorithm: Algorithm,
    planned_distance_km: f64,
    planned_minutes: f64,
}

impl Route {
    /// Creates an empty planned route.
    pub fn new(id: RouteId, vehicle_id: VehicleId, algorithm: Algorithm) -> Self {
        Self {
            id,
            vehicle_id,
            tasks: Vec::new(),
            status: RouteStatus::Planned,
            algorithm,
            planned_distance_km: 0.0,
            planned_minutes: 0.0,
        }
    }

    /// Appends a task.
    pub fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Route id.
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Vehicle executing this route.
    pub fn vehicle_id(&self) -> VehicleId {
        self.vehicle_id
    }

    /// Path-planning algorithm that produced the route.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Current status.
    pub fn status(&self) -> RouteStatus {
        self.status
    }

    /// All tasks in creation order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if the route has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Pending tasks, sorted by priority order.
    pub fn pending_tasks(&self) -> Vec<&Task> {
        let mut pending: Vec<&Task> = self.tasks.iter().filter(|t| t.is_pending()).collect();
        pending.sort_by_key(|t| t.priority_order());
        pending
    }

    /// The rank-1 task: the pending task with the lowest priority order.
    pub fn top_pending(&self) -> Option<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.is_pending())
            .min_by_key(|t| t.priority_order())
    }

    /// Planned total distance in kilometers.
    pub fn planned_distance_km(&self) -> f64 {
        self.planned_distance_km
    }

    /// Planned total travel time in minutes.
    pub fn planned_minutes(&self) -> f64 {
        self.planned_minutes
    }

    /// Records the planned totals (set by the dispatcher).
    pub fn set_planned_totals(&mut self, distance_km: f64, minutes: f64) {
        self.planned_distance_km = distance_km;
        self.planned_minutes = minutes;
    }

    /// Starts a task.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::NotTopPriority`] unless `id` is the current rank-1
    /// pending task, [`ScheduleError::InvalidTransition`] if it is not
    /// pending, [`ScheduleError::UnknownTask`] if it is not on this route.
    pub fn start_task(&mut self, id: TaskId) -> Result<&Task, ScheduleError> {
        let idx = self.index_of(id)?;
        let status = self.tasks[idx].status();
        if status != TaskStatus::Pending {
            return Err(ScheduleError::InvalidTransition {
                task: id,
                from: status,
                to: TaskStatus::InProgress,
            });
        }
        if let Some(top) = self.top_pending() {
            if top.id() != id {
                return Err(ScheduleError::NotTopPriority {
                    requested: id,
                    top: top.id(),
                });
            }
        }

        self.tasks[idx].set_status(TaskStatus::InProgress);
        if self.status == RouteStatus::Planned {
            self.status = RouteStatus::Active;
        }
        Ok(&self.tasks[idx])
    }

    /// Completes a started task. Completing the last task completes the route.
    pub fn complete_task(&mut self, id: TaskId) -> Result<&Task, ScheduleError> {
        let idx = self.index_of(id)?;
        let status = self.tasks[idx].status();
        if status != TaskStatus::InProgress {
            return Err(ScheduleError::InvalidTransition {
                task: id,
                from: status,
                to: TaskStatus::Completed,
            });
        }

        self.tasks[idx].set_status(TaskStatus::Completed);
        if self
            .tasks
            .iter()
            .all(|t| t.status() == TaskStatus::Completed)
        {
            self.status = RouteStatus::Completed;
        }
        Ok(&self.tasks[idx])
    }

    /// Copies `priority_order` from a reordered set of this route's tasks.
    ///
    /// Tasks not present in `ordered` keep their current order.
    pub fn apply_order(&mut self, ordered: &[Task]) {
        for task in &mut self.tasks {
            if let Some(o) = ordered.iter().find(|o| o.id() == task.id()) {
                task.set_priority_order(o.priority_order());
            }
        }
    }

    fn index_of(&self, id: TaskId) -> Result<usize, ScheduleError> {
        self.tasks
            .iter()
            .position(|t| t.id() == id)
            .ok_or(ScheduleError::UnknownTask(id))
    }
}
