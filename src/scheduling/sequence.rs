//! Initial route ordering by simulated capacity changes.
//!
//! # Algorithm
//!
//! Starting from the vehicle's current fill level, repeatedly score the
//! remaining tasks, commit the rank-1 task, and apply its load change to
//! the simulated capacity (a pickup adds its sections, a delivery removes
//! them). Each step re-scores with the new fill ratio, so the plan drifts
//! from pickups towards deliveries as the vehicle fills up.
//!
//! # Complexity
//!
//! O(n² log n) where n = number of tasks.

use jiff::Timestamp;

use super::PriorityScheduler;
use crate::distance::GeoPoint;
use crate::models::{CapacitySnapshot, Task, TaskKind};

impl PriorityScheduler {
    /// Builds the full initial execution order for a new route.
    ///
    /// The vehicle position is held fixed during the simulation; only the
    /// capacity evolves. The returned tasks carry `priority_order = 1..=n`.
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
    /// let p = GeoPoint::new(0.0, 0.01);
    /// let tasks = vec![
    ///     Task::new(TaskId::new(1), TaskKind::Delivery, NodeId::new(2), p).with_required_sections(8),
    ///     Task::new(TaskId::new(2), TaskKind::Pickup, NodeId::new(1), p).with_required_sections(8),
    /// ];
    /// let plan = PriorityScheduler::default().plan(&tasks, &here, CapacitySnapshot::new(10, 0), Timestamp::now());
    /// let ids: Vec<_> = plan.iter().map(|t| t.id().get()).collect();
    /// assert_eq!(ids, vec![2, 1]);
    /// ```
    pub fn plan(
        &self,
        tasks: &[Task],
        location: &GeoPoint,
        capacity: CapacitySnapshot,
        now: Timestamp,
    ) -> Vec<Task> {
        let mut remaining: Vec<Task> = tasks.to_vec();
        let mut capacity = capacity;
        let mut ordered = Vec::with_capacity(tasks.len());

        while !remaining.is_empty() {
            let ranked = self.reorder(&remaining, location, &capacity, now);
            let Some(next) = ranked.into_iter().next() else {
                break;
            };

            capacity = match next.kind() {
                TaskKind::Pickup => capacity.after_pickup(next.required_sections()),
                TaskKind::Delivery => capacity.after_delivery(next.required_sections()),
            };
            remaining.retain(|t| t.id() != next.id());

            let mut next = next;
            next.set_priority_order(ordered.len() as u32 + 1);
            ordered.push(next);
        }

        ordered
    }
}

/// [`PriorityScheduler::plan`] with the default weights.
pub fn plan_initial_order(
    tasks: &[Task],
    location: &GeoPoint,
    capacity: CapacitySnapshot,
    now: Timestamp,
) -> Vec<Task> {
    PriorityScheduler::default().plan(tasks, location, capacity, now)
}
