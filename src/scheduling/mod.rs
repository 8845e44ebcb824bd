//! Dynamic task priority scheduling.
//!
//! - [`PriorityScheduler::reorder`]: score and sort pending tasks for one
//!   vehicle state
//! - [`PriorityScheduler::plan`]: initial order of a new route, simulating
//!   the capacity change of every committed task
//!
//! The scheduler is re-run whenever a task completes. The execution-order
//! invariant itself (only the rank-1 pending task may start) is enforced by
//! [`Route::start_task`](crate::models::Route::start_task), which reports
//! violations as [`ScheduleError::NotTopPriority`].

mod error;
mod priority;
mod sequence;

pub use error::ScheduleError;
pub use priority::{
    proximity, reorder_tasks, type_preference, urgency, PriorityScheduler, PriorityWeights,
    DEFAULT_URGENCY, PROXIMITY_CAP_KM,
};
pub use sequence::plan_initial_order;
