//! Task execution-order errors.

use crate::models::{TaskId, TaskStatus};

/// Rejected task state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Only the rank-1 pending task may be started.
    #[error("{requested} is not the top-priority pending task ({top} is)")]
    NotTopPriority {
        /// Task the caller tried to start.
        requested: TaskId,
        /// Current rank-1 pending task.
        top: TaskId,
    },
    /// The task is not in a state that allows the change.
    #[error("{task} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        /// Task being changed.
        task: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
    /// The task does not belong to the route.
    #[error("{0} is not part of this route")]
    UnknownTask(TaskId),
}
