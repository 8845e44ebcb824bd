//! Route planning and execution for a fleet of vehicles.
//!
//! [`Dispatcher`] ties the engine together:
//!
//! 1. [`plan_route`](Dispatcher::plan_route) selects packages for a vehicle,
//!    creates their pickup and delivery tasks, orders them, and measures the
//!    route with the chosen path algorithm.
//! 2. [`start_task`](Dispatcher::start_task) admits only the rank-1 task and
//!    prices it with the shared cost model.
//! 3. [`complete_task`](Dispatcher::complete_task) applies the load change,
//!    advances the package, and re-ranks what is left.
//!
//! A vehicle runs one route at a time, and a delivery is never ranked ahead
//! of the pickup of the same package.

mod dispatcher;
mod error;
mod records;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use records::{total_cost, CompletedTask, TaskQuote};
