//! # u-dispatch
//!
//! Delivery dispatch engine: plans routes for capacity-limited vehicles,
//! keeps their task order up to date as work completes, and prices each
//! task with a trainable regression model.
//!
//! ## Modules
//!
//! - [`models`]: domain types (packages, vehicles, tasks, routes, locations)
//! - [`distance`]: great-circle distance and measured edge overrides
//! - [`planner`]: Dijkstra and A* shortest paths
//! - [`assignment`]: capacity-constrained greedy package selection
//! - [`scheduling`]: dynamic task priorities and initial route order
//! - [`pricing`]: cost prediction, training and evaluation
//! - [`dispatch`]: the [`Dispatcher`](dispatch::Dispatcher) tying them together
//! - [`config`]: engine tunables
//!
//! The library emits [`tracing`] events and never installs a subscriber.

pub mod assignment;
pub mod config;
pub mod dispatch;
pub mod distance;
pub mod models;
pub mod planner;
pub mod pricing;
pub mod scheduling;
