//! Domain model types for dispatch planning.
//!
//! Location nodes and their registry, packages with a lifecycle, capacity
//! limited vehicles, pickup/delivery tasks, and routes that enforce the
//! task execution order. Everything is keyed by opaque integer ids.

mod ids;
mod location;
mod package;
mod route;
mod task;
mod vehicle;

pub use ids::{NodeId, PackageId, RouteId, TaskId, VehicleId};
pub use location::{LocationNode, LocationRegistry, NodeKind};
pub use package::{Package, PackageStatus, Site, StatusError};
pub use route::{Route, RouteStatus};
pub use task::{Task, TaskKind, TaskStatus};
pub use vehicle::{CapacityError, CapacitySnapshot, Vehicle, VehicleStatus};
