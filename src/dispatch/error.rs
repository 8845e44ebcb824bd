//! Dispatch errors.

use crate::models::{CapacityError, RouteId, StatusError, VehicleId};
use crate::scheduling::ScheduleError;

/// Failure of a dispatcher operation. The dispatcher state is unchanged
/// when one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// No vehicle with this id is registered.
    #[error("unknown vehicle {0}")]
    UnknownVehicle(VehicleId),
    /// No route with this id exists.
    #[error("unknown route {0}")]
    UnknownRoute(RouteId),
    /// The vehicle is full.
    #[error("{0} has no free sections")]
    NoCapacity(VehicleId),
    /// The vehicle still has an unfinished route.
    #[error("{vehicle} is still running {route}")]
    VehicleBusy {
        /// Vehicle being planned.
        vehicle: VehicleId,
        /// Its open route.
        route: RouteId,
    },
    /// No package is waiting for assignment.
    #[error("no available packages")]
    NoPackages,
    /// Packages exist but none fits into the free sections.
    #[error("no available package fits the {available} free sections of {vehicle}")]
    NothingFits {
        /// Vehicle being planned.
        vehicle: VehicleId,
        /// Its free sections.
        available: u32,
    },
    /// Task order or status violation.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    /// Vehicle load change rejected.
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    /// Package lifecycle violation.
    #[error(transparent)]
    Status(#[from] StatusError),
}
