//! Packages and their lifecycle.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::PackageId;
use crate::distance::GeoPoint;

/// Lifecycle status of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageStatus {
    /// Waiting to be assigned to a route.
    Available,
    /// Assigned to a route, pickup not yet confirmed.
    Requested,
    /// Pickup approved by the producer.
    Approved,
    /// Loaded into a vehicle.
    Loaded,
    /// On its way to the destination.
    InTransit,
    /// Handed over at the destination.
    Delivered,
}

impl PackageStatus {
    /// Returns `true` if a package may move from `self` to `next`.
    ///
    /// Approval and the in-transit step are optional: a requested package
    /// may be loaded directly and a loaded package may be delivered directly.
    pub fn can_transition_to(self, next: PackageStatus) -> bool {
        use PackageStatus::*;
        matches!(
            (self, next),
            (Available, Requested)
                | (Requested, Approved)
                | (Requested, Loaded)
                | (Approved, Loaded)
                | (Loaded, InTransit)
                | (Loaded, Delivered)
                | (InTransit, Delivered)
        )
    }
}

/// Rejected package status change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{package} cannot move from {from:?} to {to:?}")]
pub struct StatusError {
    /// Package whose status was being changed.
    pub package: PackageId,
    /// Current status.
    pub from: PackageStatus,
    /// Requested status.
    pub to: PackageStatus,
}

/// A producer or destination site referenced by a package.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Id of the producer or destination record.
    pub reference_id: u64,
    /// Site coordinates.
    pub point: GeoPoint,
}

impl Site {
    /// Creates a site reference.
    pub fn new(reference_id: u64, point: GeoPoint) -> Self {
        Self {
            reference_id,
            point,
        }
    }
}

/// A package to be carried from a producer to a destination.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::GeoPoint;
/// use u_dispatch::models::{Package, PackageId, PackageStatus, Site};
///
/// let mut pkg = Package::new(
///     PackageId::new(1),
///     3,
///     Site::new(10, GeoPoint::new(0.0, 0.0)),
///     Site::new(20, GeoPoint::new(0.1, 0.1)),
/// );
/// assert_eq!(pkg.status(), PackageStatus::Available);
/// pkg.advance(PackageStatus::Requested).unwrap();
/// assert!(pkg.advance(PackageStatus::Delivered).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    id: PackageId,
    required_sections: u32,
    producer: Site,
    destination: Site,
    deadline: Option<Timestamp>,
    status: PackageStatus,
}

impl Package {
    /// Creates an available package without a deadline.
    pub fn new(id: PackageId, required_sections: u32, producer: Site, destination: Site) -> Self {
        Self {
            id,
            required_sections,
            producer,
            destination,
            deadline: None,
            status: PackageStatus::Available,
        }
    }

    /// Sets the delivery deadline.
    pub fn with_deadline(mut self, deadline: Timestamp) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Package id.
    pub fn id(&self) -> PackageId {
        self.id
    }

    /// Capacity units this package occupies.
    pub fn required_sections(&self) -> u32 {
        self.required_sections
    }

    /// Pickup site.
    pub fn producer(&self) -> &Site {
        &self.producer
    }

    /// Delivery site.
    pub fn destination(&self) -> &Site {
        &self.destination
    }

    /// Delivery deadline, if any.
    pub fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    /// Current lifecycle status.
    pub fn status(&self) -> PackageStatus {
        self.status
    }

    /// Moves the package to `next` if the lifecycle allows it.
    pub fn advance(&mut self, next: PackageStatus) -> Result<(), StatusError> {
        if !self.status.can_transition_to(next) {
            return Err(StatusError {
                package: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Great-circle distance from producer to destination in kilometers.
    pub fn haul_km(&self) -> f64 {
        self.producer.point.distance_km(&self.destination.point)
    }
}
