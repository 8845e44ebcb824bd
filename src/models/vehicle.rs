//! Vehicle (container) type with section capacity.

use serde::{Deserialize, Serialize};

use super::VehicleId;
use crate::distance::GeoPoint;

/// Whether a vehicle is currently running a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    /// No active route.
    Idle,
    /// Executing a route.
    Active,
}

/// Rejected change to a vehicle's load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    /// Loading would exceed total capacity.
    #[error("{vehicle}: loading {requested} sections exceeds the {available} available")]
    Overflow {
        /// Vehicle being loaded.
        vehicle: VehicleId,
        /// Sections requested.
        requested: u32,
        /// Sections available.
        available: u32,
    },
    /// Unloading more than is on board.
    #[error("{vehicle}: unloading {requested} sections but only {used} are loaded")]
    Underflow {
        /// Vehicle being unloaded.
        vehicle: VehicleId,
        /// Sections requested.
        requested: u32,
        /// Sections currently loaded.
        used: u32,
    },
}

/// Read-only view of a vehicle's capacity.
///
/// `available` is always `total - used`.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::CapacitySnapshot;
///
/// let cap = CapacitySnapshot::new(10, 9);
/// assert_eq!(cap.available(), 1);
/// assert!((cap.fill_ratio() - 0.9).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacitySnapshot {
    total: u32,
    used: u32,
}

impl CapacitySnapshot {
    /// Creates a snapshot. `used` is clamped to `total`.
    pub fn new(total: u32, used: u32) -> Self {
        Self {
            total,
            used: used.min(total),
        }
    }

    /// Total sections.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Occupied sections.
    pub fn used(&self) -> u32 {
        self.used
    }

    /// Free sections.
    pub fn available(&self) -> u32 {
        self.total - self.used
    }

    /// `used / total`; a zero-capacity vehicle is measured against one section.
    pub fn fill_ratio(&self) -> f64 {
        f64::from(self.used) / f64::from(self.total.max(1))
    }

    /// Snapshot after picking up `sections` (saturating at total).
    pub fn after_pickup(self, sections: u32) -> Self {
        Self::new(self.total, self.used.saturating_add(sections))
    }

    /// Snapshot after delivering `sections` (saturating at zero).
    pub fn after_delivery(self, sections: u32) -> Self {
        Self::new(self.total, self.used.saturating_sub(sections))
    }
}

/// A capacity-limited vehicle that executes one route at a time.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::GeoPoint;
/// use u_dispatch::models::{Vehicle, VehicleId};
///
/// let mut v = Vehicle::new(VehicleId::new(0), 20, GeoPoint::new(0.0, 0.0));
/// v.load(5).unwrap();
/// assert_eq!(v.used(), 5);
/// assert_eq!(v.available(), 15);
/// assert!(v.load(16).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    total: u32,
    used: u32,
    location: GeoPoint,
    status: VehicleStatus,
}

impl Vehicle {
    /// Creates an empty, idle vehicle with the given capacity and position.
    pub fn new(id: VehicleId, total: u32, location: GeoPoint) -> Self {
        Self {
            id,
            total,
            used: 0,
            location,
            status: VehicleStatus::Idle,
        }
    }

    /// Starts the vehicle with `used` sections already on board.
    pub fn with_load(mut self, used: u32) -> Result<Self, CapacityError> {
        self.load(used)?;
        Ok(self)
    }

    /// Vehicle id.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Total capacity in sections.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Occupied sections.
    pub fn used(&self) -> u32 {
        self.used
    }

    /// Free sections (`total - used`).
    pub fn available(&self) -> u32 {
        self.total - self.used
    }

    /// Current position.
    pub fn location(&self) -> GeoPoint {
        self.location
    }

    /// Current status.
    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    /// Capacity view for the scheduler.
    pub fn capacity(&self) -> CapacitySnapshot {
        CapacitySnapshot::new(self.total, self.used)
    }

    /// Adds `sections` to the load.
    pub fn load(&mut self, sections: u32) -> Result<(), CapacityError> {
        if sections > self.available() {
            return Err(CapacityError::Overflow {
                vehicle: self.id,
                requested: sections,
                available: self.available(),
            });
        }
        self.used += sections;
        Ok(())
    }

    /// Removes `sections` from the load.
    pub fn unload(&mut self, sections: u32) -> Result<(), CapacityError> {
        if sections > self.used {
            return Err(CapacityError::Underflow {
                vehicle: self.id,
                requested: sections,
                used: self.used,
            });
        }
        self.used -= sections;
        Ok(())
    }

    /// Moves the vehicle.
    pub fn move_to(&mut self, location: GeoPoint) {
        self.location = location;
    }

    /// Sets the status.
    pub fn set_status(&mut self, status: VehicleStatus) {
        self.status = status;
    }
}
