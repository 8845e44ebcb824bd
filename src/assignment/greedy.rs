//! Greedy proximity-weighted package selection.
//!
//! # Algorithm
//!
//! Every candidate gets an efficiency of `1 / d`, where `d` is the
//! great-circle distance from the vehicle to the candidate's producer.
//! Candidates are stably sorted by descending efficiency and accepted in
//! that order whenever their sections still fit; the scan stops as soon as
//! the vehicle is full.
//!
//! # Complexity
//!
//! O(n log n) where n = number of candidates.
//!
//! # Limitations
//!
//! This is a greedy approximation of a bounded knapsack. A skipped large
//! package is never reconsidered, so the selection is feasible but not
//! necessarily the one that uses the most capacity.

use serde::{Deserialize, Serialize};

use crate::distance::GeoPoint;
use crate::models::{Package, PackageId};

/// Efficiency assigned to a producer at the vehicle's exact position.
pub const ZERO_DISTANCE_EFFICIENCY: f64 = 1000.0;

/// A package offered to the assignment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Package being offered.
    pub package: PackageId,
    /// Coordinates of the package's producer.
    pub producer: GeoPoint,
    /// Capacity the package needs.
    pub required_sections: u32,
}

impl Candidate {
    /// Creates a candidate.
    pub fn new(package: PackageId, producer: GeoPoint, required_sections: u32) -> Self {
        Self {
            package,
            producer,
            required_sections,
        }
    }

    /// Proximity efficiency relative to `from`.
    pub fn efficiency(&self, from: &GeoPoint) -> f64 {
        let distance = from.distance_km(&self.producer);
        if distance > 0.0 {
            1.0 / distance
        } else {
            ZERO_DISTANCE_EFFICIENCY
        }
    }
}

impl From<&Package> for Candidate {
    fn from(package: &Package) -> Self {
        Self::new(
            package.id(),
            package.producer().point,
            package.required_sections(),
        )
    }
}

/// Accepted candidates and the capacity they consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Accepted candidates in acceptance order.
    pub selected: Vec<Candidate>,
    /// Sum of the accepted candidates' sections.
    pub used_capacity: u32,
}

impl Selection {
    /// Returns `true` if nothing was accepted.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Ids of the accepted packages.
    pub fn package_ids(&self) -> Vec<PackageId> {
        self.selected.iter().map(|c| c.package).collect()
    }
}

/// Greedily picks the closest packages that fit in `available_capacity`.
///
/// The result never exceeds `available_capacity`. Ties in efficiency keep
/// input order. An empty selection is a valid outcome.
///
/// # Examples
///
/// ```
/// use u_dispatch::assignment::{select_packages, Candidate};
/// use u_dispatch::distance::GeoPoint;
/// use u_dispatch::models::PackageId;
///
/// let here = GeoPoint::new(0.0, 0.0);
/// let candidates = vec![
///     Candidate::new(PackageId::new(1), GeoPoint::new(0.0, 0.01), 4),
///     Candidate::new(PackageId::new(2), GeoPoint::new(0.0, 0.02), 4),
///     Candidate::new(PackageId::new(3), GeoPoint::new(0.0, 0.03), 4),
/// ];
/// let sel = select_packages(&candidates, &here, 10);
/// assert_eq!(sel.package_ids(), vec![PackageId::new(1), PackageId::new(2)]);
/// assert_eq!(sel.used_capacity, 8);
/// ```
pub fn select_packages(
    candidates: &[Candidate],
    vehicle_location: &GeoPoint,
    available_capacity: u32,
) -> Selection {
    let mut scored: Vec<(f64, &Candidate)> = candidates
        .iter()
        .map(|c| (c.efficiency(vehicle_location), c))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut selection = Selection::default();
    for (_, candidate) in scored {
        if selection.used_capacity >= available_capacity {
            break;
        }
        let remaining = available_capacity - selection.used_capacity;
        if candidate.required_sections <= remaining {
            selection.used_capacity += candidate.required_sections;
            selection.selected.push(*candidate);
        }
    }
    selection
}
