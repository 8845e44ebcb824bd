//! Capacity-constrained package assignment.
//!
//! - [`select_packages`]: greedy proximity-first selection, O(n log n)

mod greedy;

pub use greedy::{select_packages, Candidate, Selection, ZERO_DISTANCE_EFFICIENCY};
