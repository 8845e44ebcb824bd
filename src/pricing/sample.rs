//! Prediction queries and labelled training samples.

use jiff::Timestamp;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inputs needed to price one task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostQuery {
    /// Haul distance in kilometers.
    pub distance_km: f64,
    /// Delivery deadline, if any.
    pub deadline: Option<Timestamp>,
    /// Number of routes currently competing for vehicles.
    pub current_demand: u32,
}

impl CostQuery {
    /// Creates a query without a deadline.
    pub fn new(distance_km: f64, current_demand: u32) -> Self {
        Self {
            distance_km,
            deadline: None,
            current_demand,
        }
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: Timestamp) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// A completed transaction with its observed price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSample {
    /// Haul distance in kilometers.
    pub distance_km: f64,
    /// Delivery deadline, if any.
    pub deadline: Option<Timestamp>,
    /// Demand when the transaction was created.
    pub current_demand: u32,
    /// When the transaction was created.
    pub timestamp: Timestamp,
    /// Observed cost per section.
    pub actual_cost: f64,
}

impl CostSample {
    /// The query this sample answers.
    pub fn query(&self) -> CostQuery {
        CostQuery {
            distance_km: self.distance_km,
            deadline: self.deadline,
            current_demand: self.current_demand,
        }
    }
}

/// Splits samples in order: the first `train_ratio` share trains, the rest tests.
///
/// # Examples
///
/// ```
/// use jiff::Timestamp;
/// use u_dispatch::pricing::{split_samples, CostSample};
///
/// let s = CostSample {
///     distance_km: 10.0,
///     deadline: None,
///     current_demand: 1,
///     timestamp: Timestamp::UNIX_EPOCH,
///     actual_cost: 500.0,
/// };
/// let (train, test) = split_samples(&vec![s; 10], 0.8);
/// assert_eq!((train.len(), test.len()), (8, 2));
/// ```
pub fn split_samples(samples: &[CostSample], train_ratio: f64) -> (Vec<CostSample>, Vec<CostSample>) {
    let ratio = train_ratio.clamp(0.0, 1.0);
    let cut = ((samples.len() as f64) * ratio).floor() as usize;
    let (train, test) = samples.split_at(cut.min(samples.len()));
    (train.to_vec(), test.to_vec())
}

/// Shuffles the samples with `rng`, then splits them like [`split_samples`].
pub fn shuffle_split<R: Rng + ?Sized>(
    samples: &[CostSample],
    train_ratio: f64,
    rng: &mut R,
) -> (Vec<CostSample>, Vec<CostSample>) {
    let mut shuffled = samples.to_vec();
    shuffled.shuffle(rng);
    split_samples(&shuffled, train_ratio)
}
