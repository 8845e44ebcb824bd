//! Feature extraction and z-score normalization.

use jiff::civil::Weekday;
use jiff::{Timestamp, Zoned};
use serde::{Deserialize, Serialize};

/// Urgency assumed when a package has no deadline, in hours.
pub const DEFAULT_URGENCY_HOURS: f64 = 24.0;

/// Lower bound on urgency, in hours.
pub const MIN_URGENCY_HOURS: f64 = 0.5;

/// Standard deviations below this are treated as degenerate.
pub const STD_EPSILON: f64 = 1e-9;

/// Number of model inputs including the intercept.
pub const NUM_FEATURES: usize = 6;

/// Hours until the deadline, floored at half an hour; 24 without a deadline.
///
/// # Examples
///
/// ```
/// use jiff::{SignedDuration, Timestamp};
/// use u_dispatch::pricing::urgency_hours;
///
/// let now = Timestamp::UNIX_EPOCH;
/// assert_eq!(urgency_hours(None, now), 24.0);
/// assert_eq!(urgency_hours(Some(now + SignedDuration::from_hours(6)), now), 6.0);
/// assert_eq!(urgency_hours(Some(now - SignedDuration::from_hours(6)), now), 0.5);
/// ```
pub fn urgency_hours(deadline: Option<Timestamp>, now: Timestamp) -> f64 {
    match deadline {
        Some(deadline) => {
            let hours = deadline.duration_since(now).as_secs_f64() / 3600.0;
            hours.max(MIN_URGENCY_HOURS)
        }
        None => DEFAULT_URGENCY_HOURS,
    }
}

/// Morning (07–09) or evening (17–19) rush hour, hours inclusive.
pub fn is_peak_hour(hour: i8) -> bool {
    (7..=9).contains(&hour) || (17..=19).contains(&hour)
}

/// Saturday or Sunday.
pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Saturday | Weekday::Sunday)
}

/// Un-normalized model inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFeatures {
    /// Haul distance in kilometers.
    pub distance_km: f64,
    /// Hours until the deadline.
    pub urgency_hours: f64,
    /// Active demand.
    pub demand: f64,
    /// Rush-hour indicator.
    pub peak_hour: bool,
    /// Weekend indicator.
    pub weekend: bool,
}

impl RawFeatures {
    /// Extracts features as seen at local time `at`.
    pub fn extract(distance_km: f64, deadline: Option<Timestamp>, demand: u32, at: &Zoned) -> Self {
        Self {
            distance_km,
            urgency_hours: urgency_hours(deadline, at.timestamp()),
            demand: f64::from(demand),
            peak_hour: is_peak_hour(at.hour()),
            weekend: is_weekend(at.weekday()),
        }
    }
}

/// Mean and standard deviation of one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    /// Mean.
    pub mean: f64,
    /// Standard deviation.
    pub std: f64,
}

impl FeatureStats {
    /// Creates stats from mean and standard deviation.
    pub const fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }

    /// Population mean and standard deviation of `values`.
    ///
    /// A deviation below [`STD_EPSILON`] (constant feature) is replaced by 1
    /// so the feature normalizes to zero instead of dividing by zero.
    pub fn fit(values: impl ExactSizeIterator<Item = f64> + Clone) -> Self {
        let n = values.len().max(1) as f64;
        let mean = values.clone().sum::<f64>() / n;
        let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();
        Self {
            mean,
            std: if std < STD_EPSILON { 1.0 } else { std },
        }
    }

    /// Z-score of `value`.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            return 0.0;
        }
        (value - self.mean) / self.std
    }
}

/// Normalization parameters for the continuous features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    /// Distance statistics.
    pub distance: FeatureStats,
    /// Urgency statistics.
    pub urgency: FeatureStats,
    /// Demand statistics.
    pub demand: FeatureStats,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            distance: FeatureStats::new(50.0, 30.0),
            urgency: FeatureStats::new(12.0, 6.0),
            demand: FeatureStats::new(5.0, 3.0),
        }
    }
}

impl Normalization {
    /// Fits statistics to a batch of raw features.
    pub fn fit(rows: &[RawFeatures]) -> Self {
        Self {
            distance: FeatureStats::fit(rows.iter().map(|r| r.distance_km)),
            urgency: FeatureStats::fit(rows.iter().map(|r| r.urgency_hours)),
            demand: FeatureStats::fit(rows.iter().map(|r| r.demand)),
        }
    }

    /// Design-matrix row: `[1, distance', urgency', demand', peak, weekend]`.
    pub fn row(&self, raw: &RawFeatures) -> [f64; NUM_FEATURES] {
        [
            1.0,
            self.distance.normalize(raw.distance_km),
            self.urgency.normalize(raw.urgency_hours),
            self.demand.normalize(raw.demand),
            if raw.peak_hour { 1.0 } else { 0.0 },
            if raw.weekend { 1.0 } else { 0.0 },
        ]
    }
}
