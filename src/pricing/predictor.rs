//! Linear regression cost predictor.

use std::time::Instant;

use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::descent::{dot, gradient_descent};
use super::error::PricingError;
use super::features::{Normalization, RawFeatures, NUM_FEATURES};
use super::metrics::{round_to, Evaluation};
use super::sample::{CostQuery, CostSample};

/// Lowest price the model will quote per section.
pub const MIN_COST: f64 = 200.0;

/// Highest price the model will quote per section.
pub const MAX_COST: f64 = 5000.0;

/// The regression works in hundreds of currency units.
pub const COST_SCALE: f64 = 100.0;

/// Format version written into snapshots.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Regression weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    /// Bias term.
    pub intercept: f64,
    /// Weight of normalized distance.
    pub distance: f64,
    /// Weight of normalized urgency.
    pub urgency: f64,
    /// Weight of normalized demand.
    pub demand: f64,
    /// Weight of the rush-hour indicator.
    pub peak_hour: f64,
    /// Weight of the weekend indicator.
    pub weekend: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            intercept: 5.0,
            distance: 0.5,
            urgency: 0.3,
            demand: 0.2,
            peak_hour: 1.5,
            weekend: 2.0,
        }
    }
}

impl Coefficients {
    /// Starting point for gradient descent: only the intercept is set.
    pub fn initial() -> Self {
        Self::from_array([5.0, 0.0, 0.0, 0.0, 0.0, 0.0])
    }

    /// Weights in design-matrix column order.
    pub fn as_array(&self) -> [f64; NUM_FEATURES] {
        [
            self.intercept,
            self.distance,
            self.urgency,
            self.demand,
            self.peak_hour,
            self.weekend,
        ]
    }

    /// Inverse of [`as_array`](Self::as_array).
    pub fn from_array(theta: [f64; NUM_FEATURES]) -> Self {
        let [intercept, distance, urgency, demand, peak_hour, weekend] = theta;
        Self {
            intercept,
            distance,
            urgency,
            demand,
            peak_hour,
            weekend,
        }
    }
}

/// Gradient descent settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Step size.
    pub learning_rate: f64,
    /// Number of full-batch iterations.
    pub iterations: usize,
    /// Smallest batch accepted by [`CostPredictor::train`].
    pub min_samples: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            iterations: 1000,
            min_samples: 10,
        }
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    /// Samples used.
    pub samples: usize,
    /// Final mean squared error, in regression units.
    pub mse: f64,
    /// Wall time spent fitting.
    pub duration: std::time::Duration,
}

/// Serializable model state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Regression weights.
    pub coefficients: Coefficients,
    /// Feature statistics.
    pub normalization: Normalization,
    /// When the model was last trained.
    pub trained_at: Option<Timestamp>,
    /// Snapshot format version.
    pub version: String,
}

/// Predicts the price per cargo section of a task.
///
/// ```text
/// cost = 100 × (b + w_d·d' + w_u·u' + w_dm·dm' + w_p·peak + w_w·weekend)
/// ```
///
/// clamped to [`MIN_COST`]..=[`MAX_COST`] and rounded to 2 decimals. Primed
/// features are z-scores. Peak and weekend are evaluated in the predictor's
/// time zone.
///
/// An untrained predictor uses fixed default coefficients, so prices are
/// always available.
///
/// # Examples
///
/// ```
/// use jiff::tz::TimeZone;
/// use jiff::Timestamp;
/// use u_dispatch::pricing::{CostPredictor, CostQuery};
///
/// let model = CostPredictor::new().with_time_zone(TimeZone::UTC);
/// // Tuesday noon: neither peak nor weekend.
/// let at = "2026-03-03T12:00:00Z".parse::<Timestamp>().unwrap().to_zoned(TimeZone::UTC);
/// let price = model.predict_at(&CostQuery::new(50.0, 5), &at);
/// assert_eq!(price, 560.0);
/// assert!(!model.is_trained());
/// ```
#[derive(Debug, Clone)]
pub struct CostPredictor {
    coefficients: Coefficients,
    normalization: Normalization,
    trained_at: Option<Timestamp>,
    time_zone: TimeZone,
    config: TrainingConfig,
}

impl Default for CostPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl CostPredictor {
    /// Creates an untrained predictor in the system time zone.
    pub fn new() -> Self {
        Self {
            coefficients: Coefficients::default(),
            normalization: Normalization::default(),
            trained_at: None,
            time_zone: TimeZone::system(),
            config: TrainingConfig::default(),
        }
    }

    /// Restores a predictor from a snapshot.
    pub fn from_snapshot(snapshot: ModelSnapshot) -> Self {
        let mut predictor = Self::new();
        predictor.load(snapshot);
        predictor
    }

    /// Sets the time zone used for peak-hour and weekend features.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Sets the training parameters.
    pub fn with_config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Current feature statistics.
    pub fn normalization(&self) -> &Normalization {
        &self.normalization
    }

    /// Training parameters.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Time zone used for calendar features.
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// When the model was last trained.
    pub fn trained_at(&self) -> Option<Timestamp> {
        self.trained_at
    }

    /// Returns `true` once the model has been trained or loaded from a
    /// trained snapshot.
    pub fn is_trained(&self) -> bool {
        self.trained_at.is_some()
    }

    /// Prices a query at the current time.
    pub fn predict(&self, query: &CostQuery) -> f64 {
        let now = Timestamp::now().to_zoned(self.time_zone.clone());
        self.predict_at(query, &now)
    }

    /// Prices a query as seen at `at`.
    ///
    /// A non-finite linear value (diverged weights) yields [`MIN_COST`].
    pub fn predict_at(&self, query: &CostQuery, at: &Zoned) -> f64 {
        let raw = RawFeatures::extract(query.distance_km, query.deadline, query.current_demand, at);
        let row = self.normalization.row(&raw);
        let value = COST_SCALE * dot(&row, &self.coefficients.as_array());
        if value.is_nan() {
            return MIN_COST;
        }
        round_to(value.clamp(MIN_COST, MAX_COST), 2)
    }

    /// Fits coefficients and normalization to `samples`.
    ///
    /// Calendar and urgency features of each sample are taken relative to
    /// the sample's own timestamp. On error the model is unchanged.
    ///
    /// # Errors
    ///
    /// [`PricingError::InsufficientData`] with fewer than
    /// `config.min_samples` samples.
    pub fn train(&mut self, samples: &[CostSample]) -> Result<TrainingReport, PricingError> {
        if samples.len() < self.config.min_samples {
            warn!(
                samples = samples.len(),
                required = self.config.min_samples,
                "not enough samples to train cost model"
            );
            return Err(PricingError::InsufficientData {
                required: self.config.min_samples,
                actual: samples.len(),
            });
        }

        let started = Instant::now();
        let raw: Vec<RawFeatures> = samples
            .iter()
            .map(|s| self.features_of(s))
            .collect();
        let normalization = Normalization::fit(&raw);
        let x: Vec<[f64; NUM_FEATURES]> = raw.iter().map(|r| normalization.row(r)).collect();
        let y: Vec<f64> = samples.iter().map(|s| s.actual_cost / COST_SCALE).collect();

        let outcome = gradient_descent(
            &x,
            &y,
            Coefficients::initial().as_array(),
            self.config.learning_rate,
            self.config.iterations,
        );

        self.coefficients = Coefficients::from_array(outcome.theta);
        self.normalization = normalization;
        self.trained_at = Some(Timestamp::now());

        let report = TrainingReport {
            samples: samples.len(),
            mse: outcome.mse,
            duration: started.elapsed(),
        };
        info!(
            samples = report.samples,
            mse = report.mse,
            elapsed_ms = report.duration.as_millis() as u64,
            "cost model trained"
        );
        Ok(report)
    }

    /// MAE, RMSE and R² of the model on labelled samples, each predicted
    /// at its own timestamp. `None` when `samples` is empty.
    pub fn evaluate(&self, samples: &[CostSample]) -> Option<Evaluation> {
        let predicted: Vec<f64> = samples
            .iter()
            .map(|s| self.predict_at(&s.query(), &s.timestamp.to_zoned(self.time_zone.clone())))
            .collect();
        let actual: Vec<f64> = samples.iter().map(|s| s.actual_cost).collect();
        Evaluation::from_pairs(&predicted, &actual)
    }

    /// Captures the model state.
    pub fn export(&self) -> ModelSnapshot {
        ModelSnapshot {
            coefficients: self.coefficients,
            normalization: self.normalization,
            trained_at: self.trained_at,
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    /// Replaces the model state with a snapshot.
    ///
    /// The coefficients take effect whether or not the snapshot was trained.
    /// [`is_trained`](Self::is_trained) follows `snapshot.trained_at`, so a
    /// snapshot exported before training loads as untrained.
    pub fn load(&mut self, snapshot: ModelSnapshot) {
        if snapshot.version != SNAPSHOT_VERSION {
            warn!(version = %snapshot.version, "loading cost model snapshot of unknown version");
        }
        self.coefficients = snapshot.coefficients;
        self.normalization = snapshot.normalization;
        self.trained_at = snapshot.trained_at;
        info!(trained = self.is_trained(), "cost model loaded");
    }

    /// Serializes the model state to JSON.
    pub fn export_json(&self) -> Result<String, PricingError> {
        Ok(serde_json::to_string(&self.export())?)
    }

    /// Loads model state from JSON. On error the model is unchanged.
    pub fn load_json(&mut self, json: &str) -> Result<(), PricingError> {
        let snapshot: ModelSnapshot = serde_json::from_str(json)?;
        self.load(snapshot);
        Ok(())
    }

    fn features_of(&self, sample: &CostSample) -> RawFeatures {
        let at = sample.timestamp.to_zoned(self.time_zone.clone());
        RawFeatures::extract(sample.distance_km, sample.deadline, sample.current_demand, &at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    /// Tuesday 2026-03-03 12:00 UTC.
    fn tuesday_noon() -> Timestamp {
        "2026-03-03T12:00:00Z".parse().expect("valid timestamp")
    }

    fn utc(ts: Timestamp) -> Zoned {
        ts.to_zoned(TimeZone::UTC)
    }

    fn model() -> CostPredictor {
        CostPredictor::new().with_time_zone(TimeZone::UTC)
    }

    fn linear_samples(n: usize) -> Vec<CostSample> {
        (0..n)
            .map(|i| {
                let d = 10.0 + 2.0 * i as f64;
                CostSample {
                    distance_km: d,
                    deadline: None,
                    current_demand: 2,
                    timestamp: tuesday_noon(),
                    actual_cost: 1000.0 + 20.0 * d,
                }
            })
            .collect()
    }

    #[test]
    fn test_default_prediction() {
        // 100 × (5 + 0 + 0.3·2 + 0) = 560 at the normalization means.
        let p = model().predict_at(&CostQuery::new(50.0, 5), &utc(tuesday_noon()));
        assert!((p - 560.0).abs() < 1e-10);
    }

    #[test]
    fn test_peak_and_weekend_raise_price() {
        let q = CostQuery::new(50.0, 5);
        let m = model();
        // 2026-03-03 08:00 UTC, Tuesday rush hour.
        let peak = utc("2026-03-03T08:00:00Z".parse().expect("valid"));
        // 2026-03-07 12:00 UTC, Saturday.
        let weekend = utc("2026-03-07T12:00:00Z".parse().expect("valid"));
        assert!((m.predict_at(&q, &peak) - 710.0).abs() < 1e-10);
        assert!((m.predict_at(&q, &weekend) - 760.0).abs() < 1e-10);
    }

    #[test]
    fn test_urgency_uses_deadline() {
        let now = tuesday_noon();
        let q = CostQuery::new(50.0, 5).with_deadline(now + SignedDuration::from_hours(12));
        // Urgency 12h sits at the mean.
        assert!((model().predict_at(&q, &utc(now)) - 500.0).abs() < 1e-10);
    }

    #[test]
    fn test_prediction_clamped() {
        let m = model();
        let at = utc(tuesday_noon());
        assert_eq!(m.predict_at(&CostQuery::new(1e6, 5), &at), MAX_COST);

        let mut snapshot = m.export();
        snapshot.coefficients.intercept = -100.0;
        let cheap = CostPredictor::from_snapshot(snapshot).with_time_zone(TimeZone::UTC);
        assert_eq!(cheap.predict_at(&CostQuery::new(50.0, 5), &at), MIN_COST);
    }

    #[test]
    fn test_nine_samples_rejected() {
        let mut m = model();
        let err = m.train(&linear_samples(9)).unwrap_err();
        assert!(matches!(
            err,
            PricingError::InsufficientData {
                required: 10,
                actual: 9
            }
        ));
        assert!(!m.is_trained());
        assert_eq!(m.coefficients(), &Coefficients::default());
    }

    #[test]
    fn test_training_improves_fit() {
        let samples = linear_samples(45);
        let (train, test) = crate::pricing::split_samples(&samples, 0.8);

        let mut m = model();
        let before = m.evaluate(&test).expect("non-empty");
        let report = m.train(&train).expect("enough samples");
        let after = m.evaluate(&test).expect("non-empty");

        assert_eq!(report.samples, 36);
        assert!(m.is_trained());
        assert!(after.r_squared > before.r_squared);
        assert!(after.r_squared > 0.99);
        assert!(after.mae < 1.0);
        // Constant features normalize to zero and stay untouched.
        assert_eq!(m.coefficients().peak_hour, 0.0);
        assert_eq!(m.coefficients().weekend, 0.0);
    }

    #[test]
    fn test_evaluate_empty() {
        assert!(model().evaluate(&[]).is_none());
    }

    #[test]
    fn test_min_samples_configurable() {
        let mut m = model().with_config(TrainingConfig {
            min_samples: 3,
            ..TrainingConfig::default()
        });
        assert!(m.train(&linear_samples(3)).is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let mut m = model();
        m.train(&linear_samples(20)).expect("enough samples");
        let json = m.export_json().expect("serializable");

        let mut restored = model();
        restored.load_json(&json).expect("valid snapshot");
        assert_eq!(restored.export(), m.export());

        let q = CostQuery::new(37.5, 4);
        let at = utc(tuesday_noon());
        assert_eq!(restored.predict_at(&q, &at), m.predict_at(&q, &at));
    }

    #[test]
    fn test_load_keeps_trained_flag_of_snapshot() {
        let at = utc(tuesday_noon());
        let q = CostQuery::new(50.0, 5);

        let mut untrained = model().export();
        untrained.coefficients.intercept = 6.0;
        let mut m = model();
        m.load(untrained);
        assert!(!m.is_trained());
        assert_eq!(m.trained_at(), None);
        // One more unit of intercept adds 100 to the default 560.
        assert!((m.predict_at(&q, &at) - 660.0).abs() < 1e-10);

        let mut trained = model();
        trained.train(&linear_samples(20)).expect("enough samples");
        m.load(trained.export());
        assert!(m.is_trained());
        assert_eq!(m.trained_at(), trained.trained_at());
    }

    #[test]
    fn test_load_invalid_json() {
        let mut m = model();
        assert!(matches!(
            m.load_json("{not json"),
            Err(PricingError::Snapshot(_))
        ));
        assert_eq!(m.coefficients(), &Coefficients::default());
    }

    #[test]
    fn test_coefficients_array() {
        let c = Coefficients::default();
        assert_eq!(Coefficients::from_array(c.as_array()), c);
        assert_eq!(Coefficients::initial().as_array(), [5.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }
}
