//! Regression-based task pricing.
//!
//! A linear model predicts the price per cargo section from haul distance,
//! deadline urgency, current demand, and two calendar indicators (rush hour
//! and weekend). The model starts from fixed default coefficients and can be
//! refitted from completed transactions with batch gradient descent.
//!
//! - [`CostPredictor`]: predict, train, evaluate, export/load
//! - [`SharedCostModel`]: `Arc<RwLock<_>>` handle with swap-on-train
//! - [`split_samples`] / [`shuffle_split`]: train/test partitioning
//!
//! # Reference
//!
//! Hastie, Tibshirani & Friedman (2009). *The Elements of Statistical
//! Learning*, ch. 3 (linear regression).

mod descent;
mod error;
mod features;
mod metrics;
mod predictor;
mod sample;
mod shared;

pub use descent::{gradient_descent, DescentOutcome};
pub use error::PricingError;
pub use features::{
    is_peak_hour, is_weekend, urgency_hours, FeatureStats, Normalization, RawFeatures,
    DEFAULT_URGENCY_HOURS, MIN_URGENCY_HOURS, NUM_FEATURES, STD_EPSILON,
};
pub use metrics::Evaluation;
pub use predictor::{
    Coefficients, CostPredictor, ModelSnapshot, TrainingConfig, TrainingReport, COST_SCALE,
    MAX_COST, MIN_COST, SNAPSHOT_VERSION,
};
pub use sample::{shuffle_split, split_samples, CostQuery, CostSample};
pub use shared::SharedCostModel;
