//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::planner::PLANNING_SPEED_KMH;
use crate::pricing::TrainingConfig;
use crate::scheduling::PriorityWeights;

/// Tunables of a [`Dispatcher`](crate::dispatch::Dispatcher).
///
/// Every field has a default, so a JSON document only needs the keys it
/// overrides.
///
/// # Examples
///
/// ```
/// use u_dispatch::config::DispatchConfig;
///
/// let config = DispatchConfig::from_json(r#"{ "average_speed_kmh": 50.0 }"#).unwrap();
/// assert_eq!(config.average_speed_kmh, 50.0);
/// assert_eq!(config.planning_speed_kmh, 40.0);
/// assert_eq!(config.training.iterations, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Weights of the task priority score.
    pub priority: PriorityWeights,
    /// Cost model training parameters.
    pub training: TrainingConfig,
    /// Speed used to estimate travel minutes on edges without explicit data.
    pub planning_speed_kmh: f64,
    /// Speed used for delivery time estimates.
    pub average_speed_kmh: f64,
    /// Relative slack added to delivery time estimates.
    pub estimate_buffer: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            priority: PriorityWeights::default(),
            training: TrainingConfig::default(),
            planning_speed_kmh: PLANNING_SPEED_KMH,
            average_speed_kmh: 60.0,
            estimate_buffer: 0.1,
        }
    }
}

impl DispatchConfig {
    /// Parses a configuration from JSON, filling missing keys with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the priority weights.
    pub fn with_priority(mut self, priority: PriorityWeights) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the training parameters.
    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }

    /// Sets the planning speed.
    pub fn with_planning_speed(mut self, kmh: f64) -> Self {
        self.planning_speed_kmh = kmh;
        self
    }

    /// Sets the average speed for delivery estimates.
    pub fn with_average_speed(mut self, kmh: f64) -> Self {
        self.average_speed_kmh = kmh;
        self
    }

    /// Sets the delivery estimate buffer.
    pub fn with_estimate_buffer(mut self, buffer: f64) -> Self {
        self.estimate_buffer = buffer;
        self
    }
}
