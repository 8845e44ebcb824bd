//! Thread-safe cost model handle.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use jiff::tz::TimeZone;
use jiff::Zoned;

use super::error::PricingError;
use super::metrics::Evaluation;
use super::predictor::{CostPredictor, ModelSnapshot, TrainingReport};
use super::sample::{CostQuery, CostSample};

/// A [`CostPredictor`] shared between readers and an occasional trainer.
///
/// Training fits a copy of the model outside the lock and swaps it in, so
/// concurrent predictions see either the old or the new model, never a
/// partially trained one.
///
/// # Examples
///
/// ```
/// use u_dispatch::pricing::{CostQuery, SharedCostModel};
///
/// let model = SharedCostModel::default();
/// let reader = model.clone();
/// let price = std::thread::spawn(move || reader.predict(&CostQuery::new(10.0, 1)))
///     .join()
///     .unwrap();
/// assert!((200.0..=5000.0).contains(&price));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedCostModel {
    inner: Arc<RwLock<CostPredictor>>,
}

impl SharedCostModel {
    /// Wraps a predictor.
    pub fn new(predictor: CostPredictor) -> Self {
        Self {
            inner: Arc::new(RwLock::new(predictor)),
        }
    }

    /// Prices a query at the current time.
    pub fn predict(&self, query: &CostQuery) -> f64 {
        self.read().predict(query)
    }

    /// Prices a query as seen at `at`.
    pub fn predict_at(&self, query: &CostQuery, at: &Zoned) -> f64 {
        self.read().predict_at(query, at)
    }

    /// Trains a copy of the current model and publishes it.
    ///
    /// # Errors
    ///
    /// See [`CostPredictor::train`]. The published model is unchanged on error.
    pub fn train(&self, samples: &[CostSample]) -> Result<TrainingReport, PricingError> {
        let mut next = self.snapshot();
        let report = next.train(samples)?;
        *self.write() = next;
        Ok(report)
    }

    /// See [`CostPredictor::evaluate`].
    pub fn evaluate(&self, samples: &[CostSample]) -> Option<Evaluation> {
        self.read().evaluate(samples)
    }

    /// See [`CostPredictor::export`].
    pub fn export(&self) -> ModelSnapshot {
        self.read().export()
    }

    /// See [`CostPredictor::load`].
    pub fn load(&self, snapshot: ModelSnapshot) {
        self.write().load(snapshot);
    }

    /// Returns `true` once the shared model has been trained.
    pub fn is_trained(&self) -> bool {
        self.read().is_trained()
    }

    /// Time zone of the current predictor.
    pub fn time_zone(&self) -> TimeZone {
        self.read().time_zone().clone()
    }

    /// A copy of the current predictor.
    pub fn snapshot(&self) -> CostPredictor {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, CostPredictor> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CostPredictor> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
