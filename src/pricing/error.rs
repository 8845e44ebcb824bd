//! Cost model errors.

/// Failure to train, export or load a cost model.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    /// Too few samples to fit the regression.
    #[error("training needs at least {required} samples, got {actual}")]
    InsufficientData {
        /// Minimum sample count.
        required: usize,
        /// Samples supplied.
        actual: usize,
    },
    /// A snapshot could not be serialized or parsed.
    #[error("invalid model snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
