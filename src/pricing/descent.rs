//! Batch gradient descent for least squares.
//!
//! # Algorithm
//!
//! Each iteration computes all predictions `X·θ`, the residuals against
//! `y`, and updates every coefficient with the mean gradient:
//!
//! ```text
//! θ_j ← θ_j − α · (1/m) Σ_i (x_i·θ − y_i) · x_ij
//! ```
//!
//! # Complexity
//!
//! O(iterations · m · n) for m samples and n features.

use tracing::debug;

use super::features::NUM_FEATURES;

/// Result of a descent run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescentOutcome {
    /// Fitted coefficients.
    pub theta: [f64; NUM_FEATURES],
    /// Mean squared error of the fitted coefficients.
    pub mse: f64,
}

/// Minimizes mean squared error from the starting coefficients `theta`.
pub fn gradient_descent(
    x: &[[f64; NUM_FEATURES]],
    y: &[f64],
    mut theta: [f64; NUM_FEATURES],
    learning_rate: f64,
    iterations: usize,
) -> DescentOutcome {
    let m = x.len().min(y.len());
    if m == 0 {
        return DescentOutcome { theta, mse: 0.0 };
    }
    let inv_m = 1.0 / m as f64;
    let mut errors = vec![0.0; m];

    for iter in 0..iterations {
        for (i, row) in x.iter().take(m).enumerate() {
            errors[i] = dot(row, &theta) - y[i];
        }

        let mut gradient = [0.0; NUM_FEATURES];
        for (row, error) in x.iter().zip(&errors) {
            for (g, xij) in gradient.iter_mut().zip(row) {
                *g += error * xij;
            }
        }
        for (t, g) in theta.iter_mut().zip(&gradient) {
            *t -= learning_rate * g * inv_m;
        }

        if iter % 100 == 0 {
            let mse = errors.iter().map(|e| e * e).sum::<f64>() * inv_m;
            debug!(iteration = iter, mse, "gradient descent");
        }
    }

    let mse = x
        .iter()
        .zip(y)
        .map(|(row, yi)| (dot(row, &theta) - yi).powi(2))
        .sum::<f64>()
        * inv_m;
    DescentOutcome { theta, mse }
}

pub(crate) fn dot(row: &[f64; NUM_FEATURES], theta: &[f64; NUM_FEATURES]) -> f64 {
    row.iter().zip(theta).map(|(a, b)| a * b).sum()
}
