//! Regression quality metrics.

use serde::{Deserialize, Serialize};

/// Error metrics of a model on labelled samples.
///
/// MAE and RMSE are rounded to 2 decimals and R² to 3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Mean absolute error.
    pub mae: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Coefficient of determination. `NaN` when every label is identical.
    pub r_squared: f64,
    /// Number of samples evaluated.
    pub sample_size: usize,
}

impl Evaluation {
    /// Computes metrics from paired predictions and labels.
    ///
    /// Returns `None` for empty input.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_dispatch::pricing::Evaluation;
    ///
    /// let e = Evaluation::from_pairs(&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0]).unwrap();
    /// assert_eq!(e.mae, 0.33);
    /// assert_eq!(e.sample_size, 3);
    /// assert!(Evaluation::from_pairs(&[], &[]).is_none());
    /// ```
    pub fn from_pairs(predicted: &[f64], actual: &[f64]) -> Option<Self> {
        let n = predicted.len().min(actual.len());
        if n == 0 {
            return None;
        }
        let nf = n as f64;
        let errors: Vec<f64> = predicted.iter().zip(actual).map(|(p, a)| p - a).collect();

        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / nf;
        let ss_residual = errors.iter().map(|e| e * e).sum::<f64>();
        let rmse = (ss_residual / nf).sqrt();

        let mean_actual = actual.iter().take(n).sum::<f64>() / nf;
        let ss_total = actual
            .iter()
            .take(n)
            .map(|a| (a - mean_actual).powi(2))
            .sum::<f64>();
        let r_squared = if ss_total == 0.0 {
            f64::NAN
        } else {
            1.0 - ss_residual / ss_total
        };

        Some(Self {
            mae: round_to(mae, 2),
            rmse: round_to(rmse, 2),
            r_squared: round_to(r_squared, 3),
            sample_size: n,
        })
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_fit() {
        let e = Evaluation::from_pairs(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).expect("non-empty");
        assert_eq!(e.mae, 0.0);
        assert_eq!(e.rmse, 0.0);
        assert_eq!(e.r_squared, 1.0);
    }

    #[test]
    fn test_known_values() {
        // errors: +1, -1, +2, -2 -> MAE 1.5, MSE 2.5
        let actual = [10.0, 20.0, 30.0, 40.0];
        let predicted = [11.0, 19.0, 32.0, 38.0];
        let e = Evaluation::from_pairs(&predicted, &actual).expect("non-empty");
        assert_eq!(e.mae, 1.5);
        assert_eq!(e.rmse, round_to(2.5f64.sqrt(), 2));
        // SS_tot = 500, SS_res = 10
        assert_eq!(e.r_squared, 0.98);
        assert_eq!(e.sample_size, 4);
    }

    #[test]
    fn test_constant_labels_nan() {
        let e = Evaluation::from_pairs(&[1.0, 2.0], &[5.0, 5.0]).expect("non-empty");
        assert!(e.r_squared.is_nan());
        assert_eq!(e.mae, 3.5);
    }

    #[test]
    fn test_worse_than_mean_negative() {
        let e = Evaluation::from_pairs(&[10.0, 0.0], &[0.0, 10.0]).expect("non-empty");
        assert!(e.r_squared < 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.2356, 3), 1.236);
    }
}
