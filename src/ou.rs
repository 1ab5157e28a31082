//! Discrete Ornstein-Uhlenbeck estimation and t-score transformation.
//!
//! The spread increment is modeled as a discrete-time mean-reverting process:
//!
//! ```text
//! Δx_t = θ(μ − x_{t−1}) + ε_t,    ε_t ~ iid, std σ
//! ```
//!
//! which is the AR(1) form `x_t = a + b·x_{t−1} + ε_t`. Estimation is
//! ordinary least squares of `x_t` on `x_{t−1}` over the training window,
//! recovering:
//!
//! ```text
//! reversion_rate θ = −ln(b)        (requires 0 < b < 1)
//! mean           μ = a / (1 − b)
//! noise_std      σ = sample std of the regression residuals
//! ```
//!
//! The fitted model turns any slice of the underlying spread, in or out of
//! the fitting window, into a standardized deviation score:
//!
//! ```text
//! score_t = (x_t − μ) / σ
//! ```
//!
//! Fitting is deterministic and side-effect free; a series whose estimated
//! `b` falls outside `(0, 1)` is rejected as non-mean-reverting so the fold
//! assembler can mark the cell and move on.

use crate::error::FitError;
use serde::{Deserialize, Serialize};

/// Minimum observations required for the AR(1) regression.
pub const MIN_OBSERVATIONS: usize = 3;

/// Parameters of a fitted mean-reverting model.
///
/// Owned by the fold assembler for the lifetime of one (fold, feature) cell;
/// serializable so callers can persist it explicitly if they want to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OuModel {
    /// Long-run equilibrium level μ.
    pub mean: f64,
    /// Continuous-time reversion speed θ = −ln(b), per timestep.
    pub reversion_rate: f64,
    /// Sample standard deviation of the AR(1) residuals.
    pub noise_std: f64,
    /// Raw AR(1) coefficient b, kept for diagnostics.
    pub ar_coeff: f64,
}

impl OuModel {
    /// Fit the model to a training spread via OLS on the AR(1) form.
    ///
    /// # Errors
    ///
    /// - [`FitError::InsufficientData`] with fewer than
    ///   [`MIN_OBSERVATIONS`] observations.
    /// - [`FitError::NonMeanReverting`] when the estimated `b` is outside
    ///   `(0, 1)`, or when the lagged series has zero variance so no slope is
    ///   identifiable.
    pub fn fit(series: &[f64]) -> Result<Self, FitError> {
        let n = series.len();
        if n < MIN_OBSERVATIONS {
            return Err(FitError::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: n,
            });
        }

        // y = x_t, x = x_{t-1}
        let x = &series[..n - 1];
        let y = &series[1..];
        let m = x.len() as f64;

        let x_mean = x.iter().sum::<f64>() / m;
        let y_mean = y.iter().sum::<f64>() / m;

        let mut num = 0.0;
        let mut den = 0.0;
        for (xi, yi) in x.iter().zip(y.iter()) {
            num += (xi - x_mean) * (yi - y_mean);
            den += (xi - x_mean) * (xi - x_mean);
        }
        if den < 1e-12 {
            // Constant lagged series: the slope is unidentifiable, which
            // means no reversion is detectable either.
            return Err(FitError::NonMeanReverting { ar_coeff: f64::NAN });
        }

        let b = num / den;
        if b <= 0.0 || b >= 1.0 {
            return Err(FitError::NonMeanReverting { ar_coeff: b });
        }
        let a = y_mean - b * x_mean;

        let reversion_rate = -b.ln();
        let mean = a / (1.0 - b);

        let residuals: Vec<f64> = x
            .iter()
            .zip(y.iter())
            .map(|(xi, yi)| yi - (a + b * xi))
            .collect();
        let noise_std = sample_std(&residuals);

        Ok(Self {
            mean,
            reversion_rate,
            noise_std,
            ar_coeff: b,
        })
    }

    /// Standardized deviation scores for a spread slice.
    ///
    /// Works both in-sample (the slice used for fitting) and out-of-sample
    /// (a disjoint future slice); the caller decides which.
    ///
    /// # Errors
    ///
    /// [`FitError::DegenerateModel`] when `noise_std` is zero or not finite.
    pub fn score(&self, series: &[f64]) -> Result<Vec<f64>, FitError> {
        if !self.noise_std.is_finite() || self.noise_std <= 0.0 {
            return Err(FitError::DegenerateModel {
                noise_std: self.noise_std,
            });
        }
        Ok(series
            .iter()
            .map(|&x| (x - self.mean) / self.noise_std)
            .collect())
    }

    /// Half-life of mean reversion in timesteps: ln(2) / θ.
    pub fn half_life(&self) -> f64 {
        std::f64::consts::LN_2 / self.reversion_rate
    }
}

/// Sample (n−1) standard deviation.
fn sample_std(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}
