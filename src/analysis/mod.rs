//! Posterior summarization and convergence diagnostics.

mod diagnostics;
mod hpd;

pub use diagnostics::{effective_sample_size, split_rhat};
pub use hpd::hpd_interval;

use serde::{Deserialize, Serialize};

/// Marginal posterior summary of one quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Posterior mean.
    pub mean: f64,
    /// Posterior standard deviation.
    pub sd: f64,
    /// Posterior median.
    pub median: f64,
    /// Lower bound of the HPD interval.
    pub hpd_low: f64,
    /// Upper bound of the HPD interval.
    pub hpd_high: f64,
}

impl Summary {
    /// Summarize a vector of posterior draws.
    ///
    /// # Panics
    ///
    /// Panics if `draws` is empty or `mass` is outside (0, 1].
    pub fn from_draws(draws: &[f64], mass: f64) -> Self {
        assert!(!draws.is_empty(), "Cannot summarize empty draws");

        let n = draws.len();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let sd = if n > 1 {
            (draws.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1) as f64)
                .sqrt()
        } else {
            0.0
        };

        let mut sorted = draws.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };

        let (hpd_low, hpd_high) = hpd_interval(&sorted, mass);

        Self {
            mean,
            sd,
            median,
            hpd_low,
            hpd_high,
        }
    }
}

/// Fraction of draws strictly greater than zero.
///
/// Used as the probability of direction for difference quantities.
pub fn fraction_positive(draws: &[f64]) -> f64 {
    if draws.is_empty() {
        return 0.0;
    }
    draws.iter().filter(|&&x| x > 0.0).count() as f64 / draws.len() as f64
}
