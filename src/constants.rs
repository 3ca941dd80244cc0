//! Shared constants for the BEST model and sampler.

/// Mean of the Exponential prior on ν − 1.
///
/// Kruschke's choice: balances nearly-normal (ν > 30) against
/// heavy-tailed (ν < 30) regimes with prior mass split roughly evenly.
pub const NU_PRIOR_MEAN: f64 = 29.0;

/// Multiplier on the pooled standard deviation for the group-mean prior
/// scale. Makes the prior effectively flat over the data range.
pub const PRIOR_MEAN_SCALE_FACTOR: f64 = 1000.0;

/// Spread factor for the Uniform prior on group scales:
/// `σ_k ∈ [sd(y) / SPREAD, sd(y) · SPREAD]`.
pub const SIGMA_PRIOR_SPREAD: f64 = 1000.0;

/// Target acceptance rate for component-wise proposals.
///
/// Optimal for one-dimensional random-walk Metropolis updates
/// (Roberts & Rosenthal 2001).
pub const TARGET_ACCEPTANCE: f64 = 0.44;

/// Warmup sweeps between proposal-scale adjustments.
pub const ADAPTATION_BATCH: usize = 50;

/// Default posterior mass for HPD intervals.
pub const DEFAULT_HPD_MASS: f64 = 0.95;

/// Split R-hat above this value emits a convergence warning.
pub const RHAT_WARN: f64 = 1.05;

/// Split R-hat above this value marks convergence quality as poor.
pub const RHAT_POOR: f64 = 1.1;

/// ESS below this fraction of total draws emits a warning.
pub const ESS_WARN_FRACTION: f64 = 0.05;

/// ESS below this fraction of total draws marks quality as poor.
pub const ESS_POOR_FRACTION: f64 = 0.01;
