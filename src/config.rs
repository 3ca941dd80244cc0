//! Configuration for BEST posterior estimation.

use crate::constants::DEFAULT_HPD_MASS;

/// Configuration options for [`BestEstimator`](crate::BestEstimator).
///
/// Controls the sampling budget, reproducibility, and summarization of
/// the analysis.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of independent chains. More chains sharpen the convergence
    /// diagnostics. Default: 4.
    pub chains: usize,

    /// Post-warmup sweeps per chain. Default: 2,000.
    pub draws: usize,

    /// Warmup sweeps per chain used for proposal-scale adaptation and
    /// discarded from summaries. Default: 1,000.
    pub warmup: usize,

    /// Record every `thin`-th post-warmup sweep. Default: 1 (keep all).
    pub thin: usize,

    /// Base RNG seed; chain `c` uses `seed + c`. Identical seed, config
    /// and data reproduce the analysis exactly. Default: 42.
    pub seed: u64,

    /// Posterior mass of reported HPD intervals. Default: 0.95.
    pub hpd_mass: f64,

    /// Reference group label for difference estimates.
    ///
    /// When `None`, the alphabetically first label is the reference,
    /// matching the dense-index order of the encoder.
    pub reference: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chains: 4,
            draws: 2_000,
            warmup: 1_000,
            thin: 1,
            seed: 42,
            hpd_mass: DEFAULT_HPD_MASS,
            reference: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quick configuration for development and tests.
    ///
    /// Two short chains; convergence diagnostics will be coarse.
    pub fn quick() -> Self {
        Self {
            chains: 2,
            draws: 500,
            warmup: 300,
            ..Default::default()
        }
    }

    /// Create a thorough configuration for final analyses.
    pub fn thorough() -> Self {
        Self {
            chains: 4,
            draws: 10_000,
            warmup: 2_000,
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the number of chains.
    pub fn chains(mut self, n: usize) -> Self {
        assert!(n > 0, "chains must be positive");
        self.chains = n;
        self
    }

    /// Set the post-warmup draws per chain.
    pub fn draws(mut self, n: usize) -> Self {
        assert!(n > 0, "draws must be positive");
        self.draws = n;
        self
    }

    /// Set the warmup sweeps per chain.
    pub fn warmup(mut self, n: usize) -> Self {
        self.warmup = n;
        self
    }

    /// Set the thinning interval.
    pub fn thin(mut self, n: usize) -> Self {
        assert!(n > 0, "thin must be positive");
        self.thin = n;
        self
    }

    /// Set the base RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the HPD interval mass.
    pub fn hpd_mass(mut self, mass: f64) -> Self {
        assert!(mass > 0.0 && mass <= 1.0, "hpd_mass must be in (0, 1]");
        self.hpd_mass = mass;
        self
    }

    /// Set the reference group label.
    pub fn reference(mut self, label: impl Into<String>) -> Self {
        self.reference = Some(label.into());
        self
    }

    /// Check that the configuration is internally consistent.
    pub fn validate(&self) -> Result<(), String> {
        if self.chains == 0 {
            return Err("chains must be positive".to_string());
        }
        if self.draws == 0 {
            return Err("draws must be positive".to_string());
        }
        if self.thin == 0 {
            return Err("thin must be positive".to_string());
        }
        if self.draws < self.thin {
            return Err("draws must be at least thin".to_string());
        }
        if self.hpd_mass <= 0.0 || self.hpd_mass > 1.0 {
            return Err("hpd_mass must be in (0, 1]".to_string());
        }
        Ok(())
    }
}
