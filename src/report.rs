//! Analysis report structures.
//!
//! The [`Report`] is the single output of an analysis run: per-group
//! posterior estimates, differences from the reference group, the shared
//! normality parameter, convergence diagnostics and any warnings. All
//! types serialize with serde for the JSON surface.

use serde::{Deserialize, Serialize};

use crate::analysis::Summary;

/// Posterior estimates for one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEstimate {
    /// Group label as it appeared in the data.
    pub label: String,
    /// Dense group index assigned by the encoder.
    pub index: usize,
    /// Number of observations in this group.
    pub n: usize,
    /// Posterior summary of the group location μ.
    pub location: Summary,
    /// Posterior summary of the group scale σ.
    pub scale: Summary,
}

/// Posterior estimates for one group's difference from the reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifferenceEstimate {
    /// Group label.
    pub label: String,
    /// Reference group label.
    pub reference: String,
    /// Posterior summary of μ_group − μ_reference.
    pub difference: Summary,
    /// Posterior summary of the standardized effect size
    /// (μ_group − μ_reference) / sqrt((σ_group² + σ_reference²) / 2).
    pub effect_size: Summary,
    /// Fraction of posterior draws with a positive difference.
    pub prob_positive: f64,
}

impl DifferenceEstimate {
    /// Whether the HPD interval of the difference excludes zero.
    pub fn excludes_zero(&self) -> bool {
        self.difference.hpd_low > 0.0 || self.difference.hpd_high < 0.0
    }
}

/// Convergence diagnostics for one model parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDiagnostic {
    /// Parameter name, e.g. `mu[control]` or `nu`.
    pub name: String,
    /// Split-chain potential scale reduction factor.
    pub rhat: f64,
    /// Effective sample size pooled across chains.
    pub ess: f64,
}

/// Issues worth surfacing alongside the estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// A parameter's split R-hat exceeds the warning threshold.
    HighRhat {
        /// Parameter name.
        parameter: String,
        /// Observed R-hat value.
        value: f64,
    },
    /// A parameter's effective sample size is a small fraction of the
    /// total draws.
    LowEss {
        /// Parameter name.
        parameter: String,
        /// Observed effective sample size.
        ess: f64,
    },
    /// A chain's post-warmup acceptance rate fell outside the healthy
    /// band, suggesting the adaptation did not settle.
    UnusualAcceptance {
        /// Chain index.
        chain: usize,
        /// Observed acceptance rate.
        rate: f64,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::HighRhat { parameter, value } => {
                write!(f, "{}: split R-hat {:.3} (chains disagree)", parameter, value)
            }
            Warning::LowEss { parameter, ess } => {
                write!(f, "{}: effective sample size {:.0}", parameter, ess)
            }
            Warning::UnusualAcceptance { chain, rate } => {
                write!(f, "chain {}: acceptance rate {:.0}%", chain, rate * 100.0)
            }
        }
    }
}

/// Overall convergence quality grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceQuality {
    /// All diagnostics within thresholds.
    Good,
    /// Some warnings; estimates are usable but a longer run would help.
    Fair,
    /// Diagnostics indicate the chains have not converged; do not trust
    /// the estimates.
    Poor,
}

impl std::fmt::Display for ConvergenceQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvergenceQuality::Good => write!(f, "Good"),
            ConvergenceQuality::Fair => write!(f, "Fair"),
            ConvergenceQuality::Poor => write!(f, "Poor"),
        }
    }
}

/// Sampler diagnostics attached to a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Worst split R-hat across parameters.
    pub rhat_max: f64,
    /// Smallest effective sample size across parameters.
    pub ess_min: f64,
    /// Per-parameter diagnostics.
    pub parameters: Vec<ParameterDiagnostic>,
    /// Post-warmup acceptance rate per chain.
    pub acceptance_rates: Vec<f64>,
    /// Warnings generated during analysis.
    pub warnings: Vec<Warning>,
}

/// Metadata about an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Number of chains run.
    pub chains: usize,
    /// Recorded draws per chain (after thinning).
    pub draws_per_chain: usize,
    /// Warmup sweeps per chain.
    pub warmup: usize,
    /// Thinning interval.
    pub thin: usize,
    /// Base seed of the run.
    pub seed: u64,
    /// Number of observations analyzed.
    pub n_observations: usize,
    /// Data source description, if known.
    pub source: Option<String>,
    /// Wall-clock runtime in seconds.
    pub runtime_secs: f64,
}

/// Full result of a BEST analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Per-group posterior estimates, in encoding order.
    pub groups: Vec<GroupEstimate>,
    /// Differences from the reference group, one per non-reference group.
    pub differences: Vec<DifferenceEstimate>,
    /// Posterior summary of the shared degrees-of-freedom ν.
    pub normality: Summary,
    /// Reference group label.
    pub reference: String,
    /// HPD mass used for all intervals.
    pub hpd_mass: f64,
    /// Overall convergence grade.
    pub quality: ConvergenceQuality,
    /// Sampler diagnostics.
    pub diagnostics: Diagnostics,
    /// Run metadata.
    pub metadata: RunMetadata,
}

impl Report {
    /// Estimate for a group by label, if present.
    pub fn group(&self, label: &str) -> Option<&GroupEstimate> {
        self.groups.iter().find(|g| g.label == label)
    }

    /// Difference estimate for a group by label, if present.
    pub fn difference(&self, label: &str) -> Option<&DifferenceEstimate> {
        self.differences.iter().find(|d| d.label == label)
    }
}
