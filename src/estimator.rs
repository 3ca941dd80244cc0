//! Main `BestEstimator` entry point.

use std::fmt;
use std::time::Instant;

use crate::analysis::{effective_sample_size, fraction_positive, split_rhat, Summary};
use crate::config::Config;
use crate::constants::{
    ESS_POOR_FRACTION, ESS_WARN_FRACTION, RHAT_POOR, RHAT_WARN,
};
use crate::data::Dataset;
use crate::model::BestModel;
use crate::report::{
    ConvergenceQuality, Diagnostics, DifferenceEstimate, GroupEstimate, ParameterDiagnostic,
    Report, RunMetadata, Warning,
};
use crate::sampler::{run_chains, Chains};

/// Errors that prevent an analysis from running at all.
///
/// Data problems are caught earlier, at [`Dataset`] construction; this
/// covers configuration that cannot be resolved against the data.
#[derive(Debug)]
pub enum AnalysisError {
    /// The configured reference label is not a group in the data.
    UnknownReference {
        /// The label that was requested.
        label: String,
        /// The labels that exist.
        known: Vec<String>,
    },
    /// The configuration failed validation.
    InvalidConfig(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::UnknownReference { label, known } => {
                write!(
                    f,
                    "Reference group '{}' not found in data. Groups: {:?}",
                    label, known
                )
            }
            AnalysisError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Main entry point for BEST group comparison.
///
/// Wraps a [`Config`] behind a builder API and runs the full pipeline:
/// model construction, posterior simulation, summarization, diagnostics.
///
/// # Example
///
/// ```ignore
/// use bestimate::{BestEstimator, data::load_csv};
/// use std::path::Path;
///
/// let data = load_csv(Path::new("trial.csv"), "group", "response")?;
/// let report = BestEstimator::new()
///     .chains(4)
///     .seed(7)
///     .reference("control")
///     .analyze(&data)?;
///
/// for diff in &report.differences {
///     println!(
///         "{} vs {}: {:+.2} [{:+.2}, {:+.2}]",
///         diff.label,
///         diff.reference,
///         diff.difference.median,
///         diff.difference.hpd_low,
///         diff.difference.hpd_high,
///     );
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BestEstimator {
    config: Config,
}

impl BestEstimator {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the number of chains.
    pub fn chains(mut self, n: usize) -> Self {
        self.config = self.config.chains(n);
        self
    }

    /// Set post-warmup draws per chain.
    pub fn draws(mut self, n: usize) -> Self {
        self.config = self.config.draws(n);
        self
    }

    /// Set warmup sweeps per chain.
    pub fn warmup(mut self, n: usize) -> Self {
        self.config = self.config.warmup(n);
        self
    }

    /// Set the base RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config = self.config.seed(seed);
        self
    }

    /// Set the HPD interval mass.
    pub fn hpd_mass(mut self, mass: f64) -> Self {
        self.config = self.config.hpd_mass(mass);
        self
    }

    /// Set the reference group label.
    pub fn reference(mut self, label: impl Into<String>) -> Self {
        self.config = self.config.reference(label);
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full analysis pipeline on a dataset.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError` if the configuration is invalid or names a
    /// reference group that does not exist. Sampler non-convergence is
    /// not an error; it degrades [`ConvergenceQuality`] and adds
    /// warnings to the report.
    pub fn analyze(&self, dataset: &Dataset) -> Result<Report, AnalysisError> {
        self.config
            .validate()
            .map_err(AnalysisError::InvalidConfig)?;

        let reference = match &self.config.reference {
            Some(label) => {
                dataset
                    .encoder()
                    .encode(label)
                    .ok_or_else(|| AnalysisError::UnknownReference {
                        label: label.clone(),
                        known: dataset.labels().to_vec(),
                    })?
            }
            None => 0,
        };

        let started = Instant::now();
        let model = BestModel::new(dataset);
        let chains = run_chains(&model, &self.config);

        Ok(self.summarize(dataset, &model, &chains, reference, started.elapsed().as_secs_f64()))
    }

    fn summarize(
        &self,
        dataset: &Dataset,
        model: &BestModel,
        chains: &Chains,
        reference: usize,
        runtime_secs: f64,
    ) -> Report {
        let mass = self.config.hpd_mass;
        let k = model.n_groups();

        let mut groups = Vec::with_capacity(k);
        for g in 0..k {
            let mu_draws = chains.pooled(model.mu_index(g));
            let sigma_draws: Vec<f64> = chains
                .pooled(model.sigma_index(g))
                .iter()
                .map(|x| x.exp())
                .collect();

            groups.push(GroupEstimate {
                label: dataset.labels()[g].clone(),
                index: g,
                n: dataset.group_count(g),
                location: Summary::from_draws(&mu_draws, mass),
                scale: Summary::from_draws(&sigma_draws, mass),
            });
        }

        let nu_draws: Vec<f64> = chains
            .pooled(model.nu_index())
            .iter()
            .map(|x| 1.0 + x.exp())
            .collect();
        let normality = Summary::from_draws(&nu_draws, mass);

        let mut differences = Vec::with_capacity(k.saturating_sub(1));
        for g in 0..k {
            if g == reference {
                continue;
            }

            let diff_draws = chains.pooled_map(|theta| {
                theta(model.mu_index(g)) - theta(model.mu_index(reference))
            });
            let effect_draws = chains.pooled_map(|theta| {
                let diff = theta(model.mu_index(g)) - theta(model.mu_index(reference));
                let var_g = (2.0 * theta(model.sigma_index(g))).exp();
                let var_r = (2.0 * theta(model.sigma_index(reference))).exp();
                diff / ((var_g + var_r) / 2.0).sqrt()
            });

            differences.push(DifferenceEstimate {
                label: dataset.labels()[g].clone(),
                reference: dataset.labels()[reference].clone(),
                difference: Summary::from_draws(&diff_draws, mass),
                effect_size: Summary::from_draws(&effect_draws, mass),
                prob_positive: fraction_positive(&diff_draws),
            });
        }

        let diagnostics = self.diagnose(dataset, model, chains);
        let quality = grade(&diagnostics, chains.total_draws());

        Report {
            groups,
            differences,
            normality,
            reference: dataset.labels()[reference].clone(),
            hpd_mass: mass,
            quality,
            diagnostics,
            metadata: RunMetadata {
                chains: chains.n_chains(),
                draws_per_chain: chains.draws_per_chain(),
                warmup: self.config.warmup,
                thin: self.config.thin,
                seed: self.config.seed,
                n_observations: dataset.len(),
                source: dataset.source().map(str::to_string),
                runtime_secs,
            },
        }
    }

    fn diagnose(&self, dataset: &Dataset, model: &BestModel, chains: &Chains) -> Diagnostics {
        let mut parameters = Vec::with_capacity(model.dim());
        let mut warnings = Vec::new();
        let total = chains.total_draws() as f64;

        let mut push_param = |name: String, per_chain: Vec<Vec<f64>>| {
            let views: Vec<&[f64]> = per_chain.iter().map(Vec::as_slice).collect();
            let rhat = split_rhat(&views);
            let ess = effective_sample_size(&views);

            if rhat > RHAT_WARN {
                warnings.push(Warning::HighRhat {
                    parameter: name.clone(),
                    value: rhat,
                });
            }
            if ess < ESS_WARN_FRACTION * total {
                warnings.push(Warning::LowEss {
                    parameter: name.clone(),
                    ess,
                });
            }

            parameters.push(ParameterDiagnostic { name, rhat, ess });
        };

        for g in 0..model.n_groups() {
            let label = &dataset.labels()[g];

            let mu: Vec<Vec<f64>> = (0..chains.n_chains())
                .map(|c| chains.chain_draws(c, model.mu_index(g)).to_vec())
                .collect();
            push_param(format!("mu[{}]", label), mu);

            let sigma: Vec<Vec<f64>> = (0..chains.n_chains())
                .map(|c| {
                    chains
                        .chain_draws(c, model.sigma_index(g))
                        .iter()
                        .map(|x| x.exp())
                        .collect()
                })
                .collect();
            push_param(format!("sigma[{}]", label), sigma);
        }

        let nu: Vec<Vec<f64>> = (0..chains.n_chains())
            .map(|c| {
                chains
                    .chain_draws(c, model.nu_index())
                    .iter()
                    .map(|x| 1.0 + x.exp())
                    .collect()
            })
            .collect();
        push_param("nu".to_string(), nu);

        let acceptance_rates = chains.acceptance_rates();
        for (c, &rate) in acceptance_rates.iter().enumerate() {
            if !(0.15..=0.8).contains(&rate) {
                warnings.push(Warning::UnusualAcceptance { chain: c, rate });
            }
        }

        let rhat_max = parameters
            .iter()
            .map(|p| p.rhat)
            .fold(f64::NEG_INFINITY, f64::max);
        let ess_min = parameters
            .iter()
            .map(|p| p.ess)
            .fold(f64::INFINITY, f64::min);

        Diagnostics {
            rhat_max,
            ess_min,
            parameters,
            acceptance_rates,
            warnings,
        }
    }
}

fn grade(diagnostics: &Diagnostics, total_draws: usize) -> ConvergenceQuality {
    let total = total_draws as f64;
    if diagnostics.rhat_max > RHAT_POOR || diagnostics.ess_min < ESS_POOR_FRACTION * total {
        ConvergenceQuality::Poor
    } else if diagnostics.warnings.is_empty() {
        ConvergenceQuality::Good
    } else {
        ConvergenceQuality::Fair
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let mut labels = Vec::new();
        let mut values = Vec::new();
        for i in 0..30 {
            labels.push("control".to_string());
            values.push(100.0 + ((i * 31) % 7) as f64);
            labels.push("treatment".to_string());
            values.push(104.0 + ((i * 17) % 7) as f64);
        }
        Dataset::new(labels, values).unwrap()
    }

    #[test]
    fn test_analyze_produces_report() {
        let report = BestEstimator::with_config(Config::quick())
            .seed(1)
            .analyze(&dataset())
            .unwrap();

        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.differences.len(), 1);
        assert_eq!(report.reference, "control");
        assert_eq!(report.differences[0].label, "treatment");
        assert_eq!(report.metadata.chains, 2);
    }

    #[test]
    fn test_reference_override() {
        let report = BestEstimator::with_config(Config::quick())
            .reference("treatment")
            .analyze(&dataset())
            .unwrap();

        assert_eq!(report.reference, "treatment");
        assert_eq!(report.differences[0].label, "control");
    }

    #[test]
    fn test_unknown_reference_is_error() {
        let result = BestEstimator::new()
            .reference("placebo")
            .analyze(&dataset());

        match result {
            Err(AnalysisError::UnknownReference { label, known }) => {
                assert_eq!(label, "placebo");
                assert_eq!(known.len(), 2);
            }
            other => panic!("Expected UnknownReference, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_diagnostics_cover_all_parameters() {
        let report = BestEstimator::with_config(Config::quick())
            .analyze(&dataset())
            .unwrap();

        // mu and sigma per group, plus nu.
        assert_eq!(report.diagnostics.parameters.len(), 5);
        assert!(report.diagnostics.rhat_max > 0.9);
        assert!(report.diagnostics.ess_min > 0.0);
        assert_eq!(report.diagnostics.acceptance_rates.len(), 2);
    }
}
