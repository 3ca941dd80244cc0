//! The BEST generative model for robust multi-group comparison.
//!
//! Following Kruschke's "Bayesian estimation supersedes the t test"
//! procedure, each group's observations are modeled with a Student-t
//! likelihood sharing a single degrees-of-freedom parameter:
//!
//! ```text
//! y_i        ~ StudentT(ν, μ_g(i), σ_g(i))
//! μ_k        ~ Normal(mean(y), 1000 · sd(y))
//! σ_k        ~ Uniform(sd(y) / 1000, sd(y) · 1000)
//! ν          ~ 1 + Exponential(mean = 29)
//! ```
//!
//! where the prior constants are derived from the pooled data. The heavy
//! tails of the Student-t make the group means robust to outliers; the
//! shared ν pools tail information across groups.
//!
//! # Parameterization
//!
//! Sampling happens in an unconstrained space
//! `θ = (μ_0.., log σ_0.., log(ν − 1))` with the usual Jacobian
//! corrections folded into the component log-priors, so the sampler never
//! needs to know about the constraints.
//!
//! # Reference
//!
//! Kruschke, J. K. (2013). "Bayesian estimation supersedes the t test."
//! Journal of Experimental Psychology: General 142(2):573–603.

use nalgebra::DVector;
use statrs::distribution::{Continuous, Normal};
use statrs::function::gamma::ln_gamma;

use crate::constants::{NU_PRIOR_MEAN, PRIOR_MEAN_SCALE_FACTOR, SIGMA_PRIOR_SPREAD};
use crate::data::Dataset;

/// Data-derived prior constants for the BEST model.
#[derive(Debug, Clone, PartialEq)]
pub struct Priors {
    /// Location of the Normal prior on each group mean.
    pub mu_loc: f64,
    /// Scale of the Normal prior on each group mean.
    pub mu_scale: f64,
    /// Lower bound of the Uniform prior on each group scale.
    pub sigma_low: f64,
    /// Upper bound of the Uniform prior on each group scale.
    pub sigma_high: f64,
    /// Mean of the (shifted) Exponential prior on ν − 1.
    pub nu_mean: f64,
}

impl Priors {
    /// Derive priors from the pooled data, per the BEST procedure.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let sd = dataset.pooled_sd();
        Self {
            mu_loc: dataset.pooled_mean(),
            mu_scale: sd * PRIOR_MEAN_SCALE_FACTOR,
            sigma_low: sd / SIGMA_PRIOR_SPREAD,
            sigma_high: sd * SIGMA_PRIOR_SPREAD,
            nu_mean: NU_PRIOR_MEAN,
        }
    }
}

/// A BEST model bound to one dataset.
///
/// Holds per-group observation vectors and the data-derived [`Priors`],
/// and evaluates the unnormalized log-posterior over the unconstrained
/// parameter vector. Per-group likelihood terms are exposed separately so
/// a component-wise sampler can avoid rescanning unaffected groups.
#[derive(Debug, Clone)]
pub struct BestModel {
    group_values: Vec<Vec<f64>>,
    group_means: Vec<f64>,
    group_sds: Vec<f64>,
    priors: Priors,
}

impl BestModel {
    /// Build the model from a validated dataset.
    pub fn new(dataset: &Dataset) -> Self {
        let k = dataset.n_groups();
        let group_values: Vec<Vec<f64>> = (0..k).map(|g| dataset.group_values(g)).collect();

        let group_means: Vec<f64> = group_values
            .iter()
            .map(|v| v.iter().sum::<f64>() / v.len() as f64)
            .collect();

        let priors = Priors::from_dataset(dataset);
        let group_sds: Vec<f64> = group_values
            .iter()
            .zip(&group_means)
            .map(|(v, &m)| {
                let var =
                    v.iter().map(|y| (y - m) * (y - m)).sum::<f64>() / (v.len() - 1) as f64;
                // Constant groups fall back to the prior lower bound.
                var.sqrt().max(priors.sigma_low * (1.0 + 1e-6))
            })
            .collect();

        Self {
            group_values,
            group_means,
            group_sds,
            priors,
        }
    }

    /// Number of groups K.
    pub fn n_groups(&self) -> usize {
        self.group_values.len()
    }

    /// Dimension of the unconstrained parameter vector: 2K + 1.
    pub fn dim(&self) -> usize {
        2 * self.n_groups() + 1
    }

    /// The data-derived priors.
    pub fn priors(&self) -> &Priors {
        &self.priors
    }

    /// Sample means per group (used for initialization).
    pub fn group_means(&self) -> &[f64] {
        &self.group_means
    }

    /// Sample standard deviations per group (used for initialization).
    pub fn group_sds(&self) -> &[f64] {
        &self.group_sds
    }

    /// Index of μ_k in the parameter vector.
    pub fn mu_index(&self, k: usize) -> usize {
        k
    }

    /// Index of log σ_k in the parameter vector.
    pub fn sigma_index(&self, k: usize) -> usize {
        self.n_groups() + k
    }

    /// Index of log(ν − 1) in the parameter vector.
    pub fn nu_index(&self) -> usize {
        2 * self.n_groups()
    }

    /// Which group's likelihood a parameter component affects.
    ///
    /// Returns `None` for the shared ν component, which affects all groups.
    pub fn component_group(&self, j: usize) -> Option<usize> {
        if j < self.n_groups() {
            Some(j)
        } else if j < 2 * self.n_groups() {
            Some(j - self.n_groups())
        } else {
            None
        }
    }

    /// Interior bounds for log σ components, for clamping initial states.
    pub fn log_sigma_bounds(&self) -> (f64, f64) {
        (self.priors.sigma_low.ln(), self.priors.sigma_high.ln())
    }

    /// Moment-based initial position: group sample means and sds, ν = 10.
    ///
    /// This plays the role the variational initialization played in the
    /// original procedure: starting chains near the posterior bulk.
    pub fn initial_position(&self) -> DVector<f64> {
        let k = self.n_groups();
        let (lo, hi) = self.log_sigma_bounds();
        let mut theta = DVector::zeros(self.dim());

        for g in 0..k {
            theta[self.mu_index(g)] = self.group_means[g];
            theta[self.sigma_index(g)] =
                self.group_sds[g].ln().clamp(lo + 1e-6, hi - 1e-6);
        }
        theta[self.nu_index()] = 9.0_f64.ln(); // ν = 10

        theta
    }

    /// Log prior density of component `j` at value `x`, Jacobian included.
    ///
    /// Components are a priori independent, so the full log-prior is the
    /// sum of these terms. Returns `-inf` outside the support.
    pub fn component_log_prior(&self, j: usize, x: f64) -> f64 {
        let k = self.n_groups();
        if j < k {
            // μ_k ~ Normal(mu_loc, mu_scale)
            let normal = Normal::new(self.priors.mu_loc, self.priors.mu_scale)
                .expect("prior scale is positive");
            normal.ln_pdf(x)
        } else if j < 2 * k {
            // σ_k ~ Uniform(lo, hi), sampled as log σ.
            // p(log σ) = σ / (hi − lo) on (log lo, log hi).
            let (lo, hi) = self.log_sigma_bounds();
            if x <= lo || x >= hi {
                f64::NEG_INFINITY
            } else {
                x - (self.priors.sigma_high - self.priors.sigma_low).ln()
            }
        } else {
            // ν − 1 ~ Exponential(rate = 1 / nu_mean), sampled as t = log(ν − 1).
            // p(t) = rate · exp(−rate · e^t) · e^t.
            let rate = 1.0 / self.priors.nu_mean;
            rate.ln() - rate * x.exp() + x
        }
    }

    /// Full log prior over the parameter vector.
    pub fn log_prior(&self, theta: &DVector<f64>) -> f64 {
        (0..self.dim())
            .map(|j| self.component_log_prior(j, theta[j]))
            .sum()
    }

    /// Log likelihood of group `k` under (μ, log σ, ν).
    ///
    /// Standard Student-t log-density summed over the group's
    /// observations:
    ///
    /// ```text
    /// ln t_ν(z) = ln Γ((ν+1)/2) − ln Γ(ν/2) − ½ ln(νπ) − (ν+1)/2 · ln(1 + z²/ν)
    /// ```
    pub fn group_log_lik(&self, k: usize, mu: f64, log_sigma: f64, nu: f64) -> f64 {
        let sigma = log_sigma.exp();
        let values = &self.group_values[k];

        let norm = ln_gamma((nu + 1.0) / 2.0)
            - ln_gamma(nu / 2.0)
            - 0.5 * (nu * std::f64::consts::PI).ln()
            - log_sigma;

        let half_nu_plus = (nu + 1.0) / 2.0;
        let mut ll = values.len() as f64 * norm;
        for &y in values {
            let z = (y - mu) / sigma;
            // ln(1 + z²/ν) via ln_1p for precision when z is small.
            ll -= half_nu_plus * (z * z / nu).ln_1p();
        }
        ll
    }

    /// Extract ν from the parameter vector.
    pub fn nu_of(&self, theta: &DVector<f64>) -> f64 {
        1.0 + theta[self.nu_index()].exp()
    }

    /// Per-group log likelihoods under the full parameter vector.
    pub fn group_log_liks(&self, theta: &DVector<f64>) -> Vec<f64> {
        let nu = self.nu_of(theta);
        (0..self.n_groups())
            .map(|k| {
                self.group_log_lik(
                    k,
                    theta[self.mu_index(k)],
                    theta[self.sigma_index(k)],
                    nu,
                )
            })
            .collect()
    }

    /// Unnormalized log posterior of the full parameter vector.
    pub fn log_posterior(&self, theta: &DVector<f64>) -> f64 {
        let prior = self.log_prior(theta);
        if prior == f64::NEG_INFINITY {
            return f64::NEG_INFINITY;
        }
        prior + self.group_log_liks(theta).iter().sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;

    fn dataset() -> Dataset {
        let labels: Vec<String> = ["a", "a", "a", "b", "b", "b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Dataset::new(labels, vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0]).unwrap()
    }

    #[test]
    fn test_priors_from_dataset() {
        let data = dataset();
        let priors = Priors::from_dataset(&data);

        assert!((priors.mu_loc - data.pooled_mean()).abs() < 1e-12);
        assert!((priors.mu_scale - data.pooled_sd() * 1000.0).abs() < 1e-9);
        assert!(priors.sigma_low < priors.sigma_high);
        assert_eq!(priors.nu_mean, 29.0);
    }

    #[test]
    fn test_dimensions_and_indices() {
        let model = BestModel::new(&dataset());

        assert_eq!(model.n_groups(), 2);
        assert_eq!(model.dim(), 5);
        assert_eq!(model.mu_index(1), 1);
        assert_eq!(model.sigma_index(0), 2);
        assert_eq!(model.nu_index(), 4);
        assert_eq!(model.component_group(0), Some(0));
        assert_eq!(model.component_group(3), Some(1));
        assert_eq!(model.component_group(4), None);
    }

    #[test]
    fn test_initial_position_is_finite() {
        let model = BestModel::new(&dataset());
        let theta = model.initial_position();

        let lp = model.log_posterior(&theta);
        assert!(lp.is_finite(), "log posterior at init was {}", lp);
    }

    #[test]
    fn test_sigma_prior_support() {
        let model = BestModel::new(&dataset());
        let j = model.sigma_index(0);
        let (lo, hi) = model.log_sigma_bounds();

        assert!(model.component_log_prior(j, (lo + hi) / 2.0).is_finite());
        assert_eq!(model.component_log_prior(j, lo - 0.1), f64::NEG_INFINITY);
        assert_eq!(model.component_log_prior(j, hi + 0.1), f64::NEG_INFINITY);
    }

    #[test]
    fn test_likelihood_peaks_near_group_mean() {
        let model = BestModel::new(&dataset());
        let log_sigma = model.group_sds()[0].ln();

        let at_mean = model.group_log_lik(0, model.group_means()[0], log_sigma, 10.0);
        let away = model.group_log_lik(0, model.group_means()[0] + 50.0, log_sigma, 10.0);

        assert!(at_mean > away);
    }

    #[test]
    fn test_student_t_matches_normal_for_large_nu() {
        // With ν → ∞ the Student-t converges to the Normal.
        let model = BestModel::new(&dataset());
        let normal = Normal::new(0.0, 1.0).unwrap();

        let t_ll = model.group_log_lik(0, 2.0, 0.0, 1e7);
        let n_ll: f64 = model
            .group_values[0]
            .iter()
            .map(|&y| normal.ln_pdf(y - 2.0))
            .sum();

        assert!(
            (t_ll - n_ll).abs() < 1e-3,
            "t: {}, normal: {}",
            t_ll,
            n_ll
        );
    }

    #[test]
    fn test_component_priors_sum_to_log_prior() {
        let model = BestModel::new(&dataset());
        let theta = model.initial_position();

        let by_component: f64 = (0..model.dim())
            .map(|j| model.component_log_prior(j, theta[j]))
            .sum();

        assert!((by_component - model.log_prior(&theta)).abs() < 1e-12);
    }

    #[test]
    fn test_nu_transform() {
        let model = BestModel::new(&dataset());
        let mut theta = model.initial_position();
        theta[model.nu_index()] = 0.0;

        assert!((model.nu_of(&theta) - 2.0).abs() < 1e-12);
    }
}
