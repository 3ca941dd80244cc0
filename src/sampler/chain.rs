//! Single-chain adaptive Metropolis-within-Gibbs.

use nalgebra::DVector;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::Config;
use crate::constants::{ADAPTATION_BATCH, TARGET_ACCEPTANCE};
use crate::model::BestModel;

/// Draws and bookkeeping from one chain.
#[derive(Debug, Clone)]
pub struct ChainRun {
    /// Recorded draws, indexed `[parameter][iteration]`.
    pub draws: Vec<Vec<f64>>,
    /// Overall post-warmup acceptance rate across components.
    pub acceptance_rate: f64,
    /// Seed this chain was run with.
    pub seed: u64,
}

/// Mutable state of one chain between sweeps.
struct ChainState {
    theta: DVector<f64>,
    /// Cached log prior per component (components are a priori independent).
    component_priors: Vec<f64>,
    /// Cached log likelihood per group.
    group_log_liks: Vec<f64>,
    /// Per-component proposal standard deviations.
    scales: Vec<f64>,
}

impl ChainState {
    fn init(model: &BestModel, rng: &mut Xoshiro256PlusPlus) -> Self {
        let k = model.n_groups();
        let (lo, hi) = model.log_sigma_bounds();
        let mut theta = model.initial_position();

        // Jitter for overdispersed starts; clamp log σ back into support.
        for g in 0..k {
            let z: f64 = StandardNormal.sample(rng);
            theta[model.mu_index(g)] += 0.1 * model.group_sds()[g] * z;

            let z: f64 = StandardNormal.sample(rng);
            let j = model.sigma_index(g);
            theta[j] = (theta[j] + 0.1 * z).clamp(lo + 1e-6, hi - 1e-6);
        }
        let z: f64 = StandardNormal.sample(rng);
        theta[model.nu_index()] += 0.1 * z;

        let component_priors = (0..model.dim())
            .map(|j| model.component_log_prior(j, theta[j]))
            .collect();
        let group_log_liks = model.group_log_liks(&theta);

        // Rough per-component starting scales; adaptation refines them.
        let mut scales = vec![0.5; model.dim()];
        for g in 0..k {
            scales[model.mu_index(g)] = model.group_sds()[g] * 0.5;
        }

        Self {
            theta,
            component_priors,
            group_log_liks,
            scales,
        }
    }

    /// Propose an update for component `j`; returns true on acceptance.
    fn update_component(
        &mut self,
        model: &BestModel,
        j: usize,
        rng: &mut Xoshiro256PlusPlus,
    ) -> bool {
        let z: f64 = StandardNormal.sample(rng);
        let proposal = self.theta[j] + self.scales[j] * z;

        let new_prior = model.component_log_prior(j, proposal);
        if new_prior == f64::NEG_INFINITY {
            return false;
        }

        let mut log_ratio = new_prior - self.component_priors[j];

        match model.component_group(j) {
            Some(k) => {
                let mu = if j == model.mu_index(k) {
                    proposal
                } else {
                    self.theta[model.mu_index(k)]
                };
                let log_sigma = if j == model.sigma_index(k) {
                    proposal
                } else {
                    self.theta[model.sigma_index(k)]
                };
                let nu = model.nu_of(&self.theta);

                let new_ll = model.group_log_lik(k, mu, log_sigma, nu);
                log_ratio += new_ll - self.group_log_liks[k];

                if accept(log_ratio, rng) {
                    self.theta[j] = proposal;
                    self.component_priors[j] = new_prior;
                    self.group_log_liks[k] = new_ll;
                    return true;
                }
            }
            None => {
                // Shared ν touches every group's likelihood.
                let nu = 1.0 + proposal.exp();
                let new_lls: Vec<f64> = (0..model.n_groups())
                    .map(|k| {
                        model.group_log_lik(
                            k,
                            self.theta[model.mu_index(k)],
                            self.theta[model.sigma_index(k)],
                            nu,
                        )
                    })
                    .collect();
                let old_sum: f64 = self.group_log_liks.iter().sum();
                let new_sum: f64 = new_lls.iter().sum();
                log_ratio += new_sum - old_sum;

                if accept(log_ratio, rng) {
                    self.theta[j] = proposal;
                    self.component_priors[j] = new_prior;
                    self.group_log_liks = new_lls;
                    return true;
                }
            }
        }

        false
    }
}

fn accept(log_ratio: f64, rng: &mut Xoshiro256PlusPlus) -> bool {
    log_ratio >= 0.0 || rng.random::<f64>().ln() < log_ratio
}

/// Run one chain: warmup with scale adaptation, then recorded draws.
///
/// The chain performs `config.warmup` adaptation sweeps followed by
/// `config.draws` sampling sweeps, recording every `config.thin`-th
/// position. Proposal scales are multiplicatively adjusted after every
/// [`ADAPTATION_BATCH`] warmup sweeps toward [`TARGET_ACCEPTANCE`] and
/// held fixed afterwards, keeping the recorded draws a valid Markov chain.
pub fn run_chain(model: &BestModel, config: &Config, seed: u64) -> ChainRun {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut state = ChainState::init(model, &mut rng);
    let dim = model.dim();

    // Warmup with batch adaptation.
    let mut batch_accepts = vec![0usize; dim];
    let mut batch = 0usize;
    for sweep in 0..config.warmup {
        for j in 0..dim {
            if state.update_component(model, j, &mut rng) {
                batch_accepts[j] += 1;
            }
        }

        if (sweep + 1) % ADAPTATION_BATCH == 0 {
            batch += 1;
            let delta = (batch as f64).powf(-0.5).min(0.25);
            for j in 0..dim {
                let rate = batch_accepts[j] as f64 / ADAPTATION_BATCH as f64;
                if rate > TARGET_ACCEPTANCE {
                    state.scales[j] *= delta.exp();
                } else {
                    state.scales[j] *= (-delta).exp();
                }
                batch_accepts[j] = 0;
            }
        }
    }

    // Sampling phase: scales frozen.
    let recorded = config.draws / config.thin;
    let mut draws = vec![Vec::with_capacity(recorded); dim];
    let mut accepted = 0usize;
    let mut proposed = 0usize;

    for sweep in 0..config.draws {
        for j in 0..dim {
            proposed += 1;
            if state.update_component(model, j, &mut rng) {
                accepted += 1;
            }
        }

        if (sweep + 1) % config.thin == 0 {
            for (j, column) in draws.iter_mut().enumerate() {
                column.push(state.theta[j]);
            }
        }
    }

    ChainRun {
        draws,
        acceptance_rate: accepted as f64 / proposed.max(1) as f64,
        seed,
    }
}
