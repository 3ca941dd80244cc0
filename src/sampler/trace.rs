//! Storage for posterior draws across chains.

use super::chain::ChainRun;

/// Posterior draws from all chains, indexed `[chain][parameter][iteration]`.
///
/// Parameters live in the model's unconstrained space; consumers that want
/// constrained quantities (σ, ν) apply the inverse transforms themselves
/// or via the derived accessors on summaries.
#[derive(Debug, Clone)]
pub struct Chains {
    dim: usize,
    runs: Vec<ChainRun>,
}

impl Chains {
    /// Assemble from per-chain runs.
    ///
    /// # Panics
    ///
    /// Panics if the runs disagree on dimension or draw count.
    pub fn from_runs(dim: usize, runs: Vec<ChainRun>) -> Self {
        assert!(!runs.is_empty(), "need at least one chain");
        for run in &runs {
            assert_eq!(run.draws.len(), dim, "chain dimension mismatch");
            assert_eq!(
                run.draws[0].len(),
                runs[0].draws[0].len(),
                "chains recorded different draw counts"
            );
        }
        Self { dim, runs }
    }

    /// Number of chains.
    pub fn n_chains(&self) -> usize {
        self.runs.len()
    }

    /// Parameter dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Recorded draws per chain.
    pub fn draws_per_chain(&self) -> usize {
        self.runs[0].draws[0].len()
    }

    /// Total recorded draws across chains.
    pub fn total_draws(&self) -> usize {
        self.n_chains() * self.draws_per_chain()
    }

    /// Draws of parameter `j` from chain `c`.
    pub fn chain_draws(&self, c: usize, j: usize) -> &[f64] {
        &self.runs[c].draws[j]
    }

    /// Draws of parameter `j` pooled across chains.
    pub fn pooled(&self, j: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.total_draws());
        for run in &self.runs {
            out.extend_from_slice(&run.draws[j]);
        }
        out
    }

    /// Pooled draws of a derived quantity computed per draw.
    ///
    /// The closure receives the draw index within the pooled ordering and
    /// a lookup for any parameter's value at that draw.
    pub fn pooled_map(&self, f: impl Fn(&dyn Fn(usize) -> f64) -> f64) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.total_draws());
        for run in &self.runs {
            for i in 0..run.draws[0].len() {
                let lookup = |j: usize| run.draws[j][i];
                out.push(f(&lookup));
            }
        }
        out
    }

    /// Post-warmup acceptance rate per chain.
    pub fn acceptance_rates(&self) -> Vec<f64> {
        self.runs.iter().map(|r| r.acceptance_rate).collect()
    }
}
