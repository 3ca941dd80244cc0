//! MCMC convergence diagnostics: split R-hat and effective sample size.
//!
//! Both follow the formulations in Gelman et al., "Bayesian Data
//! Analysis" (3rd ed., §11.4–11.5): chains are split in half to detect
//! within-chain drift, and the effective sample size truncates the
//! autocorrelation sum with Geyer's initial positive sequence.

/// Potential scale reduction factor over split chains.
///
/// Each chain is split in half and the usual between/within variance
/// ratio is computed over the resulting sequences. Values near 1.0
/// indicate the chains agree; values above ~1.05 indicate the sampler
/// has not mixed.
///
/// Returns 1.0 when the draws carry no variance at all (degenerate but
/// trivially converged).
///
/// # Panics
///
/// Panics if no chains are given or a chain has fewer than 4 draws.
pub fn split_rhat(chains: &[&[f64]]) -> f64 {
    assert!(!chains.is_empty(), "need at least one chain");
    for c in chains {
        assert!(c.len() >= 4, "need at least 4 draws per chain for split R-hat");
    }

    let sequences = split_in_half(chains);
    let n = sequences[0].len();
    let m = sequences.len();

    let means: Vec<f64> = sequences.iter().map(|s| mean(s)).collect();
    let grand = mean(&means);

    let b = n as f64 / (m - 1) as f64
        * means.iter().map(|mu| (mu - grand) * (mu - grand)).sum::<f64>();
    let w = sequences
        .iter()
        .zip(&means)
        .map(|(s, &mu)| s.iter().map(|x| (x - mu) * (x - mu)).sum::<f64>() / (n - 1) as f64)
        .sum::<f64>()
        / m as f64;

    if w <= 0.0 {
        return 1.0;
    }

    let var_plus = (n - 1) as f64 / n as f64 * w + b / n as f64;
    (var_plus / w).sqrt()
}

/// Effective sample size pooled across chains.
///
/// Computes the combined autocorrelation estimate over all chains and
/// truncates the sum at the first non-positive Geyer pair, enforcing
/// monotone decrease. The result is capped at the total number of draws.
///
/// Returns the total draw count when the draws carry no variance.
///
/// # Panics
///
/// Panics if no chains are given or a chain has fewer than 4 draws.
pub fn effective_sample_size(chains: &[&[f64]]) -> f64 {
    assert!(!chains.is_empty(), "need at least one chain");
    for c in chains {
        assert!(c.len() >= 4, "need at least 4 draws per chain for ESS");
    }

    let m = chains.len();
    let n = chains.iter().map(|c| c.len()).min().expect("nonempty");
    let total = (m * n) as f64;

    let means: Vec<f64> = chains.iter().map(|c| mean(&c[..n])).collect();
    let vars: Vec<f64> = chains
        .iter()
        .zip(&means)
        .map(|(c, &mu)| {
            c[..n].iter().map(|x| (x - mu) * (x - mu)).sum::<f64>() / (n - 1) as f64
        })
        .collect();

    let w = mean(&vars);
    if w <= 0.0 {
        return total;
    }

    let var_plus = if m > 1 {
        let grand = mean(&means);
        let b_over_n = means
            .iter()
            .map(|mu| (mu - grand) * (mu - grand))
            .sum::<f64>()
            / (m - 1) as f64;
        (n - 1) as f64 / n as f64 * w + b_over_n
    } else {
        w
    };

    // Combined autocorrelation at each lag (BDA3 eq. 11.7).
    let rho = |t: usize| -> f64 {
        let mean_autocov = chains
            .iter()
            .zip(&means)
            .map(|(c, &mu)| autocovariance(&c[..n], mu, t))
            .sum::<f64>()
            / m as f64;
        1.0 - (w - mean_autocov) / var_plus
    };

    // Geyer initial positive (and monotone) sequence.
    let max_lag = n - 1;
    let mut tau = 1.0;
    let mut prev_pair = f64::INFINITY;
    let mut t = 1;
    while t + 1 <= max_lag {
        let pair = rho(t) + rho(t + 1);
        if pair <= 0.0 {
            break;
        }
        let pair = pair.min(prev_pair);
        tau += 2.0 * pair;
        prev_pair = pair;
        t += 2;
    }

    (total / tau).min(total)
}

fn split_in_half(chains: &[&[f64]]) -> Vec<Vec<f64>> {
    let n = chains.iter().map(|c| c.len()).min().expect("nonempty");
    let half = n / 2;
    let mut out = Vec::with_capacity(chains.len() * 2);
    for c in chains {
        out.push(c[..half].to_vec());
        out.push(c[n - half..n].to_vec());
    }
    out
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn autocovariance(xs: &[f64], mu: f64, lag: usize) -> f64 {
    let n = xs.len();
    if lag >= n {
        return 0.0;
    }
    xs[..n - lag]
        .iter()
        .zip(&xs[lag..])
        .map(|(a, b)| (a - mu) * (b - mu))
        .sum::<f64>()
        / n as f64
}
