//! Highest posterior density intervals.
//!
//! The HPD interval is the narrowest interval containing the requested
//! posterior mass. For a sample of draws it is found by sliding a window
//! of `ceil(mass · n)` draws over the sorted sample and keeping the
//! narrowest window, Kruschke's standard estimator for unimodal
//! marginals.

/// Compute the HPD interval of a set of draws.
///
/// # Arguments
///
/// * `sorted` - Draws sorted in ascending order
/// * `mass` - Interval mass in (0, 1], e.g. 0.95
///
/// # Returns
///
/// `(low, high)` bounds; both are actual draws from the sample.
///
/// # Panics
///
/// Panics if `sorted` is empty or `mass` is outside (0, 1].
pub fn hpd_interval(sorted: &[f64], mass: f64) -> (f64, f64) {
    assert!(!sorted.is_empty(), "Cannot compute HPD of empty sample");
    assert!(
        mass > 0.0 && mass <= 1.0,
        "HPD mass must be in (0, 1], got {}",
        mass
    );
    debug_assert!(
        sorted.windows(2).all(|w| w[0] <= w[1]),
        "draws must be sorted"
    );

    let n = sorted.len();
    let window = ((mass * n as f64).ceil() as usize).clamp(1, n);

    if window == n {
        return (sorted[0], sorted[n - 1]);
    }

    let mut best_start = 0;
    let mut best_width = f64::INFINITY;
    for start in 0..=(n - window) {
        let width = sorted[start + window - 1] - sorted[start];
        if width < best_width {
            best_width = width;
            best_start = start;
        }
    }

    (sorted[best_start], sorted[best_start + window - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mass_returns_range() {
        let draws = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(hpd_interval(&draws, 1.0), (1.0, 5.0));
    }

    #[test]
    fn test_narrowest_window_wins() {
        // A tight cluster plus one far outlier: the 80% window should
        // stay inside the cluster.
        let draws = [1.0, 1.1, 1.2, 1.3, 100.0];
        let (lo, hi) = hpd_interval(&draws, 0.8);
        assert_eq!((lo, hi), (1.0, 1.3));
    }

    #[test]
    fn test_single_draw() {
        assert_eq!(hpd_interval(&[3.5], 0.95), (3.5, 3.5));
    }

    #[test]
    fn test_interval_contains_mass() {
        let draws: Vec<f64> = (0..1000).map(|i| i as f64).collect();
        let (lo, hi) = hpd_interval(&draws, 0.95);

        let inside = draws.iter().filter(|&&x| x >= lo && x <= hi).count();
        assert!(inside as f64 >= 0.95 * draws.len() as f64);
    }

    #[test]
    #[should_panic(expected = "Cannot compute HPD of empty sample")]
    fn test_empty_panics() {
        hpd_interval(&[], 0.95);
    }

    #[test]
    #[should_panic(expected = "HPD mass must be in (0, 1]")]
    fn test_bad_mass_panics() {
        hpd_interval(&[1.0], 1.5);
    }
}
