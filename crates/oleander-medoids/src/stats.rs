//! Per-arm statistics for the bandit elimination loops.

use std::fmt;

/// Sample standard deviation with n-1 normalization.
///
/// Returns 0.0 for fewer than two samples.
pub(crate) fn sample_std_dev(samples: &[f64]) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }
    let mean = samples.iter().sum::<f64>() / n as f64;
    let var = samples
        .iter()
        .map(|s| (s - mean) * (s - mean))
        .sum::<f64>()
        / (n - 1) as f64;
    var.sqrt()
}

/// Six-number summary of a dispersion distribution, recorded to the fit log
/// once per BUILD pass and once per SWAP iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SigmaSummary {
    pub(crate) min: f64,
    pub(crate) q1: f64,
    pub(crate) median: f64,
    pub(crate) q3: f64,
    pub(crate) max: f64,
    pub(crate) mean: f64,
}

impl SigmaSummary {
    /// Summarize a non-empty slice of sigma values.
    ///
    /// Quartiles use sorted-sample linear interpolation.
    pub(crate) fn from_samples(samples: &[f64]) -> Self {
        debug_assert!(!samples.is_empty(), "sigma table cannot be empty");
        let mut sorted = samples.to_vec();
        sorted.sort_unstable_by(f64::total_cmp);

        let quantile = |p: f64| -> f64 {
            let h = p * (sorted.len() - 1) as f64;
            let lo = h.floor() as usize;
            let hi = h.ceil() as usize;
            sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
        };

        Self {
            min: sorted[0],
            q1: quantile(0.25),
            median: quantile(0.5),
            q3: quantile(0.75),
            max: sorted[sorted.len() - 1],
            mean: samples.iter().sum::<f64>() / samples.len() as f64,
        }
    }
}

impl fmt::Display for SigmaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min: {}, 25th: {}, median: {}, 75th: {}, max: {}, mean: {}",
            self.min, self.q1, self.median, self.q3, self.max, self.mean
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{sample_std_dev, SigmaSummary};

    #[test]
    fn std_dev_of_constant_is_zero() {
        assert_eq!(sample_std_dev(&[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn std_dev_known_value() {
        // Sample variance of {2, 4, 4, 4, 5, 5, 7, 9} is 32/7.
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((sample_std_dev(&samples) - expected).abs() < 1e-12);
    }

    #[test]
    fn std_dev_degenerate_inputs() {
        assert_eq!(sample_std_dev(&[]), 0.0);
        assert_eq!(sample_std_dev(&[1.0]), 0.0);
    }

    #[test]
    fn summary_is_monotone() {
        let samples = [0.4, 0.1, 0.9, 0.2, 0.7, 0.3];
        let s = SigmaSummary::from_samples(&samples);
        assert!(s.min <= s.q1);
        assert!(s.q1 <= s.median);
        assert!(s.median <= s.q3);
        assert!(s.q3 <= s.max);
    }

    #[test]
    fn summary_of_singleton() {
        let s = SigmaSummary::from_samples(&[2.5]);
        assert_eq!(s.min, 2.5);
        assert_eq!(s.q1, 2.5);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q3, 2.5);
        assert_eq!(s.max, 2.5);
        assert_eq!(s.mean, 2.5);
    }

    #[test]
    fn summary_quartiles_interpolate() {
        let s = SigmaSummary::from_samples(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q3, 3.25);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.mean, 2.5);
    }
}
