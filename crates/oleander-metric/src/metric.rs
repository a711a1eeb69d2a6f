//! Distance functions over point matrix columns.

use std::str::FromStr;

use crate::error::MetricError;
use crate::points::PointSet;

/// Pairwise distance function between two columns of a [`PointSet`].
///
/// Selected by name via [`Metric::parse`]; the variants are dispatched with a
/// `match` at each call site so the compiler can specialize the inner loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Minkowski distance `(Σ |x_i − y_i|^p)^(1/p)` for integer `p ≥ 1`.
    /// `Lp(2)` is the Euclidean distance.
    Lp(u32),
    /// Chebyshev distance `max |x_i − y_i|`.
    LInf,
    /// Taxicab distance `Σ |x_i − y_i|`; equal to `Lp(1)` but kept as a
    /// named variant to match the public loss-name grammar.
    Manhattan,
    /// Cosine dissimilarity `1 − x·y / (‖x‖·‖y‖)`, in `[0, 2]`.
    Cosine,
}

impl Metric {
    /// Parse a loss name of the form `manhattan | cos | inf | L?<digit>+`.
    ///
    /// The exact names are checked first, then an optional leading `L` is
    /// stripped and the remainder parsed as a positive integer exponent.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricError::UnrecognizedLoss`] | The name matches no rule, or the exponent is 0 or overflows |
    pub fn parse(name: &str) -> Result<Self, MetricError> {
        match name {
            "manhattan" => return Ok(Self::Manhattan),
            "cos" => return Ok(Self::Cosine),
            "inf" => return Ok(Self::LInf),
            _ => {}
        }
        let digits = name.strip_prefix('L').unwrap_or(name);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(p @ 1..) = digits.parse::<u32>() {
                return Ok(Self::Lp(p));
            }
        }
        Err(MetricError::UnrecognizedLoss {
            name: name.to_owned(),
        })
    }

    /// Distance between points `i` and `j` of `points`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    #[must_use]
    pub fn distance(&self, points: &PointSet, i: usize, j: usize) -> f64 {
        let x = points.col(i);
        let y = points.col(j);
        match *self {
            Self::Lp(1) | Self::Manhattan => x
                .iter()
                .zip(y)
                .map(|(a, b)| (a - b).abs())
                .sum(),
            Self::Lp(2) => x
                .iter()
                .zip(y)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt(),
            Self::Lp(p) => x
                .iter()
                .zip(y)
                .map(|(a, b)| (a - b).abs().powi(p as i32))
                .sum::<f64>()
                .powf(1.0 / f64::from(p)),
            Self::LInf => x
                .iter()
                .zip(y)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
            Self::Cosine => {
                let (mut dot, mut nx, mut ny) = (0.0, 0.0, 0.0);
                for (a, b) in x.iter().zip(y) {
                    dot += a * b;
                    nx += a * a;
                    ny += b * b;
                }
                1.0 - dot / (nx.sqrt() * ny.sqrt())
            }
        }
    }

    /// Check that every point of `points` is usable under this metric.
    ///
    /// Only the cosine metric constrains the data: a zero-norm point would
    /// divide by zero.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricError::ZeroVector`] | Cosine metric and some column is all zeros |
    pub fn validate(&self, points: &PointSet) -> Result<(), MetricError> {
        if *self != Self::Cosine {
            return Ok(());
        }
        for point in 0..points.n_points() {
            if points.col(point).iter().all(|&v| v == 0.0) {
                return Err(MetricError::ZeroVector { point });
            }
        }
        Ok(())
    }
}

impl FromStr for Metric {
    type Err = MetricError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::parse(name)
    }
}
