//! Configuration builder and fit entry point.

use std::path::Path;
use std::str::FromStr;

use oleander_metric::{DistanceCache, Metric, PointSet};
use tracing::{info, instrument};

use crate::bandit::BanditSearch;
use crate::error::KMedoidsError;
use crate::label::MedoidLabel;
use crate::logger::FitLogger;
use crate::loss::TotalLoss;
use crate::naive::ExhaustiveSearch;
use crate::result::FitResult;

/// Medoid search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Randomized bandit search ("BanditPAM"); sub-linear expected work per
    /// candidate, matches the exact result with high probability.
    BanditPam,
    /// Exhaustive PAM ("naive"); exact, used as a correctness oracle.
    Naive,
}

impl Algorithm {
    /// Return the public name of the algorithm.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BanditPam => "BanditPAM",
            Self::Naive => "naive",
        }
    }
}

impl FromStr for Algorithm {
    type Err = KMedoidsError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "BanditPAM" => Ok(Self::BanditPam),
            "naive" => Ok(Self::Naive),
            _ => Err(KMedoidsError::UnrecognizedAlgorithm {
                name: name.to_owned(),
            }),
        }
    }
}

/// Configuration for a k-medoids fit.
///
/// Construct via [`KMedoidsConfig::new`], then chain `with_*` methods. The
/// config is immutable once built; parameters cannot change while a fit
/// borrows it.
///
/// # Defaults
///
/// | Parameter          | Default            |
/// |--------------------|--------------------|
/// | `algorithm`        | `BanditPam`        |
/// | `verbosity`        | 0                  |
/// | `max_iter`         | 1000               |
/// | `build_confidence` | 1000               |
/// | `swap_confidence`  | 10000              |
/// | `batch_size`       | 100                |
/// | `precision`        | 1e-3               |
/// | `log_filename`     | "KMedoidsLogfile"  |
/// | `seed`             | 42                 |
/// | `use_cache`        | false              |
#[derive(Debug, Clone)]
pub struct KMedoidsConfig {
    pub(crate) n_medoids: usize,
    pub(crate) algorithm: Algorithm,
    pub(crate) verbosity: usize,
    pub(crate) max_iter: usize,
    pub(crate) build_confidence: usize,
    pub(crate) swap_confidence: usize,
    pub(crate) batch_size: usize,
    pub(crate) precision: f64,
    pub(crate) log_filename: String,
    pub(crate) seed: u64,
    pub(crate) use_cache: bool,
}

impl KMedoidsConfig {
    /// Create a new config with the given number of medoids.
    ///
    /// # Errors
    ///
    /// Returns [`KMedoidsError::InvalidK`] if `n_medoids` is zero.
    pub fn new(n_medoids: usize) -> Result<Self, KMedoidsError> {
        if n_medoids == 0 {
            return Err(KMedoidsError::InvalidK { k: n_medoids });
        }
        Ok(Self {
            n_medoids,
            algorithm: Algorithm::BanditPam,
            verbosity: 0,
            max_iter: 1000,
            build_confidence: 1000,
            swap_confidence: 10000,
            batch_size: 100,
            precision: 1e-3,
            log_filename: "KMedoidsLogfile".to_owned(),
            seed: 42,
            use_cache: false,
        })
    }

    // --- Setters ---

    /// Set the search strategy.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the verbosity; any value above 0 writes a log file during fit.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: usize) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the maximum number of SWAP iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the BUILD confidence constant; larger means tighter bounds.
    #[must_use]
    pub fn with_build_confidence(mut self, build_confidence: usize) -> Self {
        self.build_confidence = build_confidence;
        self
    }

    /// Set the SWAP confidence constant; larger means tighter bounds.
    #[must_use]
    pub fn with_swap_confidence(mut self, swap_confidence: usize) -> Self {
        self.swap_confidence = swap_confidence;
        self
    }

    /// Set the reference batch size for the bandit sampling loops.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the float-comparison precision used by the swap accept test.
    #[must_use]
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Set the log file name used when verbosity is above 0.
    #[must_use]
    pub fn with_log_filename(mut self, log_filename: impl Into<String>) -> Self {
        self.log_filename = log_filename.into();
        self
    }

    /// Set the RNG seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable the pairwise distance memo.
    #[must_use]
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    // --- Getters ---

    /// Return the number of medoids.
    #[must_use]
    pub fn n_medoids(&self) -> usize {
        self.n_medoids
    }

    /// Return the search strategy.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Return the verbosity.
    #[must_use]
    pub fn verbosity(&self) -> usize {
        self.verbosity
    }

    /// Return the maximum number of SWAP iterations.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Return the BUILD confidence constant.
    #[must_use]
    pub fn build_confidence(&self) -> usize {
        self.build_confidence
    }

    /// Return the SWAP confidence constant.
    #[must_use]
    pub fn swap_confidence(&self) -> usize {
        self.swap_confidence
    }

    /// Return the reference batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Return the float-comparison precision.
    #[must_use]
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Return the log file name.
    #[must_use]
    pub fn log_filename(&self) -> &str {
        &self.log_filename
    }

    /// Return the RNG seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return true if the distance memo is enabled.
    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.use_cache
    }

    // --- Fit ---

    /// Find `n_medoids` medoids of `data` under the named loss function.
    ///
    /// Runs the configured algorithm's BUILD then SWAP phase and returns the
    /// build medoids, final medoids, per-point assignments, accepted swap
    /// count and final loss. With `verbosity > 0` a log file is written.
    /// Errors abort the fit; no partial results are exposed.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`KMedoidsError::Metric`] | `loss` does not parse, or the data is unusable under it |
    /// | [`KMedoidsError::TooFewPoints`] | `data` has fewer than `n_medoids` points |
    /// | [`KMedoidsError::InvalidMaxIter`] | `max_iter` is zero |
    /// | [`KMedoidsError::InvalidBatchSize`] | `batch_size` is zero |
    /// | [`KMedoidsError::LogFile`] | The log file cannot be created or written |
    #[instrument(skip(self, data), fields(
        n = data.n_points(),
        k = self.n_medoids,
        algorithm = self.algorithm.as_str(),
    ))]
    pub fn fit(&self, data: &PointSet, loss: &str) -> Result<FitResult, KMedoidsError> {
        let metric = Metric::parse(loss)?;
        let n = data.n_points();
        if self.n_medoids > n {
            return Err(KMedoidsError::TooFewPoints {
                n_points: n,
                k: self.n_medoids,
            });
        }
        if self.max_iter == 0 {
            return Err(KMedoidsError::InvalidMaxIter);
        }
        if self.batch_size == 0 {
            return Err(KMedoidsError::InvalidBatchSize);
        }
        metric.validate(data)?;

        let cache = self.use_cache.then(DistanceCache::new);
        let mut logger = FitLogger::create(self.verbosity, Path::new(&self.log_filename))?;

        let (build_medoids, medoids, steps) = match self.algorithm {
            Algorithm::BanditPam => {
                let mut search = BanditSearch::new(data, metric, cache.as_ref(), self);
                let build_medoids = search.build(&mut logger);
                let mut medoids = build_medoids.clone();
                let steps = search.swap(&mut medoids, &mut logger);
                (build_medoids, medoids, steps)
            }
            Algorithm::Naive => {
                let search = ExhaustiveSearch::new(data, metric, cache.as_ref(), self);
                let build_medoids = search.build(&mut logger);
                let mut medoids = build_medoids.clone();
                let steps = search.swap(&mut medoids, &mut logger);
                (build_medoids, medoids, steps)
            }
        };

        let (d1, _, assignments) =
            crate::eval::best_and_second(data, metric, cache.as_ref(), &medoids);
        let loss_value: f64 = d1.iter().sum();

        logger.write_profile(&build_medoids, &medoids, steps, loss_value)?;

        info!(steps, loss = loss_value, "fit complete");

        Ok(FitResult {
            build_medoids,
            medoids,
            assignments: assignments.into_iter().map(MedoidLabel::new).collect(),
            steps,
            loss: TotalLoss::new(loss_value),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::KMedoidsError;

    use super::{Algorithm, KMedoidsConfig};

    #[test]
    fn algorithm_names_roundtrip() {
        let bpam: Algorithm = "BanditPAM".parse().unwrap();
        let naive: Algorithm = "naive".parse().unwrap();
        assert_eq!(bpam, Algorithm::BanditPam);
        assert_eq!(naive, Algorithm::Naive);
        assert_eq!(bpam.as_str(), "BanditPAM");
        assert_eq!(naive.as_str(), "naive");
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let result: Result<Algorithm, _> = "kmeans".parse();
        assert!(matches!(
            result,
            Err(KMedoidsError::UnrecognizedAlgorithm { .. })
        ));
    }

    #[test]
    fn zero_medoids_is_rejected() {
        assert!(matches!(
            KMedoidsConfig::new(0),
            Err(KMedoidsError::InvalidK { k: 0 })
        ));
    }

    #[test]
    fn defaults_match_documentation() {
        let config = KMedoidsConfig::new(5).unwrap();
        assert_eq!(config.n_medoids(), 5);
        assert_eq!(config.algorithm(), Algorithm::BanditPam);
        assert_eq!(config.verbosity(), 0);
        assert_eq!(config.max_iter(), 1000);
        assert_eq!(config.build_confidence(), 1000);
        assert_eq!(config.swap_confidence(), 10000);
        assert_eq!(config.batch_size(), 100);
        assert!((config.precision() - 1e-3).abs() < f64::EPSILON);
        assert_eq!(config.log_filename(), "KMedoidsLogfile");
        assert_eq!(config.seed(), 42);
        assert!(!config.cache_enabled());
    }

    #[test]
    fn builder_chain_applies_every_field() {
        let config = KMedoidsConfig::new(3)
            .unwrap()
            .with_algorithm(Algorithm::Naive)
            .with_verbosity(1)
            .with_max_iter(50)
            .with_build_confidence(2000)
            .with_swap_confidence(20000)
            .with_batch_size(32)
            .with_precision(1e-6)
            .with_log_filename("out.log")
            .with_seed(7)
            .with_cache(true);

        assert_eq!(config.algorithm(), Algorithm::Naive);
        assert_eq!(config.verbosity(), 1);
        assert_eq!(config.max_iter(), 50);
        assert_eq!(config.build_confidence(), 2000);
        assert_eq!(config.swap_confidence(), 20000);
        assert_eq!(config.batch_size(), 32);
        assert!((config.precision() - 1e-6).abs() < f64::EPSILON);
        assert_eq!(config.log_filename(), "out.log");
        assert_eq!(config.seed(), 7);
        assert!(config.cache_enabled());
    }
}
