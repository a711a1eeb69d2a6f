use std::path::PathBuf;

use oleander_metric::MetricError;

/// Errors from k-medoids configuration and fitting.
#[derive(Debug, thiserror::Error)]
pub enum KMedoidsError {
    /// Returned when the algorithm name is neither "BanditPAM" nor "naive".
    #[error("unrecognized algorithm {name:?}")]
    UnrecognizedAlgorithm {
        /// The name that failed to parse.
        name: String,
    },

    /// Returned when the requested number of medoids is zero.
    #[error("n_medoids must be at least 1, got {k}")]
    InvalidK {
        /// The invalid medoid count.
        k: usize,
    },

    /// Returned when fewer points are provided than the requested medoid count.
    #[error("need at least {k} points to place {k} medoids, got {n_points}")]
    TooFewPoints {
        /// Number of points provided.
        n_points: usize,
        /// Requested number of medoids.
        k: usize,
    },

    /// Returned when max_iter is zero.
    #[error("max_iter must be at least 1")]
    InvalidMaxIter,

    /// Returned when batch_size is zero.
    #[error("batch_size must be at least 1")]
    InvalidBatchSize,

    /// Wraps a metric error: unparseable loss name or unusable input data.
    #[error(transparent)]
    Metric(#[from] MetricError),

    /// Returned when the log file cannot be created or written.
    #[error("cannot write log file {path}: {source}")]
    LogFile {
        /// The log file path.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
}
