//! Error types for point matrix validation and metric selection.

/// Errors from point matrix construction and distance function selection.
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    /// Returned when a metric name does not match `manhattan | cos | inf | L?<digit>+`.
    #[error("unrecognized loss function {name:?}")]
    UnrecognizedLoss {
        /// The name that failed to parse.
        name: String,
    },

    /// Returned when a matrix with zero rows or zero columns is provided.
    #[error("point matrix must have at least one dimension and one point")]
    EmptyMatrix,

    /// Returned when the flat value buffer does not divide evenly into columns.
    #[error("{len} values cannot form columns of dimension {dim}")]
    RaggedMatrix {
        /// Number of values provided.
        len: usize,
        /// Requested column dimension.
        dim: usize,
    },

    /// Returned when a matrix entry is NaN or infinite.
    #[error("point {point} has a non-finite value in coordinate {coordinate}")]
    NonFiniteValue {
        /// Column index of the offending point.
        point: usize,
        /// Row index of the first non-finite coordinate.
        coordinate: usize,
    },

    /// Returned when the cosine metric meets an all-zero point (undefined norm).
    #[error("point {point} is the zero vector; cosine distance is undefined")]
    ZeroVector {
        /// Column index of the zero-norm point.
        point: usize,
    },
}
