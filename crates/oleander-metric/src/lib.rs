//! Point matrices and distance functions for k-medoids clustering.
//!
//! Provides a validated column-major data matrix ([`PointSet`]), a family of
//! pairwise distance functions selected by name ([`Metric`]), and an optional
//! thread-safe memo for symmetric distances ([`DistanceCache`]).

mod cache;
mod error;
mod metric;
mod points;

pub use cache::DistanceCache;
pub use error::MetricError;
pub use metric::Metric;
pub use points::PointSet;
