//! BanditPAM k-medoids solver.
//!
//! Finds k representative data points (medoids) minimizing the total
//! distance from every point to its nearest medoid. The default engine is
//! BanditPAM: a greedy BUILD phase and an iterative SWAP phase that both use
//! bandit-style adaptive sampling with confidence bounds to avoid evaluating
//! every candidate in full, while matching the exact PAM result with high
//! probability. An exhaustive "naive" engine is provided as a correctness
//! oracle.
//!
//! ```
//! use oleander_medoids::KMedoidsConfig;
//! use oleander_metric::PointSet;
//!
//! let data = PointSet::new(1, vec![0.0, 0.2, 0.1, 9.0, 9.1, 8.9]).unwrap();
//! let result = KMedoidsConfig::new(2)
//!     .unwrap()
//!     .with_seed(42)
//!     .fit(&data, "L2")
//!     .unwrap();
//! assert_eq!(result.medoids.len(), 2);
//! ```

mod bandit;
mod config;
mod error;
mod eval;
mod label;
mod logger;
mod loss;
mod naive;
mod result;
mod sampling;
mod stats;

pub use config::{Algorithm, KMedoidsConfig};
pub use error::KMedoidsError;
pub use label::MedoidLabel;
pub use loss::TotalLoss;
pub use result::FitResult;
