use crate::label::MedoidLabel;
use crate::loss::TotalLoss;

/// Result of a single k-medoids fit.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// Medoid indices at the end of the BUILD phase.
    pub build_medoids: Vec<usize>,
    /// Medoid indices at the end of the SWAP phase.
    pub medoids: Vec<usize>,
    /// For each input point, the position of its nearest final medoid.
    pub assignments: Vec<MedoidLabel>,
    /// Number of swaps accepted during the SWAP phase.
    pub steps: usize,
    /// Total assignment cost under the final medoids.
    pub loss: TotalLoss,
}

impl FitResult {
    /// Return the data index of the medoid point `i` is assigned to.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[must_use]
    pub fn medoid_of(&self, i: usize) -> usize {
        self.medoids[self.assignments[i].position()]
    }

    /// Return how many points are assigned to each medoid, indexed by
    /// position in [`FitResult::medoids`].
    #[must_use]
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.medoids.len()];
        for label in &self.assignments {
            sizes[label.position()] += 1;
        }
        sizes
    }
}
