//! Thread-safe memo for symmetric pairwise distances.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::metric::Metric;
use crate::points::PointSet;

/// Memoizes `(i, j) → distance` under a canonical ordered key, so symmetric
/// metrics share one entry per unordered pair.
///
/// The cache is an optimization hint only: engines must produce identical
/// results with or without it. Shared read/write across rayon workers, hence
/// the lock.
#[derive(Debug, Default)]
pub struct DistanceCache {
    map: RwLock<HashMap<(usize, usize), f64>>,
}

impl DistanceCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance between points `i` and `j`, computed through `metric` on a
    /// miss and memoized for subsequent lookups.
    #[must_use]
    pub fn distance(&self, metric: Metric, points: &PointSet, i: usize, j: usize) -> f64 {
        let key = if i <= j { (i, j) } else { (j, i) };
        if let Some(&d) = self.map.read().get(&key) {
            return d;
        }
        let d = metric.distance(points, i, j);
        self.map.write().insert(key, d);
        d
    }

    /// Number of memoized pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// Return true if no pair has been memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    /// Drop all memoized pairs.
    pub fn clear(&self) {
        self.map.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> PointSet {
        PointSet::new(1, vec![0.0, 3.0, 7.0]).unwrap()
    }

    #[test]
    fn memoizes_symmetric_pairs() {
        let points = points();
        let cache = DistanceCache::new();

        let d = cache.distance(Metric::Lp(2), &points, 0, 1);
        assert_eq!(d, 3.0);
        assert_eq!(cache.len(), 1);

        // Transposed lookup hits the same entry.
        let d = cache.distance(Metric::Lp(2), &points, 1, 0);
        assert_eq!(d, 3.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn matches_direct_computation() {
        let points = points();
        let cache = DistanceCache::new();
        for metric in [Metric::Lp(2), Metric::Manhattan, Metric::LInf] {
            for i in 0..3 {
                for j in 0..3 {
                    assert_eq!(
                        cache.distance(metric, &points, i, j),
                        metric.distance(&points, i, j)
                    );
                }
            }
            cache.clear();
        }
    }

    #[test]
    fn clear_empties_the_map() {
        let points = points();
        let cache = DistanceCache::new();
        cache.distance(Metric::Lp(2), &points, 0, 2);
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
