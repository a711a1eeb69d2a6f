//! Loss evaluation and nearest-medoid bookkeeping shared by both engines.

use oleander_metric::{DistanceCache, Metric, PointSet};
use rayon::prelude::*;

/// Cache-aware distance lookup. The bandit batch loops bypass this and call
/// the metric directly; everything else routes through here so the optional
/// cache stays consistent.
pub(crate) fn distance(
    points: &PointSet,
    metric: Metric,
    cache: Option<&DistanceCache>,
    i: usize,
    j: usize,
) -> f64 {
    match cache {
        Some(cache) => cache.distance(metric, points, i, j),
        None => metric.distance(points, i, j),
    }
}

/// Total assignment cost of `medoids`: the sum over all points of the
/// distance to the nearest medoid. Parallel over points.
pub(crate) fn total_loss(
    points: &PointSet,
    metric: Metric,
    cache: Option<&DistanceCache>,
    medoids: &[usize],
) -> f64 {
    (0..points.n_points())
        .into_par_iter()
        .map(|j| {
            medoids
                .iter()
                .map(|&m| distance(points, metric, cache, m, j))
                .fold(f64::INFINITY, f64::min)
        })
        .sum()
}

/// Best and second-best distances from every point to the medoid set, plus
/// the position of the nearest medoid. Parallel over points; each iteration
/// writes only its own slot.
///
/// With a single medoid the second-best distance is infinite. Ties go to the
/// earliest medoid position.
pub(crate) fn best_and_second(
    points: &PointSet,
    metric: Metric,
    cache: Option<&DistanceCache>,
    medoids: &[usize],
) -> (Vec<f64>, Vec<f64>, Vec<usize>) {
    let rows: Vec<(f64, f64, usize)> = (0..points.n_points())
        .into_par_iter()
        .map(|j| {
            let mut best = f64::INFINITY;
            let mut second = f64::INFINITY;
            let mut nearest = 0usize;
            for (position, &m) in medoids.iter().enumerate() {
                let cost = distance(points, metric, cache, m, j);
                if cost < best {
                    second = best;
                    best = cost;
                    nearest = position;
                } else if cost < second {
                    second = cost;
                }
            }
            (best, second, nearest)
        })
        .collect();

    let mut d1 = Vec::with_capacity(rows.len());
    let mut d2 = Vec::with_capacity(rows.len());
    let mut assignments = Vec::with_capacity(rows.len());
    for (best, second, nearest) in rows {
        d1.push(best);
        d2.push(second);
        assignments.push(nearest);
    }
    (d1, d2, assignments)
}

#[cfg(test)]
mod tests {
    use oleander_metric::{DistanceCache, Metric, PointSet};

    use super::{best_and_second, total_loss};

    /// Five points on a line: 0, 1, 2, 10, 11.
    fn line() -> PointSet {
        PointSet::new(1, vec![0.0, 1.0, 2.0, 10.0, 11.0]).unwrap()
    }

    #[test]
    fn total_loss_sums_nearest_distances() {
        let points = line();
        // Medoids at values 1 and 10: distances are 1+0+1+0+1.
        let loss = total_loss(&points, Metric::Lp(2), None, &[1, 3]);
        assert!((loss - 3.0).abs() < 1e-12);
    }

    #[test]
    fn total_loss_single_medoid() {
        let points = line();
        let loss = total_loss(&points, Metric::Lp(2), None, &[0]);
        assert!((loss - 24.0).abs() < 1e-12);
    }

    #[test]
    fn best_and_second_ordering() {
        let points = line();
        let (d1, d2, assignments) = best_and_second(&points, Metric::Lp(2), None, &[1, 3]);

        assert_eq!(assignments, vec![0, 0, 0, 1, 1]);
        for i in 0..5 {
            assert!(d1[i] <= d2[i], "d1 must not exceed d2 at point {i}");
        }
        assert_eq!(d1, vec![1.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(d2, vec![10.0, 9.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn single_medoid_has_infinite_second() {
        let points = line();
        let (d1, d2, assignments) = best_and_second(&points, Metric::Lp(2), None, &[2]);

        assert!(assignments.iter().all(|&a| a == 0));
        assert!(d2.iter().all(|&d| d.is_infinite()));
        assert_eq!(d1, vec![2.0, 1.0, 0.0, 8.0, 9.0]);
    }

    #[test]
    fn cache_does_not_change_results() {
        let points = line();
        let cache = DistanceCache::new();
        let metric = Metric::Manhattan;

        let plain = best_and_second(&points, metric, None, &[0, 4]);
        let cached = best_and_second(&points, metric, Some(&cache), &[0, 4]);
        assert_eq!(plain, cached);

        let plain_loss = total_loss(&points, metric, None, &[0, 4]);
        let cached_loss = total_loss(&points, metric, Some(&cache), &[0, 4]);
        assert_eq!(plain_loss, cached_loss);
        assert!(!cache.is_empty());
    }
}
