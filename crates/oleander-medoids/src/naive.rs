//! Exact PAM engine: exhaustive BUILD and SWAP.
//!
//! Evaluates every candidate in full at every step. Serves as the
//! correctness oracle for the bandit engine: both use the same greedy
//! objective and the same lowest-(position, candidate) tie-break, so they
//! agree exactly whenever the bandit's candidate set is fully exhausted.

use oleander_metric::{DistanceCache, Metric, PointSet};
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::config::KMedoidsConfig;
use crate::logger::FitLogger;

pub(crate) struct ExhaustiveSearch<'a> {
    data: &'a PointSet,
    metric: Metric,
    cache: Option<&'a DistanceCache>,
    n_medoids: usize,
    max_iter: usize,
    precision: f64,
}

impl<'a> ExhaustiveSearch<'a> {
    pub(crate) fn new(
        data: &'a PointSet,
        metric: Metric,
        cache: Option<&'a DistanceCache>,
        config: &KMedoidsConfig,
    ) -> Self {
        Self {
            data,
            metric,
            cache,
            n_medoids: config.n_medoids,
            max_iter: config.max_iter,
            precision: config.precision,
        }
    }

    /// Greedy BUILD: k passes, each appending the unused point that
    /// minimizes the resulting total loss, evaluated exactly.
    #[instrument(skip_all, fields(n = self.data.n_points(), k = self.n_medoids))]
    pub(crate) fn build(&self, logger: &mut FitLogger) -> Vec<usize> {
        let data = self.data;
        let metric = self.metric;
        let n = data.n_points();

        let mut medoids: Vec<usize> = Vec::with_capacity(self.n_medoids);
        let mut best = vec![f64::INFINITY; n];

        for pass in 0..self.n_medoids {
            let use_absolute = medoids.is_empty();
            let losses: Vec<(usize, f64)> = (0..n)
                .into_par_iter()
                .filter(|c| !medoids.contains(c))
                .map(|c| {
                    let loss = (0..n)
                        .map(|j| {
                            let cost = metric.distance(data, c, j);
                            if use_absolute {
                                cost
                            } else {
                                cost.min(best[j])
                            }
                        })
                        .sum::<f64>();
                    (c, loss)
                })
                .collect();

            // `losses` is in ascending candidate order, so a strict
            // comparison keeps the lowest index on ties.
            let (mut chosen, mut chosen_loss) = losses[0];
            for &(c, loss) in &losses[1..] {
                if loss < chosen_loss {
                    chosen = c;
                    chosen_loss = loss;
                }
            }
            medoids.push(chosen);

            best = (0..n)
                .into_par_iter()
                .map(|j| {
                    crate::eval::distance(data, metric, self.cache, chosen, j).min(best[j])
                })
                .collect();
            logger.record_loss_build(chosen_loss);
            debug!(pass, chosen, loss = chosen_loss, "build pass complete");
        }

        medoids
    }

    /// Exhaustive SWAP: each iteration evaluates every (medoid position,
    /// non-medoid) pair in full and applies the best strictly improving
    /// swap, lowest (position, candidate) on ties.
    ///
    /// Returns the number of accepted swaps.
    #[instrument(skip_all, fields(n = self.data.n_points(), k = medoids.len()))]
    pub(crate) fn swap(&self, medoids: &mut [usize], logger: &mut FitLogger) -> usize {
        let data = self.data;
        let metric = self.metric;
        let n = data.n_points();
        let k = medoids.len();

        let mut steps = 0usize;

        while steps < self.max_iter {
            let (d1, d2, assignments) =
                crate::eval::best_and_second(data, metric, self.cache, medoids);

            let arms: Vec<usize> = (0..k * n)
                .filter(|arm| !medoids.contains(&(arm % n)))
                .collect();
            if arms.is_empty() {
                break;
            }

            let deltas: Vec<(usize, f64)> = arms
                .par_iter()
                .map(|&arm| {
                    let (m, c) = (arm / n, arm % n);
                    let delta = (0..n)
                        .map(|j| {
                            let cost = metric.distance(data, c, j);
                            let after = if assignments[j] == m {
                                cost.min(d2[j])
                            } else {
                                cost.min(d1[j])
                            };
                            after - d1[j]
                        })
                        .sum::<f64>();
                    (arm, delta)
                })
                .collect();

            let (mut best_arm, mut best_delta) = deltas[0];
            for &(arm, delta) in &deltas[1..] {
                if delta < best_delta {
                    best_arm = arm;
                    best_delta = delta;
                }
            }

            if best_delta >= -self.precision {
                debug!(steps, "no improving swap; stopping");
                break;
            }

            let (m, c) = (best_arm / n, best_arm % n);
            medoids[m] = c;
            steps += 1;
            let loss = crate::eval::total_loss(data, metric, self.cache, medoids);
            logger.record_loss_swap(loss);
            debug!(step = steps, position = m, candidate = c, loss, "swap accepted");
        }

        steps
    }
}
