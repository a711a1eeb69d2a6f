//! BanditPAM engine: BUILD and SWAP with adaptive sampling.
//!
//! Both phases treat every candidate as a bandit arm whose reward is the
//! expected change in assignment cost over a uniformly sampled reference
//! point. Arms accumulate batched reward estimates with Hoeffding-style
//! confidence bounds and are eliminated once provably dominated; an arm whose
//! sample count would reach the dataset size is promoted to an exact
//! evaluation instead, so a fully exhausted candidate set reproduces the
//! classical PAM choice exactly.
//!
//! Confidence schedule: with a per-phase failure budget
//! `delta = 1 / (n_arms * confidence)`, the half-width of an arm sampled T
//! times is `sigma * sqrt(ln(1/delta) / T)` - monotone shrinking in T, zero
//! once the arm is exact.

use oleander_metric::{DistanceCache, Metric, PointSet};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::config::KMedoidsConfig;
use crate::logger::FitLogger;
use crate::sampling::sample_without_replacement;
use crate::stats::{sample_std_dev, SigmaSummary};

/// Randomized medoid search. One instance per fit; holds the seeded RNG that
/// drives every batch draw, so identical seeds give identical fits.
pub(crate) struct BanditSearch<'a> {
    data: &'a PointSet,
    metric: Metric,
    cache: Option<&'a DistanceCache>,
    n_medoids: usize,
    max_iter: usize,
    batch_size: usize,
    build_confidence: usize,
    swap_confidence: usize,
    precision: f64,
    rng: ChaCha8Rng,
}

/// Reward sample for a BUILD candidate `c` against reference point `j`:
/// the change in `j`'s assignment cost if `c` joined the medoid set. The
/// first pass has no incumbent medoids and uses the absolute cost.
fn build_reward(
    data: &PointSet,
    metric: Metric,
    c: usize,
    j: usize,
    best: &[f64],
    use_absolute: bool,
) -> f64 {
    let cost = metric.distance(data, c, j);
    if use_absolute {
        cost
    } else {
        cost.min(best[j]) - best[j]
    }
}

/// Reward sample for a SWAP arm (remove medoid position `m`, insert point
/// `c`) against reference `j`: points owned by `m` fall back to their
/// second-best medoid unless `c` is closer; everyone else keeps their best.
fn swap_reward(
    data: &PointSet,
    metric: Metric,
    m: usize,
    c: usize,
    j: usize,
    d1: &[f64],
    d2: &[f64],
    assignments: &[usize],
) -> f64 {
    let cost = metric.distance(data, c, j);
    let after = if assignments[j] == m {
        cost.min(d2[j])
    } else {
        cost.min(d1[j])
    };
    after - d1[j]
}

impl<'a> BanditSearch<'a> {
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
            batch_size: config.batch_size,
            build_confidence: config.build_confidence,
            swap_confidence: config.swap_confidence,
            precision: config.precision,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Greedy BUILD: k passes, each selecting the candidate whose addition
    /// most reduces the total assignment cost, found by arm elimination.
    #[instrument(skip_all, fields(n = self.data.n_points(), k = self.n_medoids))]
    pub(crate) fn build(&mut self, logger: &mut FitLogger) -> Vec<usize> {
        let data = self.data;
        let metric = self.metric;
        let cache = self.cache;
        let n = data.n_points();
        let batch = self.batch_size.min(n);
        let log_term = ((n * self.build_confidence) as f64).ln();

        let mut medoids: Vec<usize> = Vec::with_capacity(self.n_medoids);
        let mut best = vec![f64::INFINITY; n];

        for pass in 0..self.n_medoids {
            let use_absolute = medoids.is_empty();

            // Dispersion estimate per arm from one shared reference batch.
            let refs = sample_without_replacement(n, batch, &mut self.rng);
            let sigma: Vec<f64> = (0..n)
                .into_par_iter()
                .map(|c| {
                    let samples: Vec<f64> = refs
                        .iter()
                        .map(|&j| build_reward(data, metric, c, j, &best, use_absolute))
                        .collect();
                    sample_std_dev(&samples)
                })
                .collect();
            logger.record_sigma_build(SigmaSummary::from_samples(&sigma));

            // Arm elimination over the candidates not yet in the medoid set.
            let mut mu = vec![0.0f64; n];
            let mut t = vec![0usize; n];
            let mut active: Vec<usize> = (0..n).filter(|c| !medoids.contains(c)).collect();

            while active.len() > 1 && active.iter().any(|&c| t[c] < n) {
                let refs = sample_without_replacement(n, batch, &mut self.rng);
                let updates: Vec<(usize, f64, usize)> = active
                    .par_iter()
                    .filter(|&&c| t[c] < n)
                    .map(|&c| {
                        if t[c] + batch >= n {
                            // Exact promotion: evaluate over every reference.
                            let mean = (0..n)
                                .map(|j| build_reward(data, metric, c, j, &best, use_absolute))
                                .sum::<f64>()
                                / n as f64;
                            (c, mean, n)
                        } else {
                            let batch_mean = refs
                                .iter()
                                .map(|&j| build_reward(data, metric, c, j, &best, use_absolute))
                                .sum::<f64>()
                                / refs.len() as f64;
                            let t_new = t[c] + refs.len();
                            let mu_new = (t[c] as f64 * mu[c] + refs.len() as f64 * batch_mean)
                                / t_new as f64;
                            (c, mu_new, t_new)
                        }
                    })
                    .collect();
                for (c, mean, samples) in updates {
                    mu[c] = mean;
                    t[c] = samples;
                }

                let half_width = |c: usize| {
                    if t[c] >= n {
                        0.0
                    } else {
                        sigma[c] * (log_term / t[c] as f64).sqrt()
                    }
                };
                let best_ucb = active
                    .iter()
                    .map(|&c| mu[c] + half_width(c))
                    .fold(f64::INFINITY, f64::min);
                // An arm survives while even its optimistic bound does not
                // exceed the tightest pessimistic bound in the set.
                active.retain(|&c| mu[c] - half_width(c) <= best_ucb);
            }

            // Smallest mean wins; `active` is ascending, so a strict
            // comparison keeps the lowest index on ties.
            let mut chosen = active[0];
            for &c in &active[1..] {
                if mu[c] < mu[chosen] {
                    chosen = c;
                }
            }
            medoids.push(chosen);

            best = (0..n)
                .into_par_iter()
                .map(|j| crate::eval::distance(data, metric, cache, chosen, j).min(best[j]))
                .collect();
            let pass_loss: f64 = best.iter().sum();
            logger.record_loss_build(pass_loss);
            debug!(pass, chosen, loss = pass_loss, "build pass complete");
        }

        medoids
    }

    /// SWAP refinement: repeatedly search the (medoid, non-medoid) arm space
    /// for the swap with the most negative expected cost change, stopping
    /// when the best survivor no longer strictly improves the total loss.
    ///
    /// Returns the number of accepted swaps.
    #[instrument(skip_all, fields(n = self.data.n_points(), k = medoids.len()))]
    pub(crate) fn swap(&mut self, medoids: &mut [usize], logger: &mut FitLogger) -> usize {
        let data = self.data;
        let metric = self.metric;
        let cache = self.cache;
        let n = data.n_points();
        let k = medoids.len();
        let batch = self.batch_size.min(n);
        let log_term = ((k * n * self.swap_confidence) as f64).ln();

        let mut steps = 0usize;

        while steps < self.max_iter {
            let (d1, d2, assignments) =
                crate::eval::best_and_second(data, metric, cache, medoids);

            // Arms are indexed k-major (`arm = m * n + c`) so that ascending
            // order is the (lowest medoid position, lowest candidate)
            // tie-break order.
            let refs = sample_without_replacement(n, batch, &mut self.rng);
            let sigma: Vec<f64> = (0..k * n)
                .into_par_iter()
                .map(|arm| {
                    let (m, c) = (arm / n, arm % n);
                    let samples: Vec<f64> = refs
                        .iter()
                        .map(|&j| swap_reward(data, metric, m, c, j, &d1, &d2, &assignments))
                        .collect();
                    sample_std_dev(&samples)
                })
                .collect();
            logger.record_sigma_swap(SigmaSummary::from_samples(&sigma));

            let mut mu = vec![0.0f64; k * n];
            let mut t = vec![0usize; k * n];
            let mut active: Vec<usize> = (0..k * n)
                .filter(|arm| !medoids.contains(&(arm % n)))
                .collect();
            if active.is_empty() {
                // Every point is a medoid; nothing to swap.
                break;
            }

            while active.len() > 1 && active.iter().any(|&a| t[a] < n) {
                let refs = sample_without_replacement(n, batch, &mut self.rng);
                let updates: Vec<(usize, f64, usize)> = active
                    .par_iter()
                    .filter(|&&a| t[a] < n)
                    .map(|&a| {
                        let (m, c) = (a / n, a % n);
                        if t[a] + batch >= n {
                            let mean = (0..n)
                                .map(|j| {
                                    swap_reward(data, metric, m, c, j, &d1, &d2, &assignments)
                                })
                                .sum::<f64>()
                                / n as f64;
                            (a, mean, n)
                        } else {
                            let batch_mean = refs
                                .iter()
                                .map(|&j| {
                                    swap_reward(data, metric, m, c, j, &d1, &d2, &assignments)
                                })
                                .sum::<f64>()
                                / refs.len() as f64;
                            let t_new = t[a] + refs.len();
                            let mu_new = (t[a] as f64 * mu[a] + refs.len() as f64 * batch_mean)
                                / t_new as f64;
                            (a, mu_new, t_new)
                        }
                    })
                    .collect();
                for (a, mean, samples) in updates {
                    mu[a] = mean;
                    t[a] = samples;
                }

                let half_width = |a: usize| {
                    if t[a] >= n {
                        0.0
                    } else {
                        sigma[a] * (log_term / t[a] as f64).sqrt()
                    }
                };
                let best_ucb = active
                    .iter()
                    .map(|&a| mu[a] + half_width(a))
                    .fold(f64::INFINITY, f64::min);
                active.retain(|&a| mu[a] - half_width(a) <= best_ucb);
            }

            let mut best_arm = active[0];
            for &a in &active[1..] {
                if mu[a] < mu[best_arm] {
                    best_arm = a;
                }
            }

            // The accept decision is taken on the exact mean, so an accepted
            // swap always strictly lowers the true loss.
            if t[best_arm] < n {
                let (m, c) = (best_arm / n, best_arm % n);
                mu[best_arm] = (0..n)
                    .map(|j| swap_reward(data, metric, m, c, j, &d1, &d2, &assignments))
                    .sum::<f64>()
                    / n as f64;
            }

            let total_delta = mu[best_arm] * n as f64;
            if total_delta >= -self.precision {
                debug!(steps, "no improving swap; stopping");
                break;
            }

            let (m, c) = (best_arm / n, best_arm % n);
            medoids[m] = c;
            steps += 1;
            let loss = crate::eval::total_loss(data, metric, cache, medoids);
            logger.record_loss_swap(loss);
            debug!(step = steps, position = m, candidate = c, loss, "swap accepted");
        }

        steps
    }
}
