//! Batch sampling for the bandit engines.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Sample `batch_size` distinct indices from `0..n` without replacement using
/// a partial Fisher-Yates shuffle.
///
/// When `batch_size >= n`, all `n` indices are returned in a shuffled order.
pub(crate) fn sample_without_replacement(
    n: usize,
    batch_size: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<usize> {
    let actual = batch_size.min(n);
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..actual {
        let j = rng.gen_range(i..n);
        indices.swap(i, j);
    }
    indices.truncate(actual);
    indices
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::sample_without_replacement;

    #[test]
    fn returns_distinct_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let sample = sample_without_replacement(50, 20, &mut rng);

        assert_eq!(sample.len(), 20);
        assert!(sample.iter().all(|&i| i < 50));

        let mut dedup = sample.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), 20, "indices must be distinct");
    }

    #[test]
    fn oversized_batch_covers_everything() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sample = sample_without_replacement(7, 100, &mut rng);
        sample.sort_unstable();
        assert_eq!(sample, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn deterministic_with_same_seed() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(9);
        let mut rng2 = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(
            sample_without_replacement(30, 10, &mut rng1),
            sample_without_replacement(30, 10, &mut rng2)
        );
    }
}
