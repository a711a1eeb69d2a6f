//! Fit benchmarks comparing the bandit and exhaustive engines.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use oleander_medoids::{Algorithm, KMedoidsConfig};
use oleander_metric::PointSet;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// `n` points drawn uniformly from three Gaussian-ish blobs in R⁴.
fn blobs(n: usize) -> PointSet {
    let centers = [0.0, 25.0, 50.0];
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let columns: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let c = centers[i % centers.len()];
            (0..4).map(|_| c + rng.gen_range(-2.0..2.0)).collect()
        })
        .collect();
    PointSet::from_columns(&columns).unwrap()
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");

    for n in [150usize, 300] {
        let data = blobs(n);
        group.bench_with_input(BenchmarkId::new("bandit", n), &data, |b, data| {
            let config = KMedoidsConfig::new(3).unwrap().with_seed(42);
            b.iter(|| config.fit(data, "L2").unwrap());
        });
        group.bench_with_input(BenchmarkId::new("naive", n), &data, |b, data| {
            let config = KMedoidsConfig::new(3)
                .unwrap()
                .with_algorithm(Algorithm::Naive)
                .with_seed(42);
            b.iter(|| config.fit(data, "L2").unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fit);
criterion_main!(benches);
