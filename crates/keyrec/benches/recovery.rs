use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use keyrec::simulation::{contact_cdf, contact_cdf_par};
use keyrec::{create_packets, run_trial, BatchParams, SchemeParams};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bench_single_trial(c: &mut Criterion) {
    let mut group = c.benchmark_group("single recovery trial");
    for anonymity in [50, 200, 800] {
        let params = SchemeParams::additive(2, 50, 3, 4, 12, anonymity);
        let mut rng = ChaCha20Rng::seed_from_u64(17);
        let dist = create_packets(&params, &mut rng).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(anonymity),
            &dist,
            |b, dist| {
                b.iter(|| {
                    run_trial(
                        dist,
                        params.leaf_threshold(),
                        params.upper_threshold(),
                        &mut rng,
                    )
                })
            },
        );
    }
    group.finish();
}

fn bench_batches(c: &mut Criterion) {
    let params = SchemeParams::additive(2, 50, 3, 4, 12, 100);
    let batch = BatchParams {
        simulations_dist: 20,
        simulations_run: 50,
    };
    let mut group = c.benchmark_group("contact cdf batch");
    group.bench_function("sequential", |b| {
        let mut rng = ChaCha20Rng::seed_from_u64(23);
        b.iter(|| contact_cdf(&batch, &params, &mut rng).unwrap())
    });
    group.bench_function("parallel", |b| {
        let mut rng = ChaCha20Rng::seed_from_u64(23);
        b.iter(|| contact_cdf_par(&batch, &params, &mut rng).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_single_trial, bench_batches);
criterion_main!(benches);
