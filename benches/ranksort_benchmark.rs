use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{seq::SliceRandom, thread_rng};

fn distinct_input(n: usize, universe: u64) -> Vec<u64> {
    let mut values: Vec<u64> = (0..universe).collect();
    values.shuffle(&mut thread_rng());
    values.truncate(n);
    values
}

fn bench_dense_sets(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_sets");
    group.sample_size(250);

    for n in [4usize, 8, 12] {
        let input = distinct_input(n, n as u64);

        group.bench_function(BenchmarkId::new("ranksort", n), |b| {
            b.iter_batched(
                || input.clone(),
                |mut data| ranksort::sort(black_box(&mut data)).unwrap(),
                criterion::BatchSize::SmallInput,
            )
        });
        group.bench_function(BenchmarkId::new("ranksort_zero_based", n), |b| {
            b.iter_batched(
                || input.clone(),
                |mut data| ranksort::sort_zero_based(black_box(&mut data)).unwrap(),
                criterion::BatchSize::SmallInput,
            )
        });
        group.bench_function(BenchmarkId::new("std_sort_unstable", n), |b| {
            b.iter_batched(
                || input.clone(),
                |mut data| black_box(&mut data).sort_unstable(),
                criterion::BatchSize::SmallInput,
            )
        });
    }
}

fn bench_wide_word(c: &mut Criterion) {
    let mut group = c.benchmark_group("u128_word");
    group.sample_size(250);

    for n in [16usize, 21] {
        let input = distinct_input(n, n as u64);

        group.bench_function(BenchmarkId::new("ranksort", n), |b| {
            b.iter_batched(
                || input.clone(),
                |mut data| ranksort::sort_with::<u128, _>(black_box(&mut data)).unwrap(),
                criterion::BatchSize::SmallInput,
            )
        });
        group.bench_function(BenchmarkId::new("std_sort_unstable", n), |b| {
            b.iter_batched(
                || input.clone(),
                |mut data| black_box(&mut data).sort_unstable(),
                criterion::BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(ranksort_benches, bench_dense_sets, bench_wide_word);
criterion_main!(ranksort_benches);
