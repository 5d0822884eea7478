//! Criterion benchmarks for the Heston(++) analytic pricer.
//!
//! Compares batches sharing one maturity, where the characteristic function
//! is evaluated once per quadrature node, with mixed-maturity batches.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_models::analytical::HestonAnalyticPricer;
use pricer_models::instruments::{OptionPricer, OptionSpec};
use pricer_models::models::HestonParams;

fn strikes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 70.0 + 60.0 * i as f64 / n.max(2) as f64).collect()
}

fn bench_uniform_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("heston_uniform_batch");
    let pricer = HestonAnalyticPricer::new(HestonParams::default());

    for size in [1, 10, 100] {
        let options: Vec<OptionSpec> = strikes(size)
            .into_iter()
            .map(|k| OptionSpec::call(k, 1.0).unwrap())
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &options, |b, options| {
            b.iter(|| pricer.npv(black_box(options)).unwrap());
        });
    }

    group.finish();
}

fn bench_mixed_maturities(c: &mut Criterion) {
    let mut group = c.benchmark_group("heston_mixed_maturities");
    let pricer = HestonAnalyticPricer::new(HestonParams::default());

    for size in [10, 100] {
        let options: Vec<OptionSpec> = strikes(size)
            .into_iter()
            .enumerate()
            .map(|(i, k)| OptionSpec::call(k, 0.25 + 0.25 * (i % 8) as f64).unwrap())
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &options, |b, options| {
            b.iter(|| pricer.npv(black_box(options)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_uniform_batch, bench_mixed_maturities);
criterion_main!(benches);
