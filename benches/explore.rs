use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use qwalk::{
    walk_circuit, ExploreConfig, Explorer, MeasurementPolicy, StateVectorBackend, StrategyKind,
};
use std::f64::consts::PI;
use std::hint::black_box;

fn bench_explore(c: &mut Criterion) {
    let gt = vec![0.01, 0.01, 0.99, 0.01, 0.01];

    let mut group = c.benchmark_group("explore_500");
    for (kind, bias) in [
        (StrategyKind::Symmetric, 0.5),
        (StrategyKind::ThreeOutcome, 0.5),
        (StrategyKind::Quantum, PI / 2.0),
    ] {
        let cfg = ExploreConfig {
            size: gt.len(),
            initial_bias: bias,
            ..ExploreConfig::default()
        };
        let id = BenchmarkId::new("strategy", format!("{kind:?}"));
        group.bench_with_input(id, &kind, |b, &kind| {
            b.iter(|| {
                let strategy = kind.build(cfg.seed, MeasurementPolicy::default());
                let mut ex = Explorer::new(cfg, gt.clone(), strategy).unwrap();
                black_box(ex.explore().unwrap());
            })
        });
    }
    group.finish();
}

fn bench_walk_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk_circuit");
    for &size in &[5usize, 64, 1024] {
        let qc = walk_circuit(size / 2, size, PI / 3.0, 3).unwrap();
        let sim = StateVectorBackend::new();
        group.bench_with_input(BenchmarkId::new("distribution", size), &size, |b, &_s| {
            b.iter(|| black_box(sim.distribution(black_box(&qc)).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_explore, bench_walk_circuit);
criterion_main!(benches);
