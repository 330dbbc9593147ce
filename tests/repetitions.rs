//! Repetition driver: independence and reproducibility across `k` runs.

use qwalk::{
    run_repetitions, ExploreConfig, Explorer, MeasurementPolicy, StrategyKind, SymmetricWalk,
    ThreeOutcomeWalk, WalkError,
};

fn gt() -> Vec<f64> {
    vec![0.2, 0.4, 0.6, 0.8, 0.3, 0.1]
}

fn cfg(repetitions: usize) -> ExploreConfig {
    ExploreConfig {
        size: 6,
        trials: 120,
        repetitions,
        seed: 42,
        ..ExploreConfig::default()
    }
}

#[test]
fn repetitions_are_reproducible() {
    let a = run_repetitions(&cfg(8), &gt(), |_| ThreeOutcomeWalk).unwrap();
    let b = run_repetitions(&cfg(8), &gt(), |_| ThreeOutcomeWalk).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.totals.len(), 8);
}

#[test]
fn repetition_matches_a_standalone_run_with_the_same_seed() {
    let summary = run_repetitions(&cfg(4), &gt(), |_| SymmetricWalk).unwrap();
    for (rep, &total) in summary.totals.iter().enumerate() {
        let c = ExploreConfig {
            seed: 42 + rep as u64,
            ..cfg(4)
        };
        let mut ex = Explorer::new(c, gt(), SymmetricWalk).unwrap();
        assert_eq!(ex.explore().unwrap(), total, "rep {rep}");
        assert_eq!(ex.state().best_position(), summary.best_positions[rep]);
    }
}

#[test]
fn zero_repetitions_is_empty() {
    let s = run_repetitions(&cfg(0), &gt(), |_| SymmetricWalk).unwrap();
    assert!(s.totals.is_empty());
    assert_eq!(s.mean_total(), 0.0);
}

#[test]
fn setup_errors_surface_before_running() {
    let c = ExploreConfig { size: 5, ..cfg(3) };
    let err = run_repetitions(&c, &gt(), |seed| {
        StrategyKind::Quantum.build(seed, MeasurementPolicy::default())
    })
    .unwrap_err();
    assert_eq!(err, WalkError::LengthMismatch { expected: 5, actual: 6 });
}

#[test]
fn totals_never_exceed_trials() {
    let c = cfg(5);
    let s = run_repetitions(&c, &gt(), |seed| {
        StrategyKind::Quantum.build(seed, MeasurementPolicy::Clamp)
    })
    .unwrap();
    assert!(s.totals.iter().all(|&t| t <= c.trials as u64));
}

#[cfg(feature = "serde")]
#[test]
fn config_reads_from_json_with_defaults() {
    let c: ExploreConfig =
        serde_json::from_str(r#"{ "size": 6, "trials": 50, "decay": { "a": 9.0, "b": 6.0 } }"#)
            .unwrap();
    assert_eq!(c.size, 6);
    assert_eq!(c.trials, 50);
    assert_eq!(c.decay, qwalk::DecayParams::STEEP);
    assert_eq!(c.steps, ExploreConfig::default().steps);
}
