//! Compare the three walk strategies on one ground truth.
//!
//! ```text
//! RUST_LOG=qwalk=debug cargo run --example compare_walks
//! ```

use qwalk::{run_repetitions, ExploreConfig, MeasurementPolicy, StrategyKind};
use std::f64::consts::PI;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), qwalk::WalkError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let gt = vec![0.10, 0.25, 0.05, 0.60, 0.15, 0.30, 0.20];
    let best = 3;

    println!("ground truth: {gt:?}");
    println!("{:<14} {:>10} {:>10}", "strategy", "mean", "found best");
    for (kind, bias) in [
        (StrategyKind::Symmetric, 0.5),
        (StrategyKind::ThreeOutcome, 0.5),
        (StrategyKind::Quantum, PI / 2.0),
    ] {
        let cfg = ExploreConfig {
            size: gt.len(),
            initial_bias: bias,
            trials: 500,
            repetitions: 50,
            ..ExploreConfig::default()
        };
        let summary = run_repetitions(&cfg, &gt, |seed| {
            kind.build(seed, MeasurementPolicy::Resample { max_attempts: 4 })
        })?;
        println!(
            "{:<14} {:>10.1} {:>9.0}%",
            format!("{kind:?}"),
            summary.mean_total(),
            100.0 * summary.hit_rate(best)
        );
    }
    Ok(())
}
