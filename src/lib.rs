//! `qwalk`: random-walk bandit exploration.
//!
//! A variant of the multi-armed bandit where the arm selector is a walker on a cycle
//! of positions. Each position is a slot machine with a fixed, hidden success
//! probability (the *ground truth*); the walker has to find and exploit the best one
//! by pulling wherever it lands.
//!
//! Each trial:
//! 1. **Walk**: a [`PositionUpdate`] strategy moves the walker `steps` elementary moves.
//! 2. **Pull**: one Bernoulli draw with the ground-truth probability at the landing spot.
//! 3. **Count**: update `hits`, `happiness`, and the *empirical truth* there.
//! 4. **Decay**: recompute every position's bias from its empirical rate via [`decay`].
//! 5. **Re-anchor**: jump to `argmax(empirical_truth)`, first index on ties.
//!
//! **Walk strategies:**
//! - [`SymmetricWalk`]: unbiased `+1`/`-1` coin.
//! - [`ThreeOutcomeWalk`]: back / stay / forward from the position's bias triple.
//! - [`QuantumWalk`]: coin-register shift circuit ([`walk_circuit`]), run by any
//!   [`CircuitExecutor`]. [`StateVectorBackend`] and [`BasisTracer`] ship in-crate.
//!
//! **Driving a run:**
//! - [`Explorer`]: one exploration over an owned [`WalkState`], seeded.
//! - [`run_repetitions`]: `k` independent explorations (parallel with `parallel`).
//!
//! **Non-goals:**
//! - Not a bandit-serving system: no persistence, no distributed execution.
//! - No hardware calibration; executors are plain single-shot samplers.
//!
//! ```rust
//! use qwalk::{ExploreConfig, Explorer, SymmetricWalk};
//!
//! let gt = vec![0.01, 0.01, 0.99, 0.01, 0.01];
//! let cfg = ExploreConfig { size: gt.len(), seed: 7, ..ExploreConfig::default() };
//! let mut ex = Explorer::new(cfg, gt, SymmetricWalk).unwrap();
//! let total = ex.explore().unwrap();
//! assert!(total <= cfg.trials as u64);
//! ```

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod decay;
pub use decay::*;

mod state;
pub use state::*;

mod strategy;
pub use strategy::*;

mod circuit;
pub use circuit::*;

mod exec;
pub use exec::*;

mod quantum;
pub use quantum::*;

mod explore;
pub use explore::*;
