//! The exploration loop.
//!
//! One trial is: walk, pull the slot machine where the walk landed, update that
//! position's counters, recompute every position's bias, then re-anchor the walker on
//! the best empirical position. An exploration is `trials` of those, back to back;
//! its score is the total number of successful pulls.
//!
//! Re-anchoring is unconditional and greedy (first index wins ties), so the walk only
//! supplies local exploration noise around the current best estimate.
//!
//! Independent runs share nothing. [`run_repetitions`] executes `repetitions` of them,
//! on `rayon` when the `parallel` feature is enabled.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Bernoulli, Distribution};
use tracing::{debug, trace, warn};

use crate::state::validate_ground_truth;
use crate::{DecayParams, PositionUpdate, WalkError, WalkState};

/// Run configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExploreConfig {
    /// Number of positions; must equal the ground truth length.
    pub size: usize,
    pub initial_position: usize,
    /// Decay `base`: the bias of a position with no observed success. A rotation angle
    /// for the quantum walk, `p_back` (at most `0.5`) for the three-outcome walk.
    pub initial_bias: f64,
    /// Elementary moves per walk.
    pub steps: usize,
    /// Trials per exploration (`j`).
    pub trials: usize,
    /// Independent explorations for [`run_repetitions`] (`k`).
    pub repetitions: usize,
    pub decay: DecayParams,
    /// Seed for the run's RNG. Repetition `r` uses `seed + r`.
    pub seed: u64,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            size: 5,
            initial_position: 0,
            initial_bias: 0.5,
            steps: 2,
            trials: 500,
            repetitions: 1,
            decay: DecayParams::default(),
            seed: 0,
        }
    }
}

impl ExploreConfig {
    /// Fail-fast setup checks.
    pub fn validate(&self, ground_truth: &[f64]) -> Result<(), WalkError> {
        validate_ground_truth(ground_truth)?;
        if ground_truth.len() != self.size {
            return Err(WalkError::LengthMismatch {
                expected: self.size,
                actual: ground_truth.len(),
            });
        }
        if self.initial_position >= self.size {
            return Err(WalkError::InvalidPosition {
                position: self.initial_position,
                size: self.size,
            });
        }
        if !(self.initial_bias.is_finite() && self.initial_bias >= 0.0) {
            return Err(WalkError::InvalidBias(self.initial_bias));
        }
        self.decay.validate()
    }
}

/// What happened in one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    /// Anchor the walk started from.
    pub from: usize,
    /// Position that was pulled.
    pub visited: usize,
    pub reward: bool,
    /// Position after greedy re-anchoring.
    pub anchor: usize,
    /// The walk produced an out-of-range measurement and the walker stayed at `from`.
    pub measurement_recovered: bool,
}

/// Drives one exploration over an exclusively owned [`WalkState`].
#[derive(Debug)]
pub struct Explorer<S> {
    cfg: ExploreConfig,
    state: WalkState,
    strategy: S,
    rng: StdRng,
    trials_run: usize,
}

impl<S: PositionUpdate> Explorer<S> {
    /// Validate `cfg` against `ground_truth` and set up a fresh state seeded with `cfg.seed`.
    pub fn new(cfg: ExploreConfig, ground_truth: Vec<f64>, strategy: S) -> Result<Self, WalkError> {
        cfg.validate(&ground_truth)?;
        strategy.check_base(cfg.initial_bias)?;
        let bias = strategy.bias_for(cfg.initial_bias);
        let state = WalkState::new(ground_truth, cfg.initial_position, bias)?;
        Ok(Self {
            rng: StdRng::seed_from_u64(cfg.seed),
            cfg,
            state,
            strategy,
            trials_run: 0,
        })
    }

    pub fn config(&self) -> &ExploreConfig {
        &self.cfg
    }

    pub fn state(&self) -> &WalkState {
        &self.state
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn trials_run(&self) -> usize {
        self.trials_run
    }

    pub fn into_state(self) -> WalkState {
        self.state
    }

    /// Run one walk -> reward -> update -> re-anchor cycle.
    pub fn trial(&mut self) -> Result<TrialOutcome, WalkError> {
        let from = self.state.position();
        let mut measurement_recovered = false;
        let visited = match self
            .strategy
            .next_position(&self.state, self.cfg.steps, &mut self.rng)
        {
            Ok(p) => p,
            Err(e) if e.is_recoverable() => {
                warn!(strategy = self.strategy.name(), error = %e, "keeping walker at anchor");
                measurement_recovered = true;
                from
            }
            Err(e) => return Err(e),
        };
        self.state.set_position(visited)?;

        let p = self.state.ground_truth()[visited];
        let pull = Bernoulli::new(p).map_err(|_| WalkError::InvalidGroundTruth {
            index: visited,
            value: p,
        })?;
        let reward = pull.sample(&mut self.rng);
        self.state.record_pull(visited, reward)?;

        let decay = self.cfg.decay;
        let base = self.cfg.initial_bias;
        let strategy = &self.strategy;
        self.state
            .recompute_bias(|rate| strategy.bias_for(decay.apply(rate, base)));

        let anchor = self.state.best_position();
        self.state.set_position(anchor)?;
        self.trials_run += 1;

        trace!(
            trial = self.trials_run,
            from,
            visited,
            reward,
            anchor,
            "trial"
        );
        Ok(TrialOutcome {
            from,
            visited,
            reward,
            anchor,
            measurement_recovered,
        })
    }

    /// Run `cfg.trials` trials and return the total reward so far.
    pub fn explore(&mut self) -> Result<u64, WalkError> {
        for _ in 0..self.cfg.trials {
            self.trial()?;
        }
        let total = self.state.total_reward();
        debug!(
            strategy = self.strategy.name(),
            trials = self.trials_run,
            total_reward = total,
            best_position = self.state.best_position(),
            "exploration finished"
        );
        Ok(total)
    }
}

/// Per-repetition results of [`run_repetitions`], in repetition order.
#[derive(Debug, Clone, PartialEq)]
pub struct RepetitionSummary {
    /// Total reward of each repetition.
    pub totals: Vec<u64>,
    /// `argmax(empirical_truth)` at the end of each repetition.
    pub best_positions: Vec<usize>,
}

impl RepetitionSummary {
    /// Mean total reward (0 for no repetitions).
    pub fn mean_total(&self) -> f64 {
        if self.totals.is_empty() {
            return 0.0;
        }
        self.totals.iter().sum::<u64>() as f64 / self.totals.len() as f64
    }

    /// Fraction of repetitions whose best position is `position`.
    pub fn hit_rate(&self, position: usize) -> f64 {
        if self.best_positions.is_empty() {
            return 0.0;
        }
        let n = self.best_positions.iter().filter(|&&p| p == position).count();
        n as f64 / self.best_positions.len() as f64
    }
}

/// Run `cfg.repetitions` independent explorations.
///
/// Repetition `r` runs with seed `cfg.seed + r` and a strategy from
/// `make_strategy(seed)`, so results do not depend on scheduling.
pub fn run_repetitions<S, F>(
    cfg: &ExploreConfig,
    ground_truth: &[f64],
    make_strategy: F,
) -> Result<RepetitionSummary, WalkError>
where
    S: PositionUpdate,
    F: Fn(u64) -> S + Sync,
{
    cfg.validate(ground_truth)?;
    let run_one = |rep: usize| -> Result<(u64, usize), WalkError> {
        let seed = cfg.seed.wrapping_add(rep as u64);
        let rep_cfg = ExploreConfig { seed, ..*cfg };
        let mut ex = Explorer::new(rep_cfg, ground_truth.to_vec(), make_strategy(seed))?;
        let total = ex.explore()?;
        let best = ex.state().best_position();
        debug!(rep, seed, total, best, "repetition finished");
        Ok((total, best))
    };

    #[cfg(feature = "parallel")]
    let results: Vec<Result<(u64, usize), WalkError>> = {
        use rayon::prelude::*;
        (0..cfg.repetitions).into_par_iter().map(run_one).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<(u64, usize), WalkError>> =
        (0..cfg.repetitions).map(run_one).collect();

    let mut summary = RepetitionSummary {
        totals: Vec::with_capacity(results.len()),
        best_positions: Vec::with_capacity(results.len()),
    };
    for r in results {
        let (total, best) = r?;
        summary.totals.push(total);
        summary.best_positions.push(best);
    }
    Ok(summary)
}
