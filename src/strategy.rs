//! Position-update strategies.
//!
//! Every walk variant answers the same question: given the current [`WalkState`], where
//! does the walker end up after `steps` elementary moves? The state is read-only here;
//! the exploration loop owns every mutation.
//!
//! - [`SymmetricWalk`]: unbiased coin, `+1` or `-1` each move. Ignores bias.
//! - [`ThreeOutcomeWalk`]: back / stay / forward drawn from the bias triple of the
//!   position the walker is on.
//! - [`QuantumWalk`](crate::QuantumWalk): coin-register shift circuit, executed by a
//!   [`CircuitExecutor`](crate::CircuitExecutor).

use rand::{Rng, RngCore};

use crate::{Bias, MeasurementPolicy, QuantumWalk, StateVectorBackend, Step, StepProbs};
use crate::{WalkError, WalkState};

/// Common interface for walk variants.
///
/// Object-safe, so a strategy can be chosen at configuration time and boxed (see
/// [`StrategyKind::build`]).
pub trait PositionUpdate {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// Shape a decayed scalar into the bias this strategy reads back.
    fn bias_for(&self, decayed: f64) -> Bias;

    /// Reject a decay `base` this strategy cannot represent. Called once at setup.
    fn check_base(&self, _base: f64) -> Result<(), WalkError> {
        Ok(())
    }

    /// Run exactly `steps` elementary moves from `state.position()` and return the
    /// new position, always in `[0, state.size())`.
    fn next_position(
        &mut self,
        state: &WalkState,
        steps: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize, WalkError>;
}

impl<P: PositionUpdate + ?Sized> PositionUpdate for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn bias_for(&self, decayed: f64) -> Bias {
        (**self).bias_for(decayed)
    }

    fn check_base(&self, base: f64) -> Result<(), WalkError> {
        (**self).check_base(base)
    }

    fn next_position(
        &mut self,
        state: &WalkState,
        steps: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize, WalkError> {
        (**self).next_position(state, steps, rng)
    }
}

/// Classical walk with an unbiased coin.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymmetricWalk;

impl PositionUpdate for SymmetricWalk {
    fn name(&self) -> &'static str {
        "symmetric"
    }

    fn bias_for(&self, decayed: f64) -> Bias {
        Bias::Theta(decayed)
    }

    fn next_position(
        &mut self,
        state: &WalkState,
        steps: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize, WalkError> {
        let size = state.size();
        let mut pos = state.position();
        for _ in 0..steps {
            pos = if rng.random_bool(0.5) {
                (pos + 1) % size
            } else {
                (pos + size - 1) % size
            };
        }
        Ok(pos)
    }
}

/// Classical walk with back / stay / forward moves.
///
/// The decayed scalar is used as `p_back` of a symmetric triple, so the decay `base`
/// must be at most [`ThreeOutcomeWalk::MAX_BASE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeOutcomeWalk;

impl ThreeOutcomeWalk {
    /// Largest `p_back` a symmetric triple can hold.
    pub const MAX_BASE: f64 = 0.5;

    /// Apply one move on a cycle of `size` positions.
    ///
    /// The two seam positions are spelled out separately: at `size - 1` a forward move
    /// goes to `0`, at `0` a back move goes to `size - 1`.
    #[must_use]
    pub fn apply(pos: usize, size: usize, step: Step) -> usize {
        if size <= 1 {
            return 0;
        }
        match step {
            Step::Stay => pos,
            Step::Back if pos == 0 => size - 1,
            Step::Back => pos - 1,
            Step::Forward if pos == size - 1 => 0,
            Step::Forward => pos + 1,
        }
    }
}

impl PositionUpdate for ThreeOutcomeWalk {
    fn name(&self) -> &'static str {
        "three-outcome"
    }

    fn bias_for(&self, decayed: f64) -> Bias {
        Bias::Step(StepProbs::symmetric(decayed))
    }

    fn check_base(&self, base: f64) -> Result<(), WalkError> {
        if base > Self::MAX_BASE {
            return Err(WalkError::BiasOutOfRange {
                strategy: self.name(),
                value: base,
                max: Self::MAX_BASE,
            });
        }
        Ok(())
    }

    fn next_position(
        &mut self,
        state: &WalkState,
        steps: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize, WalkError> {
        let size = state.size();
        let mut pos = state.position();
        for _ in 0..steps {
            let probs = state.bias()[pos].step_probs();
            let u: f64 = rng.random();
            pos = Self::apply(pos, size, probs.classify(u));
        }
        Ok(pos)
    }
}

/// Which walk variant to run, for configuration-time selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrategyKind {
    #[default]
    Symmetric,
    ThreeOutcome,
    /// Quantum walk on the built-in [`StateVectorBackend`].
    Quantum,
}

impl StrategyKind {
    /// Build a boxed strategy. `seed` only matters for [`StrategyKind::Quantum`], whose
    /// simulator owns its own RNG; `policy` handles out-of-range measurements there.
    pub fn build(self, seed: u64, policy: MeasurementPolicy) -> Box<dyn PositionUpdate + Send> {
        match self {
            StrategyKind::Symmetric => Box::new(SymmetricWalk),
            StrategyKind::ThreeOutcome => Box::new(ThreeOutcomeWalk),
            StrategyKind::Quantum => Box::new(
                QuantumWalk::new(StateVectorBackend::with_seed(seed ^ 0x5157_414C)) // "QWAL"
                    .with_policy(policy),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn state(size: usize, pos: usize, bias: Bias) -> WalkState {
        WalkState::new(vec![0.5; size], pos, bias).unwrap()
    }

    #[test]
    fn zero_steps_leaves_position_unchanged() {
        let s = state(5, 2, Bias::Theta(0.5));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(SymmetricWalk.next_position(&s, 0, &mut rng).unwrap(), 2);
        assert_eq!(ThreeOutcomeWalk.next_position(&s, 0, &mut rng).unwrap(), 2);
    }

    #[test]
    fn symmetric_single_step_is_a_neighbor() {
        let s = state(5, 0, Bias::Theta(0.5));
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 5];
        for _ in 0..100 {
            let p = SymmetricWalk.next_position(&s, 1, &mut rng).unwrap();
            assert!(p == 1 || p == 4, "got {p}");
            seen[p] = true;
        }
        assert!(seen[1] && seen[4]);
    }

    #[test]
    fn seam_transitions() {
        assert_eq!(ThreeOutcomeWalk::apply(0, 5, Step::Forward), 1);
        assert_eq!(ThreeOutcomeWalk::apply(0, 5, Step::Back), 4);
        assert_eq!(ThreeOutcomeWalk::apply(0, 5, Step::Stay), 0);
        assert_eq!(ThreeOutcomeWalk::apply(4, 5, Step::Forward), 0);
        assert_eq!(ThreeOutcomeWalk::apply(4, 5, Step::Back), 3);
        assert_eq!(ThreeOutcomeWalk::apply(2, 5, Step::Back), 1);
        assert_eq!(ThreeOutcomeWalk::apply(2, 5, Step::Forward), 3);
        assert_eq!(ThreeOutcomeWalk::apply(0, 1, Step::Back), 0);
    }

    #[test]
    fn zero_bias_never_moves() {
        let s = state(5, 3, Bias::Step(StepProbs::symmetric(0.0)));
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert_eq!(ThreeOutcomeWalk.next_position(&s, 4, &mut rng).unwrap(), 3);
        }
    }

    #[test]
    fn three_outcome_rejects_base_above_half() {
        assert!(ThreeOutcomeWalk.check_base(0.5).is_ok());
        assert_eq!(
            ThreeOutcomeWalk.check_base(1.0).unwrap_err(),
            WalkError::BiasOutOfRange {
                strategy: "three-outcome",
                value: 1.0,
                max: 0.5
            }
        );
        let boxed = StrategyKind::ThreeOutcome.build(0, MeasurementPolicy::default());
        assert!(boxed.check_base(0.75).is_err());
        assert!(SymmetricWalk.check_base(3.0).is_ok());
    }

    #[test]
    fn boxed_kinds_report_names() {
        let names: Vec<&str> = [
            StrategyKind::Symmetric,
            StrategyKind::ThreeOutcome,
            StrategyKind::Quantum,
        ]
        .into_iter()
        .map(|k| k.build(0, MeasurementPolicy::default()).name())
        .collect();
        assert_eq!(names, vec!["symmetric", "three-outcome", "quantum"]);
    }

    proptest! {
        #[test]
        fn classical_walks_stay_in_range(
            size in 1usize..12,
            start in 0usize..12,
            steps in 0usize..20,
            p_back in 0.0f64..=0.5,
            seed in any::<u64>(),
        ) {
            let start = start % size;
            let mut rng = StdRng::seed_from_u64(seed);
            let s = state(size, start, Bias::Step(StepProbs::symmetric(p_back)));
            let a = SymmetricWalk.next_position(&s, steps, &mut rng).unwrap();
            let b = ThreeOutcomeWalk.next_position(&s, steps, &mut rng).unwrap();
            prop_assert!(a < size);
            prop_assert!(b < size);
        }
    }
}
