//! Walk state: where the walker is, what it has seen, and how biased each position is.

use crate::WalkError;

/// Probabilities of the three elementary moves in a biased classical walk.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepProbs {
    pub back: f64,
    pub stay: f64,
    pub forward: f64,
}

/// One elementary move of the three-outcome walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Back,
    Stay,
    Forward,
}

impl StepProbs {
    /// Symmetric triple `(p, 1 - 2p, p)`; `p_back` is clamped into `[0, 0.5]`.
    #[must_use]
    pub fn symmetric(p_back: f64) -> Self {
        let p = if p_back.is_finite() {
            p_back.clamp(0.0, 0.5)
        } else {
            0.5
        };
        Self {
            back: p,
            stay: 1.0 - 2.0 * p,
            forward: p,
        }
    }

    /// Map a uniform draw `u` in `[0, 1)` to a move using cumulative thresholds:
    /// `[0, back)` is back, `[back, back + stay)` is stay, the rest is forward.
    #[must_use]
    pub fn classify(&self, u: f64) -> Step {
        if u < self.back {
            Step::Back
        } else if u < self.back + self.stay {
            Step::Stay
        } else {
            Step::Forward
        }
    }
}

/// Per-position movement bias.
///
/// The shape depends on the strategy reading it: the quantum walk wants a rotation
/// angle, the three-outcome walk wants a move distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bias {
    Theta(f64),
    Step(StepProbs),
}

impl Bias {
    /// Scalar view: the angle, or `back` for a step triple.
    #[must_use]
    pub fn theta(&self) -> f64 {
        match *self {
            Bias::Theta(t) => t,
            Bias::Step(p) => p.back,
        }
    }

    /// Move-distribution view. A bare angle is read as `p_back`.
    #[must_use]
    pub fn step_probs(&self) -> StepProbs {
        match *self {
            Bias::Theta(t) => StepProbs::symmetric(t),
            Bias::Step(p) => p,
        }
    }
}

/// Mutable record of one walk over a cycle of `size` positions.
///
/// Invariants, maintained by every mutator:
/// - `happiness[i] <= hits[i]`
/// - `empirical_truth[i] == happiness[i] / hits[i]` when `hits[i] > 0`, else `0`
/// - `position < size`
///
/// With the `serde` feature the state serializes for inspection. There is no
/// `Deserialize`; a state is only ever built by [`WalkState::new`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WalkState {
    position: usize,
    ground_truth: Vec<f64>,
    empirical_truth: Vec<f64>,
    happiness: Vec<u64>,
    hits: Vec<u64>,
    bias: Vec<Bias>,
}

impl WalkState {
    /// Create a fresh state. `size` is `ground_truth.len()`.
    pub fn new(
        ground_truth: Vec<f64>,
        initial_position: usize,
        initial_bias: Bias,
    ) -> Result<Self, WalkError> {
        validate_ground_truth(&ground_truth)?;
        let size = ground_truth.len();
        if initial_position >= size {
            return Err(WalkError::InvalidPosition {
                position: initial_position,
                size,
            });
        }
        Ok(Self {
            position: initial_position,
            empirical_truth: vec![0.0; size],
            happiness: vec![0; size],
            hits: vec![0; size],
            bias: vec![initial_bias; size],
            ground_truth,
        })
    }

    pub fn size(&self) -> usize {
        self.ground_truth.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn ground_truth(&self) -> &[f64] {
        &self.ground_truth
    }

    pub fn empirical_truth(&self) -> &[f64] {
        &self.empirical_truth
    }

    pub fn happiness(&self) -> &[u64] {
        &self.happiness
    }

    pub fn hits(&self) -> &[u64] {
        &self.hits
    }

    pub fn bias(&self) -> &[Bias] {
        &self.bias
    }

    /// Bias at the current position.
    pub fn current_bias(&self) -> Bias {
        self.bias[self.position]
    }

    /// Move the walker.
    pub fn set_position(&mut self, position: usize) -> Result<(), WalkError> {
        if position >= self.size() {
            return Err(WalkError::InvalidPosition {
                position,
                size: self.size(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Record one pull at `position` and return the updated empirical rate there.
    ///
    /// `hits` is incremented before dividing, so the rate is always defined.
    pub fn record_pull(&mut self, position: usize, success: bool) -> Result<f64, WalkError> {
        if position >= self.size() {
            return Err(WalkError::InvalidPosition {
                position,
                size: self.size(),
            });
        }
        self.hits[position] = self.hits[position].saturating_add(1);
        if success {
            self.happiness[position] = self.happiness[position].saturating_add(1);
        }
        let rate = self.happiness[position] as f64 / self.hits[position] as f64;
        self.empirical_truth[position] = rate;
        Ok(rate)
    }

    /// Recompute the bias of every position from its empirical rate.
    pub fn recompute_bias<F>(&mut self, mut f: F)
    where
        F: FnMut(f64) -> Bias,
    {
        for (b, &rate) in self.bias.iter_mut().zip(&self.empirical_truth) {
            *b = f(rate);
        }
    }

    /// Index of the highest empirical rate; the first index wins ties.
    pub fn best_position(&self) -> usize {
        let mut best = 0;
        for (i, &v) in self.empirical_truth.iter().enumerate() {
            if v > self.empirical_truth[best] {
                best = i;
            }
        }
        best
    }

    /// Total successful pulls over the run.
    pub fn total_reward(&self) -> u64 {
        self.happiness.iter().sum()
    }

    /// Total pulls over the run.
    pub fn total_pulls(&self) -> u64 {
        self.hits.iter().sum()
    }

    /// Zero-padded, most-significant-bit-first binary label of the current position.
    ///
    /// Reading the measured position register from the highest classical bit down
    /// gives the same string; the walk circuit itself prepares the position from the
    /// integer directly.
    pub fn position_label(&self, width: usize) -> String {
        format!("{:0width$b}", self.position, width = width)
    }
}

/// Reject an empty ground truth or any entry outside `[0, 1]` (NaN included).
pub fn validate_ground_truth(ground_truth: &[f64]) -> Result<(), WalkError> {
    if ground_truth.is_empty() {
        return Err(WalkError::EmptyGroundTruth);
    }
    for (index, &value) in ground_truth.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(WalkError::InvalidGroundTruth { index, value });
        }
    }
    Ok(())
}
