//! Quantum walk over a binary position register.
//!
//! Layout of the walk circuit (`n = register_width(size)`):
//!
//! ```text
//!   q0        coin 0
//!   q1        coin 1
//!   q2..q(n+1) position, least-significant first  -> measured into c0..c(n-1)
//! ```
//!
//! Each elementary move rotates both coins by the bias angle of the anchor position,
//! increments the register when coin 1 is set, then (with coin 1 inverted) decrements
//! it when both coins are set. Per move: coin 1 set means forward, coin 0 set alone means
//! back, neither means stay. The coins are never reset, so successive moves interfere.
//!
//! The register wraps modulo `2^n`, which can exceed `size`; see [`MeasurementPolicy`].

use rand::RngCore;
use tracing::trace;

use crate::{decrement_gate, increment_gate, register_width};
use crate::{Bias, Circuit, CircuitExecutor, PositionUpdate, WalkError, WalkState};

/// What to do when the executor returns a register value `>= size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeasurementPolicy {
    /// Reduce modulo `size`.
    #[default]
    Modulo,
    /// Snap to `size - 1`.
    Clamp,
    /// Execute the circuit again, up to `max_attempts` shots in total, then reject.
    Resample { max_attempts: usize },
    /// Return [`WalkError::OutOfRangeMeasurement`]; the exploration loop keeps the
    /// walker where it was for that trial.
    Reject,
}

/// Build the walk circuit for `steps` moves from `position` with coin angle `theta`.
pub fn walk_circuit(
    position: usize,
    size: usize,
    theta: f64,
    steps: usize,
) -> Result<Circuit, WalkError> {
    if position >= size {
        return Err(WalkError::InvalidPosition { position, size });
    }
    let n = register_width(size);
    let mut qc = Circuit::new(n + 2, n);
    let reg: Vec<usize> = (2..n + 2).collect();
    let all: Vec<usize> = (0..n + 2).collect();
    let mut inc_wires = vec![1];
    inc_wires.extend_from_slice(&reg);

    let inc = increment_gate(n);
    let dec = decrement_gate(n);

    qc.prepare_basis(position as u64, &reg)?;
    for _ in 0..steps {
        qc.u(theta, 0)?.u(theta, 1)?;
        qc.append(&inc, &inc_wires)?;
        qc.x(1)?;
        qc.append(&dec, &all)?;
        qc.x(1)?;
    }
    for (i, &q) in reg.iter().enumerate() {
        qc.measure(q, i)?;
    }
    Ok(qc)
}

/// Quantum walk strategy, generic over the executor that runs its circuits.
#[derive(Debug, Clone)]
pub struct QuantumWalk<E> {
    executor: E,
    policy: MeasurementPolicy,
}

impl<E: CircuitExecutor> QuantumWalk<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            policy: MeasurementPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MeasurementPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MeasurementPolicy {
        self.policy
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Walk circuit for the current state: starts at the walker's position and uses the
    /// bias angle stored there for every move.
    pub fn build_circuit(state: &WalkState, steps: usize) -> Result<Circuit, WalkError> {
        walk_circuit(
            state.position(),
            state.size(),
            state.current_bias().theta(),
            steps,
        )
    }

    /// Execute `circuit` and map the measurement onto `[0, size)` per the policy.
    pub fn measure_position(&mut self, circuit: &Circuit, size: usize) -> Result<usize, WalkError> {
        let mut shots = 1;
        let mut measured = self.executor.execute(circuit)?;
        loop {
            if measured < size as u64 {
                return Ok(measured as usize);
            }
            match self.policy {
                MeasurementPolicy::Modulo => return Ok((measured % size as u64) as usize),
                MeasurementPolicy::Clamp => return Ok(size - 1),
                MeasurementPolicy::Resample { max_attempts } if shots < max_attempts => {
                    trace!(measured, shots, "resampling out-of-range measurement");
                    measured = self.executor.execute(circuit)?;
                    shots += 1;
                }
                _ => return Err(WalkError::OutOfRangeMeasurement { measured, size }),
            }
        }
    }
}

impl<E: CircuitExecutor> PositionUpdate for QuantumWalk<E> {
    fn name(&self) -> &'static str {
        "quantum"
    }

    fn bias_for(&self, decayed: f64) -> Bias {
        Bias::Theta(decayed)
    }

    fn next_position(
        &mut self,
        state: &WalkState,
        steps: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<usize, WalkError> {
        let circuit = Self::build_circuit(state, steps)?;
        self.measure_position(&circuit, state.size())
    }
}
