//! Circuit execution.
//!
//! The walk only needs one thing from a quantum backend: run a built [`Circuit`] for a
//! single shot and hand back the measured classical register as an integer. That
//! contract is [`CircuitExecutor`]. Two in-process executors ship with the crate:
//!
//! - [`BasisTracer`]: deterministic, for circuits that map basis states to basis states
//!   (X/MCX plus rotations by `0` or `pi`). Used to check the shift operator.
//! - [`StateVectorBackend`]: a small dense simulator. Every gate the walk emits is real
//!   (`U(theta, 0, 0)` is a Y rotation), so amplitudes are kept as `f64`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

use crate::{Circuit, Gate, WalkError};

const BASIS_EPS: f64 = 1e-9;

/// Run a circuit once and return the measured classical register.
///
/// Classical bit `i` is bit `i` of the result, so the bitstring read
/// most-significant first is the unsigned binary value.
pub trait CircuitExecutor {
    fn execute(&mut self, circuit: &Circuit) -> Result<u64, WalkError>;
}

impl<E: CircuitExecutor + ?Sized> CircuitExecutor for Box<E> {
    fn execute(&mut self, circuit: &Circuit) -> Result<u64, WalkError> {
        (**self).execute(circuit)
    }
}

impl<E: CircuitExecutor + ?Sized> CircuitExecutor for &mut E {
    fn execute(&mut self, circuit: &Circuit) -> Result<u64, WalkError> {
        (**self).execute(circuit)
    }
}

/// Deterministic executor for permutation circuits.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasisTracer;

impl BasisTracer {
    /// Push the all-zero basis state through `circuit` and return every qubit's value.
    pub fn trace(&self, circuit: &Circuit) -> Result<Vec<bool>, WalkError> {
        let mut bits = vec![false; circuit.num_qubits()];
        for gate in circuit.gates() {
            match gate {
                Gate::X(q) => bits[*q] = !bits[*q],
                Gate::Mcx { controls, target } => {
                    if controls.iter().all(|&c| bits[c]) {
                        bits[*target] = !bits[*target];
                    }
                }
                Gate::U { qubit, theta } => {
                    let (s, c) = (theta / 2.0).sin_cos();
                    // theta = 0 (mod 2pi) is the identity up to a global sign.
                    if c.abs() < BASIS_EPS {
                        bits[*qubit] = !bits[*qubit];
                    } else if s.abs() >= BASIS_EPS {
                        return Err(WalkError::NonClassicalGate(format!("{gate:?}")));
                    }
                }
            }
        }
        Ok(bits)
    }
}

impl CircuitExecutor for BasisTracer {
    fn execute(&mut self, circuit: &Circuit) -> Result<u64, WalkError> {
        let bits = self.trace(circuit)?;
        Ok(circuit.read_clbits(|q| bits[q]))
    }
}

/// Seedable single-shot state-vector simulator.
#[derive(Debug, Clone)]
pub struct StateVectorBackend {
    rng: StdRng,
    max_qubits: usize,
}

impl StateVectorBackend {
    /// Default qubit limit (`2^20` amplitudes).
    pub const DEFAULT_MAX_QUBITS: usize = 20;

    /// Largest limit the amplitude indexing can address.
    pub const MAX_ADDRESSABLE_QUBITS: usize = usize::BITS as usize - 1;

    /// Simulator with a deterministic fixed seed (0).
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Simulator with a fixed seed (reproducible shots).
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_qubits: Self::DEFAULT_MAX_QUBITS,
        }
    }

    /// Override the qubit limit, capped at [`Self::MAX_ADDRESSABLE_QUBITS`].
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits.min(Self::MAX_ADDRESSABLE_QUBITS);
        self
    }

    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// Final amplitudes, indexed by basis state (qubit `q` is bit `q` of the index).
    pub fn amplitudes(&self, circuit: &Circuit) -> Result<Vec<f64>, WalkError> {
        let nq = circuit.num_qubits();
        if nq > self.max_qubits {
            return Err(WalkError::CircuitTooLarge {
                qubits: nq,
                limit: self.max_qubits,
            });
        }
        let mut amps = vec![0.0; 1usize << nq];
        amps[0] = 1.0;
        for gate in circuit.gates() {
            match gate {
                Gate::X(q) => {
                    let bit = 1usize << q;
                    for i in 0..amps.len() {
                        if i & bit == 0 {
                            amps.swap(i, i | bit);
                        }
                    }
                }
                Gate::Mcx { controls, target } => {
                    let mask = controls.iter().fold(0usize, |m, &c| m | (1 << c));
                    let bit = 1usize << target;
                    for i in 0..amps.len() {
                        if i & mask == mask && i & bit == 0 {
                            amps.swap(i, i | bit);
                        }
                    }
                }
                Gate::U { qubit, theta } => {
                    let (s, c) = (theta / 2.0).sin_cos();
                    let bit = 1usize << qubit;
                    for i in 0..amps.len() {
                        if i & bit == 0 {
                            let (a, b) = (amps[i], amps[i | bit]);
                            amps[i] = c * a - s * b;
                            amps[i | bit] = s * a + c * b;
                        }
                    }
                }
            }
        }
        Ok(amps)
    }

    /// Exact distribution of the measured classical register.
    pub fn distribution(&self, circuit: &Circuit) -> Result<BTreeMap<u64, f64>, WalkError> {
        let amps = self.amplitudes(circuit)?;
        let mut out: BTreeMap<u64, f64> = BTreeMap::new();
        for (idx, a) in amps.iter().enumerate() {
            let p = a * a;
            if p > 0.0 {
                *out.entry(circuit.read_clbits(|q| (idx >> q) & 1 == 1)).or_insert(0.0) += p;
            }
        }
        Ok(out)
    }
}

impl Default for StateVectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitExecutor for StateVectorBackend {
    fn execute(&mut self, circuit: &Circuit) -> Result<u64, WalkError> {
        let amps = self.amplitudes(circuit)?;
        let total: f64 = amps.iter().map(|a| a * a).sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(WalkError::Execution(format!(
                "state norm {total} is not positive"
            )));
        }
        let r: f64 = self.rng.random::<f64>() * total;
        let mut cdf = 0.0;
        let mut chosen = None;
        for (idx, a) in amps.iter().enumerate() {
            let p = a * a;
            if p <= 0.0 {
                continue;
            }
            cdf += p;
            chosen = Some(idx);
            if r < cdf {
                break;
            }
        }
        // Numerical fallback: the last state with non-zero weight.
        let idx = chosen.ok_or_else(|| WalkError::Execution("empty state".to_string()))?;
        Ok(circuit.read_clbits(|q| (idx >> q) & 1 == 1))
    }
}
