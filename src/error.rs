//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Errors produced while configuring or running a walk.
///
/// Setup errors (ground truth, position, bias, decay) are fatal and surface before the
/// first trial. [`WalkError::OutOfRangeMeasurement`] is the one runtime condition the
/// exploration loop recovers from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalkError {
    #[error("ground truth is empty")]
    EmptyGroundTruth,

    #[error("ground truth entry {index} = {value} is outside [0, 1]")]
    InvalidGroundTruth { index: usize, value: f64 },

    #[error("ground truth has {actual} entries, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("position {position} is outside [0, {size})")]
    InvalidPosition { position: usize, size: usize },

    #[error("initial bias {0} must be finite and >= 0")]
    InvalidBias(f64),

    /// The decay base is outside what the chosen walk can represent.
    #[error("initial bias {value} exceeds {max} for the {strategy} walk")]
    BiasOutOfRange {
        strategy: &'static str,
        value: f64,
        max: f64,
    },

    #[error("decay parameter `{name}` = {value} must be finite and > 0")]
    InvalidDecay { name: &'static str, value: f64 },

    /// The executor returned a basis state that does not name a position.
    ///
    /// Happens when `size` is not a power of two and the register has spare codes.
    #[error("measured position {measured} is outside [0, {size})")]
    OutOfRangeMeasurement { measured: u64, size: usize },

    #[error("qubit {qubit} out of range for a {num_qubits}-qubit circuit")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    #[error("gate touches qubit {0} more than once")]
    DuplicateQubit(usize),

    #[error("classical bit {clbit} out of range for {num_clbits} bits")]
    ClbitOutOfRange { clbit: usize, num_clbits: usize },

    #[error("sub-circuit has {expected} qubits, got {actual} wires")]
    WireCountMismatch { expected: usize, actual: usize },

    #[error("circuit needs {qubits} qubits, simulator limit is {limit}")]
    CircuitTooLarge { qubits: usize, limit: usize },

    #[error("gate `{0}` does not map basis states to basis states")]
    NonClassicalGate(String),

    #[error("circuit execution failed: {0}")]
    Execution(String),
}

impl WalkError {
    /// True for conditions the exploration loop absorbs instead of aborting the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WalkError::OutOfRangeMeasurement { .. })
    }
}
