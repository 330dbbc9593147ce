//! Circuit description and the quantum walk's shift operator.
//!
//! A [`Circuit`] is a plain, backend-agnostic gate list: qubit count, ordered gates,
//! and a measurement map from qubits to classical bits. Executing it is the job of a
//! [`CircuitExecutor`](crate::CircuitExecutor).
//!
//! ## Shift operator
//!
//! Positions live in an `n`-qubit register, least-significant qubit first. The shift is
//! an incrementer/decrementer pair built from multi-controlled NOTs:
//!
//! - [`increment_gate`] on `[ctrl, b0, .., b(n-1)]`: flip `b(i)` when `ctrl` and every
//!   lower bit are set, most-significant bit first. Control sets run `1..=n`
//!   (CNOT, Toffoli, then wider MCX gates).
//! - [`decrement_gate`] on `[c0, c1, b0, .., b(n-1)]`: the mirror image. Each MCX is
//!   sandwiched between X gates on the lower bits so it fires on a borrow instead of a
//!   carry, and the cascade ends with a Toffoli from both coins onto `b0`.
//!
//! Both wrap modulo `2^n`.

use crate::WalkError;

/// Number of position qubits for a cycle of `size` positions: `ceil(log2(size))`, at least 1.
#[must_use]
pub fn register_width(size: usize) -> usize {
    let mut n = 1;
    while (1usize << n) < size {
        n += 1;
    }
    n
}

/// Elementary gates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gate {
    /// Pauli X.
    X(usize),
    /// Multi-controlled NOT. One control is a CNOT, two is a Toffoli.
    Mcx { controls: Vec<usize>, target: usize },
    /// `U(theta, 0, 0)`, i.e. a Y rotation by `theta`. Real-valued.
    U { qubit: usize, theta: f64 },
}

impl Gate {
    /// Every qubit the gate touches.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Gate::X(q) | Gate::U { qubit: q, .. } => vec![*q],
            Gate::Mcx { controls, target } => {
                let mut v = controls.clone();
                v.push(*target);
                v
            }
        }
    }

    /// Relabel qubits through `map` (local index -> global index).
    fn remap(&self, map: &[usize]) -> Gate {
        match self {
            Gate::X(q) => Gate::X(map[*q]),
            Gate::U { qubit, theta } => Gate::U {
                qubit: map[*qubit],
                theta: *theta,
            },
            Gate::Mcx { controls, target } => Gate::Mcx {
                controls: controls.iter().map(|c| map[*c]).collect(),
                target: map[*target],
            },
        }
    }
}

/// Ordered gate list plus measurement map.
///
/// Deserializing replays every gate and measurement through [`Circuit::push`] and
/// [`Circuit::measure`], so a decoded circuit satisfies the same checks as a built one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CircuitParts"))]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    gates: Vec<Gate>,
    /// `(qubit, clbit)` pairs.
    measurements: Vec<(usize, usize)>,
}

/// Unchecked wire form of a [`Circuit`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct CircuitParts {
    num_qubits: usize,
    num_clbits: usize,
    #[serde(default)]
    gates: Vec<Gate>,
    #[serde(default)]
    measurements: Vec<(usize, usize)>,
}

#[cfg(feature = "serde")]
impl TryFrom<CircuitParts> for Circuit {
    type Error = WalkError;

    fn try_from(parts: CircuitParts) -> Result<Self, WalkError> {
        let mut qc = Circuit::new(parts.num_qubits, parts.num_clbits);
        for gate in parts.gates {
            qc.push(gate)?;
        }
        for (qubit, clbit) in parts.measurements {
            qc.measure(qubit, clbit)?;
        }
        Ok(qc)
    }
}

impl Circuit {
    /// Empty circuit on `num_qubits` qubits (all starting in `|0>`) and `num_clbits` bits.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            num_qubits,
            num_clbits,
            gates: Vec::new(),
            measurements: Vec::new(),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn measurements(&self) -> &[(usize, usize)] {
        &self.measurements
    }

    fn check(&self, qubit: usize) -> Result<(), WalkError> {
        if qubit >= self.num_qubits {
            return Err(WalkError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Append a gate after checking its qubits exist and are distinct.
    pub fn push(&mut self, gate: Gate) -> Result<&mut Self, WalkError> {
        let qs = gate.qubits();
        for (i, &q) in qs.iter().enumerate() {
            self.check(q)?;
            if qs[..i].contains(&q) {
                return Err(WalkError::DuplicateQubit(q));
            }
        }
        self.gates.push(gate);
        Ok(self)
    }

    pub fn x(&mut self, qubit: usize) -> Result<&mut Self, WalkError> {
        self.push(Gate::X(qubit))
    }

    pub fn cx(&mut self, control: usize, target: usize) -> Result<&mut Self, WalkError> {
        self.mcx(&[control], target)
    }

    pub fn ccx(&mut self, c0: usize, c1: usize, target: usize) -> Result<&mut Self, WalkError> {
        self.mcx(&[c0, c1], target)
    }

    pub fn mcx(&mut self, controls: &[usize], target: usize) -> Result<&mut Self, WalkError> {
        self.push(Gate::Mcx {
            controls: controls.to_vec(),
            target,
        })
    }

    pub fn u(&mut self, theta: f64, qubit: usize) -> Result<&mut Self, WalkError> {
        self.push(Gate::U { qubit, theta })
    }

    /// Prepare `value` on `qubits` (least-significant first) from the all-zero state.
    pub fn prepare_basis(&mut self, value: u64, qubits: &[usize]) -> Result<&mut Self, WalkError> {
        for (i, &q) in qubits.iter().enumerate() {
            if i < 64 && (value >> i) & 1 == 1 {
                self.x(q)?;
            }
        }
        Ok(self)
    }

    /// Inline `sub`, wiring its local qubit `i` to `qubits[i]`.
    pub fn append(&mut self, sub: &Circuit, qubits: &[usize]) -> Result<&mut Self, WalkError> {
        if qubits.len() != sub.num_qubits {
            return Err(WalkError::WireCountMismatch {
                expected: sub.num_qubits,
                actual: qubits.len(),
            });
        }
        for g in &sub.gates {
            self.push(g.remap(qubits))?;
        }
        Ok(self)
    }

    pub fn measure(&mut self, qubit: usize, clbit: usize) -> Result<&mut Self, WalkError> {
        self.check(qubit)?;
        if clbit >= self.num_clbits {
            return Err(WalkError::ClbitOutOfRange {
                clbit,
                num_clbits: self.num_clbits,
            });
        }
        self.measurements.push((qubit, clbit));
        Ok(self)
    }

    /// Read measured qubit values into an integer, classical bit `i` being bit `i`.
    pub(crate) fn read_clbits<F>(&self, mut qubit_value: F) -> u64
    where
        F: FnMut(usize) -> bool,
    {
        let mut out = 0u64;
        for &(q, c) in &self.measurements {
            if c < 64 && qubit_value(q) {
                out |= 1 << c;
            }
        }
        out
    }
}

/// Binary incrementer on `n + 1` qubits: local qubit 0 is the control, `1..=n` the
/// register (least-significant first).
///
/// ```rust
/// use qwalk::{increment_gate, Gate};
///
/// let inc = increment_gate(2);
/// assert_eq!(inc.gates()[0], Gate::Mcx { controls: vec![0, 1], target: 2 });
/// assert_eq!(inc.gates()[1], Gate::Mcx { controls: vec![0], target: 1 });
/// ```
#[must_use]
pub fn increment_gate(n: usize) -> Circuit {
    let mut qc = Circuit::new(n + 1, 0);
    for i in (0..n).rev() {
        let controls: Vec<usize> = (0..=i).collect();
        qc.gates.push(Gate::Mcx {
            controls,
            target: i + 1,
        });
    }
    qc
}

/// Binary decrementer on `n + 2` qubits: local qubits 0 and 1 are the coins (both must
/// be set), `2..n+2` the register (least-significant first).
#[must_use]
pub fn decrement_gate(n: usize) -> Circuit {
    let mut qc = Circuit::new(n + 2, 0);
    for i in (1..n).rev() {
        let lower: Vec<usize> = (2..2 + i).collect();
        for &q in &lower {
            qc.gates.push(Gate::X(q));
        }
        let mut controls = vec![0, 1];
        controls.extend_from_slice(&lower);
        qc.gates.push(Gate::Mcx {
            controls,
            target: 2 + i,
        });
        for &q in &lower {
            qc.gates.push(Gate::X(q));
        }
    }
    qc.gates.push(Gate::Mcx {
        controls: vec![0, 1],
        target: 2,
    });
    qc
}
