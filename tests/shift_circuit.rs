//! Shift-operator correctness on basis states.

use qwalk::{
    decrement_gate, increment_gate, walk_circuit, BasisTracer, Circuit, CircuitExecutor,
    StateVectorBackend,
};
use proptest::prelude::*;
use std::f64::consts::PI;

/// `n`-bit register on qubits `2..n+2`, coins on 0 and 1.
fn shifted(n: usize, v: u64, coins: (bool, bool), decrement: bool) -> u64 {
    let mut qc = Circuit::new(n + 2, n);
    let reg: Vec<usize> = (2..n + 2).collect();
    qc.prepare_basis(v, &reg).unwrap();
    if coins.0 {
        qc.x(0).unwrap();
    }
    if coins.1 {
        qc.x(1).unwrap();
    }
    if decrement {
        let all: Vec<usize> = (0..n + 2).collect();
        qc.append(&decrement_gate(n), &all).unwrap();
    } else {
        let mut wires = vec![1];
        wires.extend_from_slice(&reg);
        qc.append(&increment_gate(n), &wires).unwrap();
    }
    for (i, &q) in reg.iter().enumerate() {
        qc.measure(q, i).unwrap();
    }
    BasisTracer.execute(&qc).unwrap()
}

#[test]
fn increment_adds_one_for_every_value() {
    for n in 1..=5 {
        let top = 1u64 << n;
        for v in 0..top - 1 {
            assert_eq!(shifted(n, v, (false, true), false), v + 1, "n={n} v={v}");
        }
        // Register wraps.
        assert_eq!(shifted(n, top - 1, (false, true), false), 0);
    }
}

#[test]
fn decrement_subtracts_one_for_every_value() {
    for n in 1..=5 {
        let top = 1u64 << n;
        for v in 1..top {
            assert_eq!(shifted(n, v, (true, true), true), v - 1, "n={n} v={v}");
        }
        assert_eq!(shifted(n, 0, (true, true), true), top - 1);
    }
}

#[test]
fn shift_is_inert_without_its_coins() {
    for n in 1..=4 {
        for v in 0..(1u64 << n) {
            assert_eq!(shifted(n, v, (true, false), false), v);
            assert_eq!(shifted(n, v, (false, true), true), v);
            assert_eq!(shifted(n, v, (true, false), true), v);
        }
    }
}

#[test]
fn forward_coin_walk_advances_one_per_odd_step() {
    // theta = pi sets both coins to |1>: one forward hop, then coins return to |0>.
    for v in 0..4 {
        let qc = walk_circuit(v, 5, PI, 1).unwrap();
        assert_eq!(BasisTracer.execute(&qc).unwrap(), v as u64 + 1);
    }
}

proptest! {
    #[test]
    fn walk_distribution_is_normalized(
        pos in 0usize..9,
        theta in 0.0f64..PI,
        steps in 0usize..4,
    ) {
        let qc = walk_circuit(pos, 9, theta, steps).unwrap();
        let d = StateVectorBackend::new().distribution(&qc).unwrap();
        let total: f64 = d.values().sum();
        prop_assert!((total - 1.0).abs() < 1e-9, "total={}", total);
        prop_assert!(d.keys().all(|&k| k < 16));
    }

    #[test]
    fn walk_moves_at_most_steps_hops(
        pos in 0usize..16,
        theta in 0.0f64..PI,
        steps in 0usize..4,
    ) {
        let qc = walk_circuit(pos, 16, theta, steps).unwrap();
        let d = StateVectorBackend::new().distribution(&qc).unwrap();
        for (&k, &p) in &d {
            if p < 1e-12 {
                continue;
            }
            let diff = (k as i64 - pos as i64).rem_euclid(16);
            let dist = diff.min(16 - diff) as usize;
            prop_assert!(dist <= steps, "pos={} k={} steps={}", pos, k, steps);
        }
    }
}
