//! Cancellation of adjacent inverse gate pairs.

use rustc_hash::FxHashSet;

use alsvid_ir::{CircuitDag, GateKind};

use crate::error::CompileResult;
use crate::pass::{Pass, PassCounters};

/// Removes pairs of adjacent gates whose product is the identity.
///
/// A pair `(u, v)` cancels when `v` is a direct successor of `u`, both
/// operate on the same ordered operand tuple, and the kinds are either
/// an equal hermitian pair (`H·H`, `X·X`, `Y·Y`, `Z·Z`, `CNOT·CNOT`,
/// `CZ·CZ`, `SWAP·SWAP`) or an adjoint pair (`S·Sdg`, `T·Tdg` in either
/// order). Rotations are left to the merge/identity-elimination path
/// even when their angles sum to zero.
pub struct CancellationPass {
    counters: PassCounters,
}

impl CancellationPass {
    /// Create a new cancellation pass.
    pub fn new() -> Self {
        Self {
            counters: PassCounters::default(),
        }
    }
}

impl Default for CancellationPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for CancellationPass {
    fn name(&self) -> &str {
        "CancellationPass"
    }

    fn run(&mut self, dag: &mut CircuitDag) -> CompileResult<()> {
        self.counters.reset();

        let order = dag.topological_order()?;
        let mut marked: FxHashSet<_> = FxHashSet::default();

        for &id in &order {
            if marked.contains(&id) {
                continue;
            }
            let gate = dag.gate(id)?;
            for succ in dag.successors(id)? {
                if marked.contains(&succ) {
                    continue;
                }
                let other = dag.gate(succ)?;
                if gate.qubits() == other.qubits()
                    && cancels_to_identity(gate.kind(), other.kind())
                {
                    marked.insert(id);
                    marked.insert(succ);
                    // Each gate cancels at most once.
                    break;
                }
            }
        }

        // Remove in reverse topological order so every contraction sees a
        // consistent DAG.
        for &id in order.iter().rev() {
            if marked.contains(&id) {
                dag.remove_node(id)?;
            }
        }

        self.counters.gates_removed = marked.len();
        Ok(())
    }

    fn counters(&self) -> PassCounters {
        self.counters
    }
}

/// Check if the product of two gate kinds is the identity.
pub(crate) fn cancels_to_identity(first: GateKind, second: GateKind) -> bool {
    if first.is_hermitian() {
        return first == second;
    }
    matches!(
        (first, second),
        (GateKind::S, GateKind::Sdg)
            | (GateKind::Sdg, GateKind::S)
            | (GateKind::T, GateKind::Tdg)
            | (GateKind::Tdg, GateKind::T)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::{Circuit, QubitId};
    use std::f64::consts::PI;

    fn run_on(circuit: &Circuit) -> (CircuitDag, PassCounters) {
        let mut dag = CircuitDag::from_circuit(circuit).unwrap();
        let mut pass = CancellationPass::new();
        pass.run(&mut dag).unwrap();
        (dag, pass.counters())
    }

    #[test]
    fn test_hermitian_pairs_cancel() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap();
        let (dag, counters) = run_on(&circuit);
        assert_eq!(dag.node_count(), 0);
        assert_eq!(counters.gates_removed, 4);
        assert_eq!(counters.gates_added, 0);
    }

    #[test]
    fn test_adjoint_pairs_cancel_in_either_order() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit
            .s(QubitId(0))
            .unwrap()
            .sdg(QubitId(0))
            .unwrap()
            .tdg(QubitId(0))
            .unwrap()
            .t(QubitId(0))
            .unwrap();
        let (dag, counters) = run_on(&circuit);
        assert_eq!(dag.node_count(), 0);
        assert_eq!(counters.gates_removed, 4);
    }

    #[test]
    fn test_two_qubit_pairs_cancel() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();
        let (dag, counters) = run_on(&circuit);
        assert_eq!(dag.node_count(), 0);
        assert_eq!(counters.gates_removed, 2);
    }

    #[test]
    fn test_reversed_operands_do_not_cancel() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .cx(QubitId(1), QubitId(0))
            .unwrap();
        let (dag, counters) = run_on(&circuit);
        assert_eq!(dag.node_count(), 2);
        assert_eq!(counters.gates_removed, 0);
    }

    #[test]
    fn test_same_pair_repeated_swap_cancels() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .swap(QubitId(0), QubitId(1))
            .unwrap()
            .swap(QubitId(0), QubitId(1))
            .unwrap();
        let (dag, _) = run_on(&circuit);
        assert_eq!(dag.node_count(), 0);
    }

    #[test]
    fn test_rotations_are_not_cancelled_here() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit
            .rz(PI, QubitId(0))
            .unwrap()
            .rz(-PI, QubitId(0))
            .unwrap();
        let (dag, counters) = run_on(&circuit);
        assert_eq!(dag.node_count(), 2);
        assert_eq!(counters.gates_removed, 0);
    }

    #[test]
    fn test_different_kinds_do_not_cancel() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.h(QubitId(0)).unwrap().x(QubitId(0)).unwrap();
        let (dag, _) = run_on(&circuit);
        assert_eq!(dag.node_count(), 2);
    }

    #[test]
    fn test_each_gate_cancels_at_most_once() {
        // H H H: the middle gate pairs with the first, the third survives.
        let mut circuit = Circuit::new(1).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap();
        let (dag, counters) = run_on(&circuit);
        assert_eq!(dag.node_count(), 1);
        assert_eq!(counters.gates_removed, 2);
    }

    #[test]
    fn test_second_run_removes_nothing() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();
        let mut pass = CancellationPass::new();
        pass.run(&mut dag).unwrap();
        assert_eq!(pass.counters().gates_removed, 2);

        pass.run(&mut dag).unwrap();
        assert_eq!(pass.counters().gates_removed, 0);
        assert_eq!(dag.node_count(), 1);
    }

    #[test]
    fn test_chain_of_four_collapses_in_one_sweep() {
        // X X X X: the sweep pairs (0,1) and (2,3).
        let mut circuit = Circuit::new(1).unwrap();
        for _ in 0..4 {
            circuit.x(QubitId(0)).unwrap();
        }
        let (dag, counters) = run_on(&circuit);
        assert_eq!(dag.node_count(), 0);
        assert_eq!(counters.gates_removed, 4);
    }
}
