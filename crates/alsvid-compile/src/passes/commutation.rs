//! Reordering of commuting gates to expose cancellations and merges.

use alsvid_ir::{CircuitDag, Gate, GateKind};

use crate::error::CompileResult;
use crate::pass::{Pass, PassCounters};
use crate::passes::cancellation::cancels_to_identity;

/// Reorders commuting gates so that a subsequent [`CancellationPass`]
/// or [`RotationMergePass`] finds more pairs.
///
/// Commutation of two overlapping gates cannot be expressed as edge
/// rewiring in the qubit-wire DAG, so the pass works on a linearization:
/// it emits the gates in topological order, swaps adjacent commuting
/// pairs when the later gate has a cancel or merge partner immediately
/// before the pair, and rebuilds the DAG from the reordered sequence.
/// The gate count never changes; only the order does.
///
/// [`CancellationPass`]: crate::passes::CancellationPass
/// [`RotationMergePass`]: crate::passes::RotationMergePass
pub struct CommutationPass {
    counters: PassCounters,
    swaps_performed: usize,
}

/// Safety bound on fixed-point sweeps.
const MAX_ITERATIONS: usize = 100;

impl CommutationPass {
    /// Create a new commutation pass.
    pub fn new() -> Self {
        Self {
            counters: PassCounters::default(),
            swaps_performed: 0,
        }
    }

    /// Number of adjacent-pair swaps performed by the last run.
    pub fn swaps_performed(&self) -> usize {
        self.swaps_performed
    }
}

impl Default for CommutationPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for CommutationPass {
    fn name(&self) -> &str {
        "CommutationPass"
    }

    fn run(&mut self, dag: &mut CircuitDag) -> CompileResult<()> {
        self.counters.reset();
        self.swaps_performed = 0;

        if dag.node_count() < 3 {
            return Ok(());
        }

        let mut gates: Vec<Gate> = Vec::with_capacity(dag.node_count());
        for id in dag.topological_order()? {
            gates.push(dag.gate(id)?.clone());
        }

        for _ in 0..MAX_ITERATIONS {
            let mut changed = false;
            for i in 1..gates.len() - 1 {
                if !commute(&gates[i], &gates[i + 1]) {
                    continue;
                }
                // Pull the later gate forward only when that lands it next
                // to a partner, and the gate being displaced does not
                // already pair with that partner itself.
                let partner = &gates[i - 1];
                if (could_cancel(partner, &gates[i + 1]) || could_merge(partner, &gates[i + 1]))
                    && !could_cancel(partner, &gates[i])
                    && !could_merge(partner, &gates[i])
                {
                    gates.swap(i, i + 1);
                    self.swaps_performed += 1;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        if self.swaps_performed > 0 {
            let mut reordered = CircuitDag::new(dag.num_qubits())?;
            for gate in gates {
                reordered.add_gate(gate)?;
            }
            *dag = reordered;
        }

        Ok(())
    }

    fn counters(&self) -> PassCounters {
        self.counters
    }
}

/// Check if two gates commute under the recognized rule set.
pub fn commute(g1: &Gate, g2: &Gate) -> bool {
    if !qubits_overlap(g1, g2) {
        return true;
    }
    if g1.kind() == g2.kind() && g1.qubits() == g2.qubits() {
        return true;
    }
    if is_diagonal(g1.kind()) && is_diagonal(g2.kind()) {
        return true;
    }
    // A Z-like gate on the control wire passes through CNOT.
    if is_z_like(g1.kind()) && g2.kind() == GateKind::Cx && g1.qubits()[0] == g2.qubits()[0] {
        return true;
    }
    if is_z_like(g2.kind()) && g1.kind() == GateKind::Cx && g2.qubits()[0] == g1.qubits()[0] {
        return true;
    }
    // X on the target wire passes through CNOT.
    if g1.kind() == GateKind::X && g2.kind() == GateKind::Cx && g1.qubits()[0] == g2.qubits()[1] {
        return true;
    }
    if g2.kind() == GateKind::X && g1.kind() == GateKind::Cx && g2.qubits()[0] == g1.qubits()[1] {
        return true;
    }
    false
}

/// Gates diagonal in the computational basis.
fn is_diagonal(kind: GateKind) -> bool {
    matches!(
        kind,
        GateKind::Z
            | GateKind::S
            | GateKind::Sdg
            | GateKind::T
            | GateKind::Tdg
            | GateKind::Rz
            | GateKind::Cz
    )
}

/// Diagonal single-qubit gates.
fn is_z_like(kind: GateKind) -> bool {
    matches!(
        kind,
        GateKind::Z
            | GateKind::S
            | GateKind::Sdg
            | GateKind::T
            | GateKind::Tdg
            | GateKind::Rz
    )
}

fn qubits_overlap(g1: &Gate, g2: &Gate) -> bool {
    g1.qubits().iter().any(|q| g2.qubits().contains(q))
}

fn could_cancel(g1: &Gate, g2: &Gate) -> bool {
    g1.qubits() == g2.qubits() && cancels_to_identity(g1.kind(), g2.kind())
}

fn could_merge(g1: &Gate, g2: &Gate) -> bool {
    g1.qubits() == g2.qubits() && g1.kind() == g2.kind() && g1.kind().is_parameterized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::CancellationPass;
    use alsvid_ir::{Circuit, QubitId};

    fn gate_kinds(dag: &CircuitDag) -> Vec<GateKind> {
        dag.topological_order()
            .unwrap()
            .into_iter()
            .map(|id| dag.gate(id).unwrap().kind())
            .collect()
    }

    #[test]
    fn test_disjoint_gates_commute() {
        let a = Gate::h(QubitId(0));
        let b = Gate::x(QubitId(1));
        assert!(commute(&a, &b));
    }

    #[test]
    fn test_equal_gates_commute() {
        let a = Gate::cnot(QubitId(0), QubitId(1)).unwrap();
        let b = Gate::cnot(QubitId(0), QubitId(1)).unwrap();
        assert!(commute(&a, &b));
    }

    #[test]
    fn test_diagonal_gates_commute() {
        let z = Gate::z(QubitId(0));
        let t = Gate::t(QubitId(0));
        let rz = Gate::rz(QubitId(0), 0.3);
        let cz = Gate::cz(QubitId(0), QubitId(1)).unwrap();
        assert!(commute(&z, &t));
        assert!(commute(&rz, &cz));
        assert!(commute(&z, &rz));
    }

    #[test]
    fn test_z_through_cnot_control() {
        let z = Gate::z(QubitId(0));
        let cx = Gate::cnot(QubitId(0), QubitId(1)).unwrap();
        assert!(commute(&z, &cx));
        assert!(commute(&cx, &z));

        let z_on_target = Gate::z(QubitId(1));
        assert!(!commute(&z_on_target, &cx));
    }

    #[test]
    fn test_x_through_cnot_target() {
        let x = Gate::x(QubitId(1));
        let cx = Gate::cnot(QubitId(0), QubitId(1)).unwrap();
        assert!(commute(&x, &cx));
        assert!(commute(&cx, &x));

        let x_on_control = Gate::x(QubitId(0));
        assert!(!commute(&x_on_control, &cx));
    }

    #[test]
    fn test_non_commuting_pairs() {
        let h = Gate::h(QubitId(0));
        let z = Gate::z(QubitId(0));
        let x = Gate::x(QubitId(0));
        assert!(!commute(&h, &z));
        assert!(!commute(&z, &x));
    }

    #[test]
    fn test_reorders_z_through_control() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .z(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .z(QubitId(0))
            .unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();

        let mut pass = CommutationPass::new();
        pass.run(&mut dag).unwrap();

        assert_eq!(dag.node_count(), 3);
        assert_eq!(pass.swaps_performed(), 1);
        assert_eq!(
            gate_kinds(&dag),
            vec![GateKind::Z, GateKind::Z, GateKind::Cx]
        );
        assert_eq!(pass.counters(), PassCounters::default());
    }

    #[test]
    fn test_enables_cancellation() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .z(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .z(QubitId(0))
            .unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();

        CommutationPass::new().run(&mut dag).unwrap();
        let mut cancel = CancellationPass::new();
        cancel.run(&mut dag).unwrap();

        assert_eq!(dag.node_count(), 1);
        assert_eq!(gate_kinds(&dag), vec![GateKind::Cx]);
        assert_eq!(cancel.counters().gates_removed, 2);
    }

    #[test]
    fn test_no_beneficial_swap_leaves_order_alone() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .h(QubitId(1))
            .unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();
        let before = gate_kinds(&dag);

        let mut pass = CommutationPass::new();
        pass.run(&mut dag).unwrap();

        assert_eq!(pass.swaps_performed(), 0);
        assert_eq!(gate_kinds(&dag), before);
    }

    #[test]
    fn test_identical_run_of_gates_is_stable() {
        // Z Z Z must not churn: the left pair already cancels.
        let mut circuit = Circuit::new(1).unwrap();
        circuit
            .z(QubitId(0))
            .unwrap()
            .z(QubitId(0))
            .unwrap()
            .z(QubitId(0))
            .unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();

        let mut pass = CommutationPass::new();
        pass.run(&mut dag).unwrap();
        assert_eq!(pass.swaps_performed(), 0);
        assert_eq!(dag.node_count(), 3);
    }

    #[test]
    fn test_rotation_merge_partner_pulls_forward() {
        // Rz CX Rz on the control wire: the trailing Rz commutes through
        // and lands next to its merge partner.
        let mut circuit = Circuit::new(2).unwrap();
        circuit
            .rz(0.3, QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .rz(0.4, QubitId(0))
            .unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();

        let mut pass = CommutationPass::new();
        pass.run(&mut dag).unwrap();
        assert_eq!(pass.swaps_performed(), 1);
        assert_eq!(
            gate_kinds(&dag),
            vec![GateKind::Rz, GateKind::Rz, GateKind::Cx]
        );
    }
}
