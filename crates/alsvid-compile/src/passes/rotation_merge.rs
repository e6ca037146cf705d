//! Merging of adjacent same-axis rotation gates.

use rustc_hash::FxHashSet;

use alsvid_ir::{CircuitDag, GateId};

use crate::error::CompileResult;
use crate::pass::{Pass, PassCounters};
use crate::passes::normalize_angle;

/// Folds adjacent rotations of the same axis on the same qubit:
/// `Rx(α)·Rx(β) → Rx(α+β)`, likewise for `Ry` and `Rz`. The merged
/// angle is normalized into (−π, π].
///
/// Runs to a fixed point so that chains collapse into a single gate.
/// Merging never crosses a non-rotation barrier and never conjugates
/// across axes.
pub struct RotationMergePass {
    counters: PassCounters,
}

/// Safety bound on fixed-point iterations.
const MAX_ITERATIONS: usize = 100;

impl RotationMergePass {
    /// Create a new rotation merge pass.
    pub fn new() -> Self {
        Self {
            counters: PassCounters::default(),
        }
    }
}

impl Default for RotationMergePass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for RotationMergePass {
    fn name(&self) -> &str {
        "RotationMergePass"
    }

    fn run(&mut self, dag: &mut CircuitDag) -> CompileResult<()> {
        self.counters.reset();

        for _ in 0..MAX_ITERATIONS {
            let order = dag.topological_order()?;
            let mut marked: FxHashSet<GateId> = FxHashSet::default();
            let mut merges: Vec<(GateId, f64)> = Vec::new();

            for &id in &order {
                if marked.contains(&id) {
                    continue;
                }
                let gate = dag.gate(id)?;
                if !gate.kind().is_parameterized() {
                    continue;
                }
                let Some(alpha) = gate.angle() else {
                    continue;
                };

                for succ in dag.successors(id)? {
                    if marked.contains(&succ) {
                        continue;
                    }
                    let other = dag.gate(succ)?;
                    if other.kind() != gate.kind() || other.qubits() != gate.qubits() {
                        continue;
                    }
                    let Some(beta) = other.angle() else {
                        continue;
                    };
                    merges.push((id, normalize_angle(alpha + beta)));
                    marked.insert(succ);
                    break;
                }
            }

            if marked.is_empty() {
                break;
            }

            for (id, angle) in merges {
                dag.update_angle(id, angle)?;
            }
            for &id in order.iter().rev() {
                if marked.contains(&id) {
                    dag.remove_node(id)?;
                }
            }
            self.counters.gates_removed += marked.len();
        }

        Ok(())
    }

    fn counters(&self) -> PassCounters {
        self.counters
    }
}
