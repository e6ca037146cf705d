//! Elimination of rotations equivalent to the identity.

use alsvid_ir::CircuitDag;

use crate::error::CompileResult;
use crate::pass::{Pass, PassCounters};
use crate::passes::DEFAULT_TOLERANCE;

/// Removes parameterized rotations whose angle is zero mod 2π within a
/// configurable tolerance. Non-parameterized gates are never touched.
pub struct IdentityEliminationPass {
    tolerance: f64,
    counters: PassCounters,
}

impl IdentityEliminationPass {
    /// Create the pass with the default tolerance of 1e-10.
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    /// Create the pass with an explicit tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            counters: PassCounters::default(),
        }
    }
}

impl Default for IdentityEliminationPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for IdentityEliminationPass {
    fn name(&self) -> &str {
        "IdentityEliminationPass"
    }

    fn run(&mut self, dag: &mut CircuitDag) -> CompileResult<()> {
        self.counters.reset();

        let mut to_remove = Vec::new();
        for id in dag.topological_order()? {
            let gate = dag.gate(id)?;
            if !gate.kind().is_parameterized() {
                continue;
            }
            let Some(angle) = gate.angle() else {
                continue;
            };
            if is_effectively_zero(angle, self.tolerance) {
                to_remove.push(id);
            }
        }

        for id in to_remove {
            dag.remove_node(id)?;
            self.counters.gates_removed += 1;
        }

        Ok(())
    }

    fn counters(&self) -> PassCounters {
        self.counters
    }
}

/// Check if an angle is zero mod 2π within `tolerance`.
fn is_effectively_zero(angle: f64, tolerance: f64) -> bool {
    let two_pi = 2.0 * std::f64::consts::PI;
    let reduced = angle.abs() % two_pi;
    reduced < tolerance || (two_pi - reduced) < tolerance
}
