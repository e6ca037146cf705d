//! Pass manager: ordered pipeline execution with aggregate statistics.

use std::fmt;

use tracing::{debug, info, instrument};

use alsvid_ir::{Circuit, CircuitDag};

use crate::error::CompileResult;
use crate::pass::Pass;

/// Per-pass entry in the aggregate statistics.
#[derive(Debug, Clone)]
pub struct PassRecord {
    /// Stable pass name.
    pub name: String,
    /// Gates removed by this pass.
    pub gates_removed: usize,
    /// Gates added by this pass.
    pub gates_added: usize,
}

/// Statistics accumulated across one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PassStatistics {
    /// Gate count before the first pass.
    pub initial_gate_count: usize,
    /// Gate count after the last pass.
    pub final_gate_count: usize,
    /// Total gates removed across all passes.
    pub total_gates_removed: usize,
    /// Total gates added across all passes.
    pub total_gates_added: usize,
    /// Per-pass breakdown in execution order.
    pub per_pass: Vec<PassRecord>,
}

impl PassStatistics {
    /// Net change in gate count; negative means reduction.
    pub fn net_change(&self) -> isize {
        self.total_gates_added as isize - self.total_gates_removed as isize
    }

    /// Percentage reduction in gate count, 0 when the input was empty.
    pub fn reduction_percent(&self) -> f64 {
        if self.initial_gate_count == 0 {
            return 0.0;
        }
        100.0 * (self.initial_gate_count as f64 - self.final_gate_count as f64)
            / self.initial_gate_count as f64
    }
}

impl fmt::Display for PassStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pipeline statistics:")?;
        writeln!(f, "  initial gates: {}", self.initial_gate_count)?;
        writeln!(f, "  final gates:   {}", self.final_gate_count)?;
        writeln!(f, "  reduction:     {:.1}%", self.reduction_percent())?;
        for record in &self.per_pass {
            writeln!(
                f,
                "  {}: -{} / +{}",
                record.name, record.gates_removed, record.gates_added
            )?;
        }
        Ok(())
    }
}

/// Runs an ordered sequence of passes and aggregates their statistics.
///
/// Passes execute in registration order; nothing is re-canonicalized
/// between them. Iteration to a fixed point, where needed, is each
/// pass's own responsibility.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
    statistics: PassStatistics,
}

impl PassManager {
    /// Create an empty pass manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass to the pipeline.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Number of registered passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the pipeline has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Run all passes on the DAG in registration order.
    #[instrument(skip(self, dag))]
    pub fn run(&mut self, dag: &mut CircuitDag) -> CompileResult<()> {
        self.statistics = PassStatistics {
            initial_gate_count: dag.node_count(),
            ..PassStatistics::default()
        };

        info!(
            passes = self.passes.len(),
            qubits = dag.num_qubits(),
            gates = dag.node_count(),
            "running optimization pipeline"
        );

        for pass in &mut self.passes {
            debug!(pass = pass.name(), "running pass");
            pass.run(dag)?;
            let counters = pass.counters();
            self.statistics.total_gates_removed += counters.gates_removed;
            self.statistics.total_gates_added += counters.gates_added;
            self.statistics.per_pass.push(PassRecord {
                name: pass.name().to_string(),
                gates_removed: counters.gates_removed,
                gates_added: counters.gates_added,
            });
            debug!(
                pass = pass.name(),
                removed = counters.gates_removed,
                added = counters.gates_added,
                gates = dag.node_count(),
                "pass completed"
            );
        }

        self.statistics.final_gate_count = dag.node_count();
        info!(
            gates = self.statistics.final_gate_count,
            removed = self.statistics.total_gates_removed,
            "pipeline completed"
        );

        Ok(())
    }

    /// Convenience entry point: build a DAG from the circuit, run the
    /// pipeline, and write the optimized circuit back.
    pub fn run_circuit(&mut self, circuit: &mut Circuit) -> CompileResult<()> {
        let mut dag = CircuitDag::from_circuit(circuit)?;
        self.run(&mut dag)?;
        *circuit = dag.to_circuit()?;
        Ok(())
    }

    /// Statistics from the most recent run.
    pub fn statistics(&self) -> &PassStatistics {
        &self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::{CancellationPass, IdentityEliminationPass, RotationMergePass};
    use alsvid_ir::QubitId;
    use std::f64::consts::PI;

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_run_without_passes_leaves_dag_alone() {
        let mut pm = PassManager::new();
        let circuit = Circuit::bell().unwrap();
        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();
        pm.run(&mut dag).unwrap();
        assert_eq!(dag.node_count(), 2);
        assert_eq!(pm.statistics().initial_gate_count, 2);
        assert_eq!(pm.statistics().final_gate_count, 2);
    }

    #[test]
    fn test_statistics_aggregate_per_pass() {
        let mut pm = PassManager::new();
        pm.add_pass(CancellationPass::new());
        pm.add_pass(RotationMergePass::new());
        pm.add_pass(IdentityEliminationPass::new());

        let mut circuit = Circuit::new(1).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .rz(PI, QubitId(0))
            .unwrap()
            .rz(PI, QubitId(0))
            .unwrap();

        let mut dag = CircuitDag::from_circuit(&circuit).unwrap();
        pm.run(&mut dag).unwrap();

        let stats = pm.statistics();
        assert_eq!(stats.initial_gate_count, 4);
        assert_eq!(stats.final_gate_count, 0);
        assert_eq!(stats.per_pass.len(), 3);
        assert_eq!(stats.per_pass[0].name, "CancellationPass");
        assert_eq!(stats.per_pass[0].gates_removed, 2);
        assert_eq!(stats.per_pass[1].name, "RotationMergePass");
        assert_eq!(stats.per_pass[1].gates_removed, 1);
        assert_eq!(stats.per_pass[2].name, "IdentityEliminationPass");
        assert_eq!(stats.per_pass[2].gates_removed, 1);
        assert_eq!(stats.total_gates_removed, 4);
        assert_eq!(stats.net_change(), -4);
        assert!((stats.reduction_percent() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_circuit_rebuilds_in_place() {
        let mut pm = PassManager::new();
        pm.add_pass(CancellationPass::new());

        let mut circuit = Circuit::new(1).unwrap();
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap();
        pm.run_circuit(&mut circuit).unwrap();

        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.gates()[0].kind(), alsvid_ir::GateKind::X);
    }

    #[test]
    fn test_statistics_display() {
        let stats = PassStatistics {
            initial_gate_count: 10,
            final_gate_count: 6,
            total_gates_removed: 4,
            total_gates_added: 0,
            per_pass: vec![PassRecord {
                name: "CancellationPass".into(),
                gates_removed: 4,
                gates_added: 0,
            }],
        };
        let rendered = format!("{stats}");
        assert!(rendered.contains("initial gates: 10"));
        assert!(rendered.contains("CancellationPass: -4 / +0"));
    }
}
