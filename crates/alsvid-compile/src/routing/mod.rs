//! Qubit routing: mapping logical circuits onto constrained topologies.
//!
//! Most circuits assume all-to-all connectivity, but devices do not. A
//! [`Router`] inserts SWAP gates so that every two-qubit gate lands on a
//! directly connected pair of physical qubits.

pub mod sabre;
pub mod topology;

pub use sabre::SabreRouter;
pub use topology::Topology;

use serde::{Deserialize, Serialize};
use std::fmt;

use alsvid_ir::Circuit;

use crate::error::{CompileError, CompileResult};

/// Outcome of routing a logical circuit onto a topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingResult {
    /// The routed circuit over the physical-qubit register.
    pub routed_circuit: Circuit,
    /// Initial mapping: `initial_mapping[logical] = physical`.
    pub initial_mapping: Vec<u32>,
    /// Final mapping: `final_mapping[logical] = physical`.
    pub final_mapping: Vec<u32>,
    /// Number of SWAP gates inserted.
    pub swaps_inserted: usize,
    /// Depth of the logical circuit before routing.
    pub original_depth: usize,
    /// Depth of the routed circuit.
    pub final_depth: usize,
}

impl RoutingResult {
    /// Depth added by routing, saturating at zero.
    pub fn depth_overhead(&self) -> usize {
        self.final_depth.saturating_sub(self.original_depth)
    }

    /// Gate-count overhead in CX equivalents (each SWAP costs three).
    pub fn gate_overhead(&self) -> usize {
        self.swaps_inserted * 3
    }
}

impl fmt::Display for RoutingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "routing result:")?;
        writeln!(f, "  swaps inserted: {}", self.swaps_inserted)?;
        writeln!(f, "  original depth: {}", self.original_depth)?;
        writeln!(f, "  final depth:    {}", self.final_depth)?;
        write!(f, "  final mapping:  [")?;
        for (logical, physical) in self.final_mapping.iter().enumerate() {
            if logical > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{logical}->{physical}")?;
        }
        write!(f, "]")
    }
}

/// A routing algorithm: logical circuit + topology → physical circuit
/// and mapping.
pub trait Router {
    /// Algorithm name for logging and statistics.
    fn name(&self) -> &str;

    /// Route `circuit` onto `topology`.
    ///
    /// Fails with [`CompileError::IncompatibleSize`] when the circuit is
    /// wider than the device. Every two-qubit gate in the output operates
    /// on a directly connected pair.
    fn route(&self, circuit: &Circuit, topology: &Topology) -> CompileResult<RoutingResult>;
}

/// The identity mapping over `n` logical qubits.
pub(crate) fn identity_mapping(n: usize) -> Vec<u32> {
    (0..n as u32).collect()
}

/// Shared precondition of every router.
pub(crate) fn validate_route_inputs(
    circuit: &Circuit,
    topology: &Topology,
) -> CompileResult<()> {
    if circuit.num_qubits() > topology.num_qubits() {
        return Err(CompileError::IncompatibleSize {
            logical: circuit.num_qubits(),
            physical: topology.num_qubits(),
        });
    }
    Ok(())
}

/// Baseline router that performs no routing at all.
///
/// Gates keep their operands under the identity mapping; the input must
/// already respect the topology (or be destined for an all-to-all
/// device). Useful for tests and as a comparison baseline.
pub struct TrivialRouter;

impl Router for TrivialRouter {
    fn name(&self) -> &str {
        "TrivialRouter"
    }

    fn route(&self, circuit: &Circuit, topology: &Topology) -> CompileResult<RoutingResult> {
        validate_route_inputs(circuit, topology)?;

        let mut routed = Circuit::new(topology.num_qubits())?;
        for gate in circuit {
            routed.add_gate(gate.on_qubits(gate.qubits().to_vec())?)?;
        }

        let mapping = identity_mapping(circuit.num_qubits());
        Ok(RoutingResult {
            original_depth: circuit.depth(),
            final_depth: routed.depth(),
            routed_circuit: routed,
            initial_mapping: mapping.clone(),
            final_mapping: mapping,
            swaps_inserted: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::QubitId;

    #[test]
    fn test_trivial_router_passthrough() {
        let circuit = Circuit::bell().unwrap();
        let topology = Topology::linear(4).unwrap();
        let result = TrivialRouter.route(&circuit, &topology).unwrap();

        assert_eq!(result.routed_circuit.num_qubits(), 4);
        assert_eq!(result.routed_circuit.len(), 2);
        assert_eq!(result.swaps_inserted, 0);
        assert_eq!(result.initial_mapping, vec![0, 1]);
        assert_eq!(result.final_mapping, vec![0, 1]);
        assert_eq!(result.depth_overhead(), 0);
    }

    #[test]
    fn test_incompatible_size() {
        let circuit = Circuit::ghz(4).unwrap();
        let topology = Topology::linear(2).unwrap();
        assert!(matches!(
            TrivialRouter.route(&circuit, &topology),
            Err(CompileError::IncompatibleSize {
                logical: 4,
                physical: 2
            })
        ));
    }

    #[test]
    fn test_gate_overhead() {
        let result = RoutingResult {
            routed_circuit: Circuit::new(2).unwrap(),
            initial_mapping: vec![0, 1],
            final_mapping: vec![1, 0],
            swaps_inserted: 2,
            original_depth: 3,
            final_depth: 5,
        };
        assert_eq!(result.gate_overhead(), 6);
        assert_eq!(result.depth_overhead(), 2);
        let rendered = format!("{result}");
        assert!(rendered.contains("swaps inserted: 2"));
        assert!(rendered.contains("0->1, 1->0"));
    }

    #[test]
    fn test_trivial_router_keeps_operands() {
        let mut circuit = Circuit::new(3).unwrap();
        circuit
            .h(QubitId(2))
            .unwrap()
            .cx(QubitId(2), QubitId(0))
            .unwrap();
        let topology = Topology::full(3).unwrap();
        let result = TrivialRouter.route(&circuit, &topology).unwrap();
        assert_eq!(
            result.routed_circuit.gates()[1].qubits(),
            &[QubitId(2), QubitId(0)]
        );
    }
}
