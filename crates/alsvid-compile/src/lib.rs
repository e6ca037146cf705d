//! Alsvid Optimization and Routing
//!
//! This crate is the middle-end of the Alsvid quantum compiler: a
//! pass-based optimization pipeline over the circuit DAG and a routing
//! backend that maps the optimized circuit onto a device coupling graph.
//!
//! # Architecture
//!
//! ```text
//! Circuit ──► CircuitDag ──► PassManager ──► Circuit ──► Router ──► RoutingResult
//!                               │                           │
//!                               ├─ CommutationPass          └─ SabreRouter(Topology)
//!                               ├─ CancellationPass
//!                               ├─ RotationMergePass
//!                               └─ IdentityEliminationPass
//! ```
//!
//! # Example: optimize and route
//!
//! ```rust
//! use alsvid_compile::passes::{CancellationPass, IdentityEliminationPass, RotationMergePass};
//! use alsvid_compile::routing::{Router, SabreRouter, Topology};
//! use alsvid_compile::PassManager;
//! use alsvid_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let mut pm = PassManager::new();
//! pm.add_pass(CancellationPass::new());
//! pm.add_pass(RotationMergePass::new());
//! pm.add_pass(IdentityEliminationPass::new());
//! pm.run_circuit(&mut circuit).unwrap();
//! assert_eq!(circuit.len(), 1); // the Hadamard pair cancelled
//!
//! let topology = Topology::linear(2).unwrap();
//! let result = SabreRouter::new().route(&circuit, &topology).unwrap();
//! assert_eq!(result.swaps_inserted, 0);
//! ```
//!
//! # Custom passes
//!
//! Implement the [`Pass`] trait to add a pass to the pipeline:
//!
//! ```rust
//! use alsvid_compile::{CompileResult, Pass, PassCounters};
//! use alsvid_ir::CircuitDag;
//!
//! struct MyPass {
//!     counters: PassCounters,
//! }
//!
//! impl Pass for MyPass {
//!     fn name(&self) -> &str {
//!         "MyPass"
//!     }
//!
//!     fn run(&mut self, _dag: &mut CircuitDag) -> CompileResult<()> {
//!         self.counters.reset();
//!         Ok(())
//!     }
//!
//!     fn counters(&self) -> PassCounters {
//!         self.counters
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod routing;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassRecord, PassStatistics};
pub use pass::{Pass, PassCounters};
pub use passes::{
    CancellationPass, CommutationPass, IdentityEliminationPass, RotationMergePass,
};
pub use routing::{Router, RoutingResult, SabreRouter, Topology, TrivialRouter};
