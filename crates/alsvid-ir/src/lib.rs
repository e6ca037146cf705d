//! Alsvid Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing quantum
//! circuits in Alsvid: the linear [`Circuit`] form produced by front-ends
//! and the dependency-graph [`CircuitDag`] form the optimization passes
//! operate on.
//!
//! # Overview
//!
//! A [`Circuit`] is an ordered gate sequence over a fixed qubit register.
//! [`CircuitDag`] makes gate dependencies explicit: nodes own gates and an
//! edge `(u, v)` means `u` must execute before `v`. Passes rewrite the DAG
//! and emit a fresh circuit in topological order.
//!
//! # Example: Building a Bell state
//!
//! ```rust
//! use alsvid_ir::{Circuit, CircuitDag, QubitId};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let dag = CircuitDag::from_circuit(&circuit).unwrap();
//! assert_eq!(dag.depth().unwrap(), 2);
//! ```
//!
//! # Supported gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates (radian angle) |
//! | `CNOT` | 2 | Controlled-NOT |
//! | `CZ` | 2 | Controlled-Z |
//! | `SWAP` | 2 | SWAP gate |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod qubit;

pub use circuit::{Circuit, MAX_QUBITS};
pub use dag::CircuitDag;
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind};
pub use qubit::{GateId, QubitId};
