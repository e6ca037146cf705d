//! Error types for the IR crate.

use crate::qubit::{GateId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate construction violated arity, parameterization, or operand
    /// distinctness.
    #[error("invalid {gate} gate: {reason}")]
    InvalidGate {
        /// Name of the offending gate kind.
        gate: &'static str,
        /// What was violated.
        reason: String,
    },

    /// A gate references a qubit beyond the circuit or DAG register.
    #[error("gate {gate} references {qubit} but the register has {num_qubits} qubits")]
    OutOfRangeQubit {
        /// Name of the offending gate kind.
        gate: &'static str,
        /// The out-of-range qubit.
        qubit: QubitId,
        /// Size of the register.
        num_qubits: usize,
    },

    /// Requested qubit count exceeds the supported maximum.
    #[error("circuit with {requested} qubits exceeds the maximum of {max}")]
    CircuitTooLarge {
        /// The requested qubit count.
        requested: usize,
        /// The supported maximum.
        max: usize,
    },

    /// A DAG operation referenced an unknown node id.
    #[error("node {id} not found in DAG")]
    NodeNotFound {
        /// The unknown id.
        id: GateId,
    },

    /// The DAG contains a cycle. This is an internal invariant violation
    /// and never arises from correct caller use.
    #[error("DAG contains a cycle")]
    CycleDetected,
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
