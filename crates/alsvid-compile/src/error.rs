//! Error types for compilation and routing.

use alsvid_ir::IrError;
use thiserror::Error;

/// Errors that can occur during pass execution or routing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Routing was asked to place a circuit wider than the device.
    #[error("circuit has {logical} qubits but the topology only has {physical}")]
    IncompatibleSize {
        /// Logical register width.
        logical: usize,
        /// Physical register width.
        physical: usize,
    },

    /// A path was requested between unreachable physical qubits.
    #[error("no path exists between physical qubits {from} and {to}")]
    Disconnected {
        /// Source qubit.
        from: u32,
        /// Destination qubit.
        to: u32,
    },

    /// A topology constructor or edge refers to invalid parameters.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// An underlying IR operation failed.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
