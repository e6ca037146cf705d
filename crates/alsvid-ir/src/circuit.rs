//! Linear circuit representation and builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind};
use crate::qubit::{GateId, QubitId};

/// Maximum number of qubits a circuit may declare.
pub const MAX_QUBITS: usize = 30;

/// An ordered sequence of gates over a fixed qubit register.
///
/// The circuit is the linear form of the IR: the front-end produces one,
/// the pass pipeline consumes and re-emits one, and the router maps one
/// onto physical qubits. Gate ids are assigned on insertion and are
/// unique within the circuit but not stable across transformations that
/// rebuild it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: usize,
    gates: Vec<Gate>,
    next_gate_id: u64,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits.
    ///
    /// Fails with [`IrError::CircuitTooLarge`] when the count is 0 or
    /// exceeds [`MAX_QUBITS`].
    pub fn new(num_qubits: usize) -> IrResult<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(IrError::CircuitTooLarge {
                requested: num_qubits,
                max: MAX_QUBITS,
            });
        }
        Ok(Self {
            num_qubits,
            gates: vec![],
            next_gate_id: 0,
        })
    }

    /// Append a gate, assigning it a fresh id.
    ///
    /// Fails with [`IrError::OutOfRangeQubit`] when an operand lies
    /// beyond the register.
    pub fn add_gate(&mut self, mut gate: Gate) -> IrResult<GateId> {
        for &q in gate.qubits() {
            if q.index() >= self.num_qubits {
                return Err(IrError::OutOfRangeQubit {
                    gate: gate.kind().name(),
                    qubit: q,
                    num_qubits: self.num_qubits,
                });
            }
        }
        let id = GateId(self.next_gate_id);
        self.next_gate_id += 1;
        gate.set_id(id);
        self.gates.push(gate);
        Ok(id)
    }

    // =========================================================================
    // Fluent builders
    // =========================================================================

    /// Apply a Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::h(qubit))?;
        Ok(self)
    }

    /// Apply a Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::x(qubit))?;
        Ok(self)
    }

    /// Apply a Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::y(qubit))?;
        Ok(self)
    }

    /// Apply a Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::z(qubit))?;
        Ok(self)
    }

    /// Apply an S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::s(qubit))?;
        Ok(self)
    }

    /// Apply an S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::sdg(qubit))?;
        Ok(self)
    }

    /// Apply a T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::t(qubit))?;
        Ok(self)
    }

    /// Apply a T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::tdg(qubit))?;
        Ok(self)
    }

    /// Apply an Rx rotation.
    pub fn rx(&mut self, angle: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::rx(qubit, angle))?;
        Ok(self)
    }

    /// Apply an Ry rotation.
    pub fn ry(&mut self, angle: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::ry(qubit, angle))?;
        Ok(self)
    }

    /// Apply an Rz rotation.
    pub fn rz(&mut self, angle: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::rz(qubit, angle))?;
        Ok(self)
    }

    /// Apply a CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::cnot(control, target)?)?;
        Ok(self)
    }

    /// Apply a controlled-Z gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::cz(control, target)?)?;
        Ok(self)
    }

    /// Apply a SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.add_gate(Gate::swap(q1, q2)?)?;
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the number of gates.
    #[inline]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Check if the circuit has no gates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Get the gates in insertion order.
    #[inline]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Iterate over the gates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    /// Count gates of the given kind.
    pub fn count_gates(&self, kind: GateKind) -> usize {
        self.gates.iter().filter(|g| g.kind() == kind).count()
    }

    /// Count two-qubit gates.
    pub fn count_two_qubit_gates(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }

    /// Compute the circuit depth: the minimum number of time steps
    /// assuming independent gates run in parallel.
    pub fn depth(&self) -> usize {
        let mut qubit_depth = vec![0usize; self.num_qubits];
        let mut max_depth = 0;
        for gate in &self.gates {
            let d = 1 + gate
                .qubits()
                .iter()
                .map(|q| qubit_depth[q.index()])
                .max()
                .unwrap_or(0);
            for q in gate.qubits() {
                qubit_depth[q.index()] = d;
            }
            max_depth = max_depth.max(d);
        }
        max_depth
    }

    // =========================================================================
    // Prebuilt circuits
    // =========================================================================

    /// Bell-pair preparation: `H q0; CNOT q0, q1`.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new(2)?;
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(circuit)
    }

    /// GHZ-state preparation on `n` qubits: a Hadamard and a CNOT chain.
    pub fn ghz(n: usize) -> IrResult<Self> {
        let mut circuit = Self::new(n)?;
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId::from(i), QubitId::from(i + 1))?;
        }
        Ok(circuit)
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Gate;
    type IntoIter = std::slice::Iter<'a, Gate>;

    fn into_iter(self) -> Self::IntoIter {
        self.gates.iter()
    }
}
