//! Gate kinds and the immutable gate value type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::qubit::{GateId, QubitId};

/// The closed set of gate kinds understood by the compiler.
///
/// The set is partitioned into Clifford singletons (`H`, `X`, `Y`, `Z`,
/// `S`, `Sdg`, `T`, `Tdg`), parameterized single-qubit rotations (`Rx`,
/// `Ry`, `Rz`), and two-qubit gates (`Cx`, `Cz`, `Swap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around the X axis.
    Rx,
    /// Rotation around the Y axis.
    Ry,
    /// Rotation around the Z axis.
    Rz,
    /// Controlled-X (CNOT) gate. Operands are (control, target).
    Cx,
    /// Controlled-Z gate. Stored as (control, target); symmetric in effect.
    Cz,
    /// SWAP gate. The operand order carries no meaning.
    Swap,
}

impl GateKind {
    /// Get the wire-stable name of this kind.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::H => "H",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::S => "S",
            GateKind::Sdg => "Sdg",
            GateKind::T => "T",
            GateKind::Tdg => "Tdg",
            GateKind::Rx => "Rx",
            GateKind::Ry => "Ry",
            GateKind::Rz => "Rz",
            GateKind::Cx => "CNOT",
            GateKind::Cz => "CZ",
            GateKind::Swap => "SWAP",
        }
    }

    /// Parse a wire name. `CNOT` and `CX` name the same kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "H" => Some(GateKind::H),
            "X" => Some(GateKind::X),
            "Y" => Some(GateKind::Y),
            "Z" => Some(GateKind::Z),
            "S" => Some(GateKind::S),
            "Sdg" => Some(GateKind::Sdg),
            "T" => Some(GateKind::T),
            "Tdg" => Some(GateKind::Tdg),
            "Rx" => Some(GateKind::Rx),
            "Ry" => Some(GateKind::Ry),
            "Rz" => Some(GateKind::Rz),
            "CNOT" | "CX" => Some(GateKind::Cx),
            "CZ" => Some(GateKind::Cz),
            "SWAP" => Some(GateKind::Swap),
            _ => None,
        }
    }

    /// Get the number of qubits this kind acts on (1 or 2).
    #[inline]
    pub fn arity(&self) -> usize {
        match self {
            GateKind::H
            | GateKind::X
            | GateKind::Y
            | GateKind::Z
            | GateKind::S
            | GateKind::Sdg
            | GateKind::T
            | GateKind::Tdg
            | GateKind::Rx
            | GateKind::Ry
            | GateKind::Rz => 1,
            GateKind::Cx | GateKind::Cz | GateKind::Swap => 2,
        }
    }

    /// Check if this kind carries an angle parameter.
    #[inline]
    pub fn is_parameterized(&self) -> bool {
        matches!(self, GateKind::Rx | GateKind::Ry | GateKind::Rz)
    }

    /// Check if this kind is self-inverse.
    #[inline]
    pub fn is_hermitian(&self) -> bool {
        matches!(
            self,
            GateKind::H
                | GateKind::X
                | GateKind::Y
                | GateKind::Z
                | GateKind::Cx
                | GateKind::Cz
                | GateKind::Swap
        )
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable gate value: kind, ordered operands, optional angle, and
/// an id assigned by the owning circuit or DAG.
///
/// Equality ignores the id and compares angles bit-exactly: two angles
/// that agree mod 2π but differ in representation compare unequal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    kind: GateKind,
    qubits: Vec<QubitId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<GateId>,
}

impl Gate {
    /// Create a validated gate.
    ///
    /// Fails with [`IrError::InvalidGate`] when the operand count does not
    /// match the kind's arity, when a parameterized kind is missing its
    /// angle (or a non-parameterized kind carries one), or when a
    /// two-qubit gate names the same operand twice.
    pub fn new(kind: GateKind, qubits: Vec<QubitId>, angle: Option<f64>) -> IrResult<Self> {
        if qubits.len() != kind.arity() {
            return Err(IrError::InvalidGate {
                gate: kind.name(),
                reason: format!("expected {} operands, got {}", kind.arity(), qubits.len()),
            });
        }
        if kind.is_parameterized() != angle.is_some() {
            let reason = if kind.is_parameterized() {
                "rotation gate requires an angle".to_string()
            } else {
                "gate does not take an angle".to_string()
            };
            return Err(IrError::InvalidGate {
                gate: kind.name(),
                reason,
            });
        }
        if kind.arity() == 2 && qubits[0] == qubits[1] {
            return Err(IrError::InvalidGate {
                gate: kind.name(),
                reason: format!("operands must be distinct, got {} twice", qubits[0]),
            });
        }
        Ok(Self {
            kind,
            qubits,
            angle,
            id: None,
        })
    }

    /// Hadamard gate on `qubit`.
    pub fn h(qubit: QubitId) -> Self {
        Self::single(GateKind::H, qubit)
    }

    /// Pauli-X gate on `qubit`.
    pub fn x(qubit: QubitId) -> Self {
        Self::single(GateKind::X, qubit)
    }

    /// Pauli-Y gate on `qubit`.
    pub fn y(qubit: QubitId) -> Self {
        Self::single(GateKind::Y, qubit)
    }

    /// Pauli-Z gate on `qubit`.
    pub fn z(qubit: QubitId) -> Self {
        Self::single(GateKind::Z, qubit)
    }

    /// S gate on `qubit`.
    pub fn s(qubit: QubitId) -> Self {
        Self::single(GateKind::S, qubit)
    }

    /// S-dagger gate on `qubit`.
    pub fn sdg(qubit: QubitId) -> Self {
        Self::single(GateKind::Sdg, qubit)
    }

    /// T gate on `qubit`.
    pub fn t(qubit: QubitId) -> Self {
        Self::single(GateKind::T, qubit)
    }

    /// T-dagger gate on `qubit`.
    pub fn tdg(qubit: QubitId) -> Self {
        Self::single(GateKind::Tdg, qubit)
    }

    /// Rx rotation by `angle` radians on `qubit`.
    pub fn rx(qubit: QubitId, angle: f64) -> Self {
        Self::rotation(GateKind::Rx, qubit, angle)
    }

    /// Ry rotation by `angle` radians on `qubit`.
    pub fn ry(qubit: QubitId, angle: f64) -> Self {
        Self::rotation(GateKind::Ry, qubit, angle)
    }

    /// Rz rotation by `angle` radians on `qubit`.
    pub fn rz(qubit: QubitId, angle: f64) -> Self {
        Self::rotation(GateKind::Rz, qubit, angle)
    }

    /// CNOT gate. Fails if `control == target`.
    pub fn cnot(control: QubitId, target: QubitId) -> IrResult<Self> {
        Self::new(GateKind::Cx, vec![control, target], None)
    }

    /// Controlled-Z gate. Fails if `control == target`.
    pub fn cz(control: QubitId, target: QubitId) -> IrResult<Self> {
        Self::new(GateKind::Cz, vec![control, target], None)
    }

    /// SWAP gate. Fails if `q1 == q2`.
    pub fn swap(q1: QubitId, q2: QubitId) -> IrResult<Self> {
        Self::new(GateKind::Swap, vec![q1, q2], None)
    }

    fn single(kind: GateKind, qubit: QubitId) -> Self {
        Self {
            kind,
            qubits: vec![qubit],
            angle: None,
            id: None,
        }
    }

    fn rotation(kind: GateKind, qubit: QubitId, angle: f64) -> Self {
        Self {
            kind,
            qubits: vec![qubit],
            angle: Some(angle),
            id: None,
        }
    }

    /// Get the gate kind.
    #[inline]
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Get the ordered qubit operands.
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Get the rotation angle, if the kind is parameterized.
    #[inline]
    pub fn angle(&self) -> Option<f64> {
        self.angle
    }

    /// Get the id assigned by the owning circuit or DAG, if any.
    #[inline]
    pub fn id(&self) -> Option<GateId> {
        self.id
    }

    /// Get the number of qubits this gate acts on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.kind.arity()
    }

    /// Check if this is a two-qubit gate.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        self.kind.arity() == 2
    }

    /// Get the largest operand index.
    pub fn max_qubit(&self) -> QubitId {
        *self.qubits.iter().max().expect("gate has at least one operand")
    }

    /// Rebuild this gate on new operands, keeping kind and angle.
    ///
    /// The id is cleared; the receiving container assigns a fresh one.
    /// Used by routing to remap logical operands to physical qubits.
    pub fn on_qubits(&self, qubits: Vec<QubitId>) -> IrResult<Self> {
        Self::new(self.kind, qubits, self.angle)
    }

    pub(crate) fn set_id(&mut self, id: GateId) {
        self.id = Some(id);
    }

    pub(crate) fn set_angle(&mut self, angle: f64) {
        debug_assert!(self.kind.is_parameterized());
        self.angle = Some(angle);
    }
}

impl PartialEq for Gate {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.qubits == other.qubits
            && match (self.angle, other.angle) {
                (Some(a), Some(b)) => a.to_bits() == b.to_bits(),
                (None, None) => true,
                _ => false,
            }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.angle {
            Some(angle) => write!(f, "{}({:.4})", self.kind, angle)?,
            None => write!(f, "{}", self.kind)?,
        }
        for (i, q) in self.qubits.iter().enumerate() {
            if i == 0 {
                write!(f, " {q}")?;
            } else {
                write!(f, ", {q}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_hadamard_creates_correct_gate() {
        let h = Gate::h(QubitId(0));
        assert_eq!(h.kind(), GateKind::H);
        assert_eq!(h.num_qubits(), 1);
        assert_eq!(h.qubits(), &[QubitId(0)]);
        assert!(!h.kind().is_parameterized());
        assert!(h.id().is_none());
    }

    #[test]
    fn test_cnot_operand_order() {
        let cx = Gate::cnot(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(cx.kind(), GateKind::Cx);
        assert_eq!(cx.num_qubits(), 2);
        assert_eq!(cx.qubits()[0], QubitId(0)); // control
        assert_eq!(cx.qubits()[1], QubitId(1)); // target
    }

    #[test]
    fn test_two_qubit_gates_reject_equal_operands() {
        assert!(Gate::cnot(QubitId(0), QubitId(0)).is_err());
        assert!(Gate::cz(QubitId(1), QubitId(1)).is_err());
        assert!(Gate::swap(QubitId(2), QubitId(2)).is_err());
    }

    #[test]
    fn test_rotation_gates_carry_angles() {
        let rx = Gate::rx(QubitId(0), 1.0);
        let ry = Gate::ry(QubitId(0), 2.0);
        let rz = Gate::rz(QubitId(0), PI / 4.0);

        assert_eq!(rx.angle(), Some(1.0));
        assert_eq!(ry.angle(), Some(2.0));
        assert_eq!(rz.angle(), Some(PI / 4.0));
        assert!(rz.kind().is_parameterized());
    }

    #[test]
    fn test_new_rejects_arity_mismatch() {
        let err = Gate::new(GateKind::Cx, vec![QubitId(0)], None);
        assert!(matches!(err, Err(IrError::InvalidGate { gate: "CNOT", .. })));
    }

    #[test]
    fn test_new_rejects_parameter_mismatch() {
        assert!(Gate::new(GateKind::Rz, vec![QubitId(0)], None).is_err());
        assert!(Gate::new(GateKind::H, vec![QubitId(0)], Some(1.0)).is_err());
    }

    #[test]
    fn test_hermitian_table() {
        for kind in [
            GateKind::H,
            GateKind::X,
            GateKind::Y,
            GateKind::Z,
            GateKind::Cx,
            GateKind::Cz,
            GateKind::Swap,
        ] {
            assert!(kind.is_hermitian(), "{kind} should be hermitian");
        }
        for kind in [
            GateKind::S,
            GateKind::Sdg,
            GateKind::T,
            GateKind::Tdg,
            GateKind::Rx,
            GateKind::Ry,
            GateKind::Rz,
        ] {
            assert!(!kind.is_hermitian(), "{kind} should not be hermitian");
        }
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(GateKind::Cx.name(), "CNOT");
        assert_eq!(GateKind::from_name("CNOT"), Some(GateKind::Cx));
        assert_eq!(GateKind::from_name("CX"), Some(GateKind::Cx));
        assert_eq!(GateKind::from_name("Sdg"), Some(GateKind::Sdg));
        assert_eq!(GateKind::from_name("bogus"), None);
    }

    #[test]
    fn test_equality_ignores_id() {
        let mut a = Gate::h(QubitId(0));
        let b = Gate::h(QubitId(0));
        a.set_id(GateId(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_is_bit_exact_on_angles() {
        let a = Gate::rz(QubitId(0), PI);
        let b = Gate::rz(QubitId(0), PI);
        assert_eq!(a, b);

        // Numerically equal mod 2π, but different bits: unequal on purpose.
        let c = Gate::rz(QubitId(0), PI + 2.0 * PI);
        assert_ne!(a, c);

        let pos_zero = Gate::rz(QubitId(0), 0.0);
        let neg_zero = Gate::rz(QubitId(0), -0.0);
        assert_ne!(pos_zero, neg_zero);
    }

    #[test]
    fn test_max_qubit() {
        assert_eq!(Gate::h(QubitId(5)).max_qubit(), QubitId(5));
        assert_eq!(
            Gate::cnot(QubitId(2), QubitId(7)).unwrap().max_qubit(),
            QubitId(7)
        );
        assert_eq!(
            Gate::swap(QubitId(10), QubitId(3)).unwrap().max_qubit(),
            QubitId(10)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Gate::h(QubitId(0))), "H q0");
        assert_eq!(
            format!("{}", Gate::cnot(QubitId(0), QubitId(1)).unwrap()),
            "CNOT q0, q1"
        );
        assert_eq!(
            format!("{}", Gate::rz(QubitId(2), PI / 2.0)),
            "Rz(1.5708) q2"
        );
    }

    #[test]
    fn test_on_qubits_remaps_and_clears_id() {
        let mut cx = Gate::cnot(QubitId(0), QubitId(3)).unwrap();
        cx.set_id(GateId(9));
        let moved = cx.on_qubits(vec![QubitId(2), QubitId(3)]).unwrap();
        assert_eq!(moved.kind(), GateKind::Cx);
        assert_eq!(moved.qubits(), &[QubitId(2), QubitId(3)]);
        assert!(moved.id().is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let gate = Gate::rz(QubitId(1), 0.25);
        let json = serde_json::to_string(&gate).unwrap();
        let back: Gate = serde_json::from_str(&json).unwrap();
        assert_eq!(gate, back);
    }
}
