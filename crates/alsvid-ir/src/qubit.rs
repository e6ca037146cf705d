//! Qubit and gate identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a circuit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Get the index as a `usize` for slice indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// Unique identifier of a gate within a circuit or DAG.
///
/// Ids are assigned on insertion and are never reused within a single
/// container lifetime. They are not stable across transformations that
/// rebuild the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GateId(pub u64);

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

impl From<u64> for GateId {
    fn from(id: u64) -> Self {
        GateId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(0)), "q0");
        assert_eq!(format!("{}", QubitId(17)), "q17");
    }

    #[test]
    fn test_gate_id_display() {
        assert_eq!(format!("{}", GateId(3)), "g3");
    }

    #[test]
    fn test_qubit_ordering() {
        assert!(QubitId(1) < QubitId(2));
        assert!(GateId(0) < GateId(1));
    }
}
