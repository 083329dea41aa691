//! Qubit and classical bit handles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a qubit inside one [`Circuit`](crate::Circuit).
///
/// Handles are allocated densely, so `QubitId(i)` is the i-th qubit of the
/// circuit that created it. A handle is meaningless outside its circuit:
/// every gate definition has its own register starting at `QubitId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

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

/// Handle of a classical bit inside one [`Circuit`](crate::Circuit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// Where a bit came from in the source program, e.g. `q[3]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterSlot {
    /// Name of the declared register.
    pub register: String,
    /// Position within that register.
    pub index: u32,
}

/// A qubit with optional source register membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    pub id: QubitId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<RegisterSlot>,
}

impl Qubit {
    /// Create an anonymous qubit.
    pub fn new(id: QubitId) -> Self {
        Self { id, slot: None }
    }

    /// Create a qubit that belongs to a named register.
    pub fn in_register(id: QubitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            slot: Some(RegisterSlot {
                register: register.into(),
                index,
            }),
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(slot) => write!(f, "{}[{}]", slot.register, slot.index),
            None => write!(f, "{}", self.id),
        }
    }
}

/// A classical bit with optional source register membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clbit {
    pub id: ClbitId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<RegisterSlot>,
}

impl Clbit {
    /// Create an anonymous classical bit.
    pub fn new(id: ClbitId) -> Self {
        Self { id, slot: None }
    }

    /// Create a classical bit that belongs to a named register.
    pub fn in_register(id: ClbitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            slot: Some(RegisterSlot {
                register: register.into(),
                index,
            }),
        }
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(slot) => write!(f, "{}[{}]", slot.register, slot.index),
            None => write!(f, "{}", self.id),
        }
    }
}
