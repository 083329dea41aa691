//! Quantum gate types.

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::parameter::ParameterExpression;

/// Gates the target circuit-building API provides natively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit, no parameters
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit, parameterized
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
    /// Phase gate.
    P(ParameterExpression),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),
    /// Legacy phase gate U1(λ).
    U1(ParameterExpression),
    /// Legacy U2(φ, λ).
    U2(ParameterExpression, ParameterExpression),
    /// Legacy U3(θ, φ, λ).
    U3(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),

    // Two-qubit
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
    /// Controlled phase gate.
    CP(ParameterExpression),
    /// Controlled rotation around X.
    CRx(ParameterExpression),
    /// Controlled rotation around Y.
    CRy(ParameterExpression),
    /// Controlled rotation around Z.
    CRz(ParameterExpression),
    /// Controlled U(θ, φ, λ, γ).
    CU(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),
    /// ZZ rotation gate.
    RZZ(ParameterExpression),

    // Three or more qubits
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
    /// Multi-controlled X with an arbitrary number of controls.
    MCX {
        /// Number of control qubits preceding the target.
        num_ctrl_qubits: u32,
    },
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(..) => "u",
            StandardGate::U1(_) => "u1",
            StandardGate::U2(..) => "u2",
            StandardGate::U3(..) => "u3",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::CP(_) => "cp",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CU(..) => "cu",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
            StandardGate::MCX { .. } => "mcx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(..)
            | StandardGate::U1(_)
            | StandardGate::U2(..)
            | StandardGate::U3(..) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::Swap
            | StandardGate::CP(_)
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CU(..)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,

            StandardGate::MCX { num_ctrl_qubits } => num_ctrl_qubits + 1,
        }
    }

    /// Get parameters of this gate, in call order.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::U1(p)
            | StandardGate::CP(p)
            | StandardGate::CRx(p)
            | StandardGate::CRy(p)
            | StandardGate::CRz(p)
            | StandardGate::RZZ(p) => vec![p],

            StandardGate::U2(a, b) => vec![a, b],
            StandardGate::U(a, b, c) | StandardGate::U3(a, b, c) => vec![a, b, c],
            StandardGate::CU(a, b, c, d) => vec![a, b, c, d],

            _ => vec![],
        }
    }
}

/// A user-defined (or library-defined) composite gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Actual parameter values of this call.
    pub params: Vec<ParameterExpression>,
    /// Expansion into simpler instructions, with parameters already bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<Box<Circuit>>,
}

impl CustomGate {
    /// Create a new custom gate without a definition.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            params: vec![],
            definition: None,
        }
    }

    /// Add parameters to the gate.
    #[must_use]
    pub fn with_params(mut self, params: Vec<ParameterExpression>) -> Self {
        self.params = params;
        self
    }

    /// Attach the expansion of this gate. The qubit count follows the
    /// definition's register.
    #[must_use]
    pub fn with_definition(mut self, definition: Circuit) -> Self {
        self.num_qubits = u32::try_from(definition.num_qubits()).unwrap_or(u32::MAX);
        self.definition = Some(Box::new(definition));
        self
    }
}

/// Either a standard gate or a custom gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A custom composite gate.
    Custom(CustomGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Custom(g) => g.num_qubits,
        }
    }

    /// Get the parameters.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            GateKind::Standard(g) => g.parameters(),
            GateKind::Custom(g) => g.params.iter().collect(),
        }
    }

    /// Get the expansion, if this is a custom gate that has one.
    pub fn definition(&self) -> Option<&Circuit> {
        match self {
            GateKind::Standard(_) => None,
            GateKind::Custom(g) => g.definition.as_deref(),
        }
    }
}

/// Marks a gate as the controlled version of its base operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInfo {
    /// Number of control qubits. They precede the base gate's operands.
    pub num_ctrl_qubits: u32,
    /// Name of the composite operation, e.g. `cy` or `c3x`.
    pub name: String,
}

impl ControlInfo {
    fn for_base(base: &str, num_ctrl_qubits: u32) -> Self {
        let name = match (num_ctrl_qubits, base) {
            (1, _) => format!("c{base}"),
            (2, "x") => "ccx".to_string(),
            (k, _) => format!("c{k}{base}"),
        };
        Self {
            num_ctrl_qubits,
            name,
        }
    }
}

/// A gate as it appears in an instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The operation. For controlled gates this is the base operation.
    pub kind: GateKind,
    /// Present when the gate was produced by a control modifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<ControlInfo>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            control: None,
        }
    }

    /// Create a new gate from a custom gate.
    pub fn custom(gate: CustomGate) -> Self {
        Self {
            kind: GateKind::Custom(gate),
            control: None,
        }
    }

    /// Wrap `base` with `num_ctrl_qubits` leading controls.
    pub fn controlled(base: impl Into<GateKind>, num_ctrl_qubits: u32) -> Self {
        let kind = base.into();
        let control = ControlInfo::for_base(kind.name(), num_ctrl_qubits);
        Self {
            kind,
            control: Some(control),
        }
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        match &self.control {
            Some(control) => &control.name,
            None => self.kind.name(),
        }
    }

    /// Get the number of qubits, controls included.
    pub fn num_qubits(&self) -> u32 {
        let controls = self.control.as_ref().map_or(0, |c| c.num_ctrl_qubits);
        self.kind.num_qubits() + controls
    }

    /// Expansion of the gate. Controlled gates never expose one: their
    /// controlled expansion is not materialized.
    pub fn definition(&self) -> Option<&Circuit> {
        match self.control {
            Some(_) => None,
            None => self.kind.definition(),
        }
    }
}

impl From<StandardGate> for GateKind {
    fn from(gate: StandardGate) -> Self {
        GateKind::Standard(gate)
    }
}

impl From<CustomGate> for GateKind {
    fn from(gate: CustomGate) -> Self {
        GateKind::Custom(gate)
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::custom(gate)
    }
}
