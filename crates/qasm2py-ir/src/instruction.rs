//! Circuit instructions combining operations with operands.

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::gate::Gate;
use crate::parameter::ParameterExpression;
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(Gate),
    /// Measurement of qubits into classical bits, pairwise.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (synchronization point).
    Barrier,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on. For controlled gates the
    /// controls come first.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction writes (measure only).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a reset instruction.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Operation name, e.g. `h`, `measure`, `cry` or a custom gate name.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }

    /// Parameters in call order. Empty for non-gate instructions.
    pub fn params(&self) -> Vec<&ParameterExpression> {
        match &self.kind {
            InstructionKind::Gate(g) => g.kind.parameters(),
            _ => vec![],
        }
    }

    /// The sub-circuit this operation expands into, if any.
    pub fn definition(&self) -> Option<&Circuit> {
        match &self.kind {
            InstructionKind::Gate(g) => g.definition(),
            _ => None,
        }
    }

    /// Control count and base operation name for controlled gates.
    pub fn control(&self) -> Option<(u32, &str)> {
        match &self.kind {
            InstructionKind::Gate(g) => g
                .control
                .as_ref()
                .map(|c| (c.num_ctrl_qubits, g.kind.name())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    #[test]
    fn test_names() {
        assert_eq!(Instruction::measure(QubitId(0), ClbitId(0)).name(), "measure");
        assert_eq!(Instruction::barrier([QubitId(0)]).name(), "barrier");
        let cry = Instruction::gate(
            Gate::controlled(StandardGate::Ry(0.5.into()), 1),
            [QubitId(0), QubitId(1)],
        );
        assert_eq!(cry.name(), "cry");
        assert_eq!(cry.control(), Some((1, "ry")));
        assert_eq!(cry.params().len(), 1);
    }

    #[test]
    fn test_plain_gate_has_no_control() {
        let cx = Instruction::gate(StandardGate::CX, [QubitId(0), QubitId(1)]);
        assert_eq!(cx.name(), "cx");
        assert!(cx.control().is_none());
        assert!(cx.definition().is_none());
    }
}
