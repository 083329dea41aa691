//! OpenQASM emitter for serializing circuits.
//!
//! The output is flat: custom gate calls are replaced by their definitions
//! and every operand is an element of a single `q` / `c` register.

use qasm2py_ir::{Circuit, Gate, Instruction, InstructionKind};

use crate::library;
use crate::loader::Dialect;

/// Emit a circuit as OpenQASM source in the given dialect.
pub fn emit(circuit: &Circuit, dialect: Dialect) -> String {
    let mut emitter = Emitter::new(dialect);
    emitter.emit_circuit(circuit);
    emitter.output
}

struct Emitter {
    output: String,
    dialect: Dialect,
}

impl Emitter {
    fn new(dialect: Dialect) -> Self {
        Self {
            output: String::new(),
            dialect,
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) {
        match self.dialect {
            Dialect::Qasm2 => {
                self.writeln("OPENQASM 2.0;");
                self.writeln("include \"qelib1.inc\";");
            }
            Dialect::Qasm3 => {
                self.writeln("OPENQASM 3.0;");
                self.writeln("include \"stdgates.inc\";");
            }
        }
        self.writeln("");

        // OpenQASM 2 has no way to declare a free parameter.
        let symbols = circuit.free_symbols();
        if self.dialect == Dialect::Qasm3 && !symbols.is_empty() {
            for symbol in &symbols {
                self.writeln(&format!("input float {symbol};"));
            }
            self.writeln("");
        }

        let num_qubits = circuit.num_qubits();
        let num_clbits = circuit.num_clbits();
        if num_qubits > 0 {
            self.writeln(&match self.dialect {
                Dialect::Qasm2 => format!("qreg q[{num_qubits}];"),
                Dialect::Qasm3 => format!("qubit[{num_qubits}] q;"),
            });
        }
        if num_clbits > 0 {
            self.writeln(&match self.dialect {
                Dialect::Qasm2 => format!("creg c[{num_clbits}];"),
                Dialect::Qasm3 => format!("bit[{num_clbits}] c;"),
            });
        }
        if num_qubits > 0 || num_clbits > 0 {
            self.writeln("");
        }

        let wires: Vec<usize> = (0..num_qubits).collect();
        self.emit_body(circuit, &wires);
    }

    /// Emit the instructions of `circuit`, whose i-th qubit is wire
    /// `wires[i]` of the top-level register.
    fn emit_body(&mut self, circuit: &Circuit, wires: &[usize]) {
        for instruction in circuit.instructions() {
            let qubits: Vec<usize> = instruction
                .qubits
                .iter()
                .filter_map(|&q| circuit.qubit_index(q))
                .filter_map(|i| wires.get(i).copied())
                .collect();
            self.emit_instruction(circuit, instruction, &qubits);
        }
    }

    fn emit_instruction(&mut self, circuit: &Circuit, instruction: &Instruction, qubits: &[usize]) {
        let operands = format_qubits(qubits);
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                if let Some(definition) = gate.definition() {
                    self.emit_body(definition, qubits);
                } else {
                    self.emit_gate(gate, &operands);
                }
            }

            InstructionKind::Measure => {
                let bit = instruction
                    .clbits
                    .first()
                    .and_then(|&c| circuit.clbit_index(c))
                    .unwrap_or_default();
                self.writeln(&match self.dialect {
                    Dialect::Qasm2 => format!("measure {operands} -> c[{bit}];"),
                    Dialect::Qasm3 => format!("c[{bit}] = measure {operands};"),
                });
            }

            InstructionKind::Reset => self.writeln(&format!("reset {operands};")),

            InstructionKind::Barrier => {
                if operands.is_empty() {
                    self.writeln("barrier;");
                } else {
                    self.writeln(&format!("barrier {operands};"));
                }
            }
        }
    }

    fn emit_gate(&mut self, gate: &Gate, operands: &str) {
        let params = gate
            .kind
            .parameters()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let call = |name: &str| {
            if params.is_empty() {
                name.to_string()
            } else {
                format!("{name}({params})")
            }
        };
        let base = gate.kind.name();

        let Some(control) = &gate.control else {
            self.writeln(&format!("{} {operands};", call(base)));
            return;
        };

        let line = match (self.dialect, control.num_ctrl_qubits) {
            (Dialect::Qasm3, 1) => format!("ctrl @ {} {operands};", call(base)),
            (Dialect::Qasm3, k) => format!("ctrl({k}) @ {} {operands};", call(base)),
            // No modifiers in OpenQASM 2: use the named controlled gate.
            (Dialect::Qasm2, k) => {
                let name = if base == "x" && k > 2 {
                    "mcx"
                } else {
                    control.name.as_str()
                };
                if library::is_standard_name(name) {
                    format!("{} {operands};", call(name))
                } else {
                    format!("// unsupported in OpenQASM 2: {} {operands};", call(name))
                }
            }
        };
        self.writeln(&line);
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn format_qubits(qubits: &[usize]) -> String {
    qubits
        .iter()
        .map(|q| format!("q[{q}]"))
        .collect::<Vec<_>>()
        .join(", ")
}
