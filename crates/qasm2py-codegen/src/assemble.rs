//! Assembly of a complete Python program from a circuit.

use qasm2py_ir::{Circuit, Instruction};
use qasm2py_qasm::{LoadResult, load_circuit};
use tracing::{debug, info, instrument};

use crate::collect::collect_custom_gates;
use crate::emit::emit_instruction;
use crate::format::{SymbolNames, python_str};
use crate::options::TranslateOptions;

/// Variable holding the sub-circuit inside a builder function.
const BUILDER_VARIABLE: &str = "g";
const BUILDER_INDENT: &str = "    ";

/// Translate OpenQASM source text into a Qiskit Python program.
///
/// Fails only when the source cannot be loaded; instructions without a
/// Qiskit counterpart become comments in the output.
///
/// # Example
///
/// ```
/// use qasm2py_codegen::{TranslateOptions, translate};
///
/// let source = "OPENQASM 3.0;\nqubit[2] q;\nh q[0];\ncx q[0], q[1];";
/// let python = translate(source, &TranslateOptions::default()).unwrap();
/// assert!(python.ends_with("qc.h(0)\nqc.cx(0, 1)"));
/// ```
#[instrument(skip(source, options))]
pub fn translate(source: &str, options: &TranslateOptions) -> LoadResult<String> {
    let circuit = load_circuit(source)?;
    let python = translate_circuit(&circuit, options);
    info!(
        "Translated {} instructions on {} qubits into {} lines of Python",
        circuit.len(),
        circuit.num_qubits(),
        python.lines().count()
    );
    Ok(python)
}

/// Translate an already loaded circuit.
pub fn translate_circuit(circuit: &Circuit, options: &TranslateOptions) -> String {
    let var = options.variable_name();
    let custom_gates = collect_custom_gates(circuit.instructions());
    let symbols = circuit.free_symbols();
    let reserved = [var, BUILDER_VARIABLE]
        .into_iter()
        .map(str::to_string)
        .chain(custom_gates.names().map(|name| format!("build_{name}")));
    let names = SymbolNames::new(symbols.iter().map(String::as_str), reserved);
    let mut lines = Vec::new();

    if options.include_imports {
        lines.push("from qiskit import QuantumCircuit".to_string());
        if !names.is_empty() {
            lines.push("from qiskit.circuit import Parameter".to_string());
        }
        lines.push(String::new());
    }

    for (name, definition) in custom_gates.iter() {
        debug!(
            "Emitting builder for '{name}' ({} instructions)",
            definition.len()
        );
        lines.push(format!("def build_{name}():"));
        lines.push(format!(
            "{BUILDER_INDENT}{BUILDER_VARIABLE} = QuantumCircuit({}, name={})",
            definition.num_qubits(),
            python_str(name)
        ));
        emit_body(definition, BUILDER_VARIABLE, BUILDER_INDENT, &names, &mut lines);
        lines.push(format!("{BUILDER_INDENT}return {BUILDER_VARIABLE}.to_gate()"));
        lines.push(String::new());
    }

    if !names.is_empty() {
        for (symbol, variable) in names.iter() {
            lines.push(format!("{variable} = Parameter({})", python_str(symbol)));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "{var} = QuantumCircuit({}, {})",
        circuit.num_qubits(),
        circuit.num_clbits()
    ));
    lines.push(String::new());
    emit_body(circuit, var, "", &names, &mut lines);

    lines.join("\n")
}

/// Emit every instruction of `circuit`, operands resolved against its own
/// registers.
fn emit_body(
    circuit: &Circuit,
    var: &str,
    indent: &str,
    names: &SymbolNames,
    lines: &mut Vec<String>,
) {
    for instruction in circuit.instructions() {
        let (qubits, clbits) = resolve_operands(circuit, instruction);
        lines.extend(emit_instruction(
            instruction,
            var,
            &qubits,
            &clbits,
            indent,
            names,
        ));
    }
}

fn resolve_operands(circuit: &Circuit, instruction: &Instruction) -> (Vec<usize>, Vec<usize>) {
    let qubits = instruction
        .qubits
        .iter()
        .filter_map(|&q| circuit.qubit_index(q))
        .collect();
    let clbits = instruction
        .clbits
        .iter()
        .filter_map(|&c| circuit.clbit_index(c))
        .collect();
    (qubits, clbits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qasm2py_ir::{ClbitId, CustomGate, ParameterExpression, QubitId};

    #[test]
    fn test_bell_program() {
        let mut circuit = Circuit::with_size("main", 2, 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.measure(QubitId(1), ClbitId(1)).unwrap();

        let python = translate_circuit(&circuit, &TranslateOptions::default());
        assert_eq!(
            python,
            "from qiskit import QuantumCircuit\n\
             \n\
             qc = QuantumCircuit(2, 2)\n\
             \n\
             qc.h(0)\n\
             qc.cx(0, 1)\n\
             qc.measure(0, 0)\n\
             qc.measure(1, 1)"
        );
    }

    #[test]
    fn test_builder_block() {
        let mut body = Circuit::with_size("bell", 2, 0);
        body.h(QubitId(0)).unwrap();
        body.cx(QubitId(0), QubitId(1)).unwrap();
        let bell = CustomGate::new("bell", 0).with_definition(body);

        let mut circuit = Circuit::with_size("main", 3, 0);
        circuit.gate(bell, &[QubitId(2), QubitId(1)]).unwrap();

        let options = TranslateOptions::new()
            .with_variable_name("circ")
            .with_imports(false);
        assert_eq!(
            translate_circuit(&circuit, &options),
            "def build_bell():\n\
             \x20   g = QuantumCircuit(2, name='bell')\n\
             \x20   g.h(0)\n\
             \x20   g.cx(0, 1)\n\
             \x20   return g.to_gate()\n\
             \n\
             circ = QuantumCircuit(3, 0)\n\
             \n\
             circ.append(build_bell(), [2, 1])"
        );
    }

    #[test]
    fn test_parameter_declarations() {
        let mut circuit = Circuit::with_size("main", 1, 0);
        circuit
            .rz(ParameterExpression::symbol("theta"), QubitId(0))
            .unwrap();
        circuit
            .rx(ParameterExpression::symbol("lambda"), QubitId(0))
            .unwrap();

        let python = translate_circuit(&circuit, &TranslateOptions::default());
        assert_eq!(
            python,
            "from qiskit import QuantumCircuit\n\
             from qiskit.circuit import Parameter\n\
             \n\
             lambda_ = Parameter('lambda')\n\
             theta = Parameter('theta')\n\
             \n\
             qc = QuantumCircuit(1, 0)\n\
             \n\
             qc.rz(theta, 0)\n\
             qc.rx(lambda_, 0)"
        );
    }

    #[test]
    fn test_empty_circuit() {
        let circuit = Circuit::with_size("main", 0, 0);
        let options = TranslateOptions::new().with_imports(false);
        assert_eq!(translate_circuit(&circuit, &options), "qc = QuantumCircuit(0, 0)\n");
    }
}
