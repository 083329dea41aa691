//! Inspect command implementation.

use anyhow::{Context, Result};
use console::style;

use qasm2py_ir::Circuit;
use qasm2py_qasm::{Dialect, detect_dialect, emit, load_circuit};

use super::common::{input_label, read_input, write_output};

/// Execute the inspect command.
pub fn execute(input: Option<&str>, format: &str) -> Result<()> {
    let source = read_input(input)?;
    let circuit = load_circuit(&source)?;

    if let Some(dialect) = detect_dialect(&source) {
        eprintln!(
            "{} {}: {}, {} qubits, {} clbits, {} instructions",
            style("→").cyan().bold(),
            style(input_label(input)).green(),
            dialect,
            circuit.num_qubits(),
            circuit.num_clbits(),
            circuit.len()
        );
    }

    write_output(None, &render(&circuit, format)?)
}

/// Render a circuit in one of the supported output formats.
fn render(circuit: &Circuit, format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "json" => serde_json::to_string_pretty(circuit).context("Failed to serialize circuit"),
        "qasm2" => Ok(emit(circuit, Dialect::Qasm2)),
        "qasm3" | "qasm" => Ok(emit(circuit, Dialect::Qasm3)),
        other => anyhow::bail!("Unknown format: '{other}'. Available: json, qasm2, qasm3"),
    }
}
