//! OpenQASM to Qiskit Python translation
//!
//! Turns a loaded [`qasm2py_ir::Circuit`] into the source of a Python
//! program that rebuilds it with Qiskit's `QuantumCircuit` API.
//!
//! # Output Layout
//!
//! ```text
//! from qiskit import QuantumCircuit          # unless imports are disabled
//!
//! def build_bell():                          # one per custom gate
//!     g = QuantumCircuit(2, name='bell')
//!     g.h(0)
//!     g.cx(0, 1)
//!     return g.to_gate()
//!
//! qc = QuantumCircuit(2, 2)
//!
//! qc.append(build_bell(), [0, 1])
//! qc.measure(0, 0)
//! ```
//!
//! Builder functions appear in depth-first discovery order, each at most
//! once. Gates Qiskit has no call for are kept as
//! `# Unsupported gate: ...` comments instead of failing the translation.
//!
//! # Example
//!
//! ```rust
//! use qasm2py_codegen::{TranslateOptions, translate};
//!
//! let qasm = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0], q[1];
//!     measure q -> c;
//! "#;
//!
//! let options = TranslateOptions::new().with_imports(false);
//! let python = translate(qasm, &options).unwrap();
//! assert_eq!(
//!     python,
//!     "qc = QuantumCircuit(2, 2)\n\nqc.h(0)\nqc.cx(0, 1)\nqc.measure(0, 0)\nqc.measure(1, 1)"
//! );
//! ```

mod assemble;
mod collect;
mod emit;
mod format;
mod options;
mod primitives;

pub use assemble::{translate, translate_circuit};
pub use collect::{CustomGateTable, collect_custom_gates};
pub use emit::{Shape, classify, emit_instruction};
pub use format::{SymbolNames, python_expr, python_float, python_identifier};
pub use options::{DEFAULT_VARIABLE_NAME, TranslateOptions};
pub use primitives::{PRIMITIVE_GATES, is_primitive};
