//! `OpenQASM` 2 and 3 loader for qasm2py
//!
//! Reads OpenQASM programs into a [`qasm2py_ir::Circuit`] and writes circuits
//! back out as flat OpenQASM.
//!
//! # Supported Features
//!
//! | Feature | OpenQASM 2 | OpenQASM 3 |
//! |---------|------------|------------|
//! | Registers | `qreg q[2];` `creg c[2];` | also `qubit[2] q;` `bit[2] c;` |
//! | Gate calls and broadcasting | `cx q, r;` | `cx q, r;` |
//! | Gate definitions | `gate g(a) x, y { ... }` | same |
//! | Measurement | `measure q -> c;` | also `c = measure q;` |
//! | Reset, barrier | ✅ | ✅ |
//! | Control modifiers | - | `ctrl @`, `ctrl(n) @` |
//! | Free parameters | - | `input float theta;` |
//!
//! `negctrl`, `inv` and `pow` modifiers are parsed but not lowered. When an
//! OpenQASM 3 program fails to load, [`load_circuit`] retries once with
//! every modifier stripped by [`sanitize_modifiers`].
//!
//! # Example: Loading QASM
//!
//! ```rust
//! use qasm2py_qasm::load_circuit;
//!
//! let qasm = r#"
//!     OPENQASM 3.0;
//!     qubit[2] q;
//!     bit[2] c;
//!     h q[0];
//!     cx q[0], q[1];
//!     c = measure q;
//! "#;
//!
//! let circuit = load_circuit(qasm).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.len(), 4);
//! ```
//!
//! # Example: Modifier Fallback
//!
//! ```rust
//! use qasm2py_qasm::load_circuit;
//!
//! // `inv` is not lowered, so the program is reloaded as `x q[0];`.
//! let circuit = load_circuit("OPENQASM 3.0;\nqubit[1] q;\ninv @ x q[0];").unwrap();
//! assert_eq!(circuit.instructions()[0].name(), "x");
//! ```
//!
//! # Example: Emitting QASM
//!
//! ```rust
//! use qasm2py_qasm::{Dialect, emit, load_circuit};
//!
//! let circuit = load_circuit("OPENQASM 2.0; qreg q[2]; h q[0]; cx q[0], q[1];").unwrap();
//! let qasm = emit(&circuit, Dialect::Qasm3);
//! assert!(qasm.contains("cx q[0], q[1];"));
//! ```

mod ast;
mod emitter;
mod error;
mod lexer;
mod library;
mod loader;
mod parser;
mod sanitize;

pub use emitter::emit;
pub use error::{LoadError, LoadResult, ParseError, ParseResult};
pub use loader::{Dialect, detect_dialect, load_circuit};
pub use parser::{parse, parse_ast};
pub use sanitize::sanitize_modifiers;

// Re-export AST types for advanced users
pub mod syntax {
    pub use crate::ast::*;
}
