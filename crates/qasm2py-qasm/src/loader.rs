//! Dialect detection and circuit loading.

use std::fmt;

use qasm2py_ir::Circuit;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LoadError, LoadResult};
use crate::parser::parse;
use crate::sanitize::sanitize_modifiers;

/// The two supported OpenQASM dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// OpenQASM 2.x
    Qasm2,
    /// OpenQASM 3.x
    Qasm3,
}

impl Dialect {
    /// The version marker that identifies the dialect in source text.
    pub fn marker(self) -> &'static str {
        match self {
            Dialect::Qasm2 => "OPENQASM 2",
            Dialect::Qasm3 => "OPENQASM 3",
        }
    }

    /// Major version accepted in the `OPENQASM` statement.
    pub fn major_version(self) -> u32 {
        match self {
            Dialect::Qasm2 => 2,
            Dialect::Qasm3 => 3,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpenQASM {}", self.major_version())
    }
}

/// Determine the dialect of `source`.
///
/// The first non-empty line decides when it starts with a version marker,
/// OpenQASM 3 taking precedence. Otherwise the whole text is searched for a
/// marker, again OpenQASM 3 first.
pub fn detect_dialect(source: &str) -> Option<Dialect> {
    const ORDER: [Dialect; 2] = [Dialect::Qasm3, Dialect::Qasm2];

    let header = source.trim().lines().next().unwrap_or_default();
    ORDER
        .into_iter()
        .find(|d| header.starts_with(d.marker()))
        .or_else(|| ORDER.into_iter().find(|d| source.contains(d.marker())))
}

/// Load an OpenQASM 2 or 3 program into a [`Circuit`].
///
/// An OpenQASM 3 program that fails to parse is retried once after
/// [`sanitize_modifiers`]; the error of that second attempt is returned if it
/// fails too. OpenQASM 2 programs get a single attempt.
pub fn load_circuit(source: &str) -> LoadResult<Circuit> {
    let dialect = detect_dialect(source).ok_or(LoadError::UnknownDialect)?;
    debug!(%dialect, "Detected dialect");

    let result = match dialect {
        Dialect::Qasm2 => parse(source, dialect),
        Dialect::Qasm3 => parse(source, dialect).or_else(|err| {
            warn!(
                error = %err,
                "OpenQASM 3 parse failed; retrying with gate modifiers stripped (control, inverse and power semantics are dropped)"
            );
            parse(&sanitize_modifiers(source), dialect)
        }),
    };

    let circuit = result.map_err(|source| LoadError::DialectParse { dialect, source })?;
    debug!(
        num_qubits = circuit.num_qubits(),
        num_clbits = circuit.num_clbits(),
        instructions = circuit.len(),
        "Loaded circuit"
    );
    Ok(circuit)
}
