//! Error types for the QASM loader.

use thiserror::Error;

use crate::loader::Dialect;

/// Errors that can occur during parsing and lowering.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at position {position}: {message}")]
    LexerError { position: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Version statement does not match the dialect.
    #[error("Invalid OPENQASM version for {dialect}: {found}")]
    InvalidVersion { dialect: Dialect, found: String },

    /// Construct outside the dialect or outside what the loader lowers.
    #[error("Unsupported statement at line {line}: {construct}")]
    UnsupportedStatement { line: usize, construct: String },

    /// Gate modifier the primary parse does not interpret.
    #[error("Unsupported gate modifier '{modifier}' on gate '{gate}'")]
    UnsupportedModifier { modifier: String, gate: String },

    /// Expression that cannot become a gate parameter.
    #[error("Unsupported parameter expression: {0}")]
    UnsupportedExpression(String),

    /// Undefined identifier.
    #[error("Undefined identifier: {0}")]
    UndefinedIdentifier(String),

    /// Duplicate declaration.
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// Invalid gate.
    #[error("Unknown gate: {0}")]
    UnknownGate(String),

    /// Wrong number of arguments.
    #[error("Gate '{gate}' expects {expected} qubits, got {got}")]
    WrongQubitCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Wrong number of parameters.
    #[error("Gate '{gate}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Register operands of a broadcast call differ in size.
    #[error("Register operands of '{gate}' have mismatched sizes {sizes:?}")]
    BroadcastMismatch { gate: String, sizes: Vec<usize> },

    /// Measurement source and target counts differ.
    #[error("Cannot measure {qubits} qubits into {bits} bits")]
    MeasureMismatch { qubits: usize, bits: usize },

    /// Index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: usize,
        size: usize,
    },

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    CircuitError(#[from] qasm2py_ir::IrError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors surfaced by [`load_circuit`](crate::load_circuit).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// No `OPENQASM 2` or `OPENQASM 3` marker anywhere in the text.
    #[error("Cannot detect OPENQASM version: no 'OPENQASM 2' or 'OPENQASM 3' marker found")]
    UnknownDialect,

    /// The dialect was recognized but the program does not parse.
    #[error("Failed to parse {dialect} program: {source}")]
    DialectParse {
        dialect: Dialect,
        #[source]
        source: ParseError,
    },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;
