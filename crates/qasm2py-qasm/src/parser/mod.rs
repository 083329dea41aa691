//! Recursive-descent parser for both `OpenQASM` dialects.

mod expression;
mod lowering;
mod statement;

use qasm2py_ir::Circuit;

use crate::ast::Program;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{LocatedToken, Token, tokenize};
use crate::loader::Dialect;

/// Parse QASM source in the given dialect into a Circuit.
pub fn parse(source: &str, dialect: Dialect) -> ParseResult<Circuit> {
    let program = parse_ast(source, dialect)?;
    lowering::lower_to_circuit(&program)
}

/// Parse QASM source in the given dialect into an AST Program.
pub fn parse_ast(source: &str, dialect: Dialect) -> ParseResult<Program> {
    let mut parser = Parser::new(source, dialect)?;
    parser.parse_program()
}

/// Parse a sequence of `gate` definitions with no version header.
pub(crate) fn parse_definitions(source: &str) -> ParseResult<Vec<crate::ast::Statement>> {
    let mut parser = Parser::new(source, Dialect::Qasm3)?;
    let mut statements = Vec::new();
    while !parser.is_eof() {
        statements.push(parser.parse_statement()?);
    }
    Ok(statements)
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<LocatedToken>,
    pub(super) pos: usize,
    pub(super) dialect: Dialect,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str, dialect: Dialect) -> ParseResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, msg)) => {
                    return Err(ParseError::LexerError {
                        position: span.start,
                        message: msg,
                    });
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            dialect,
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Line of the current token, or of the last one at end of input.
    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Reject a construct that only exists in `OpenQASM` 3.
    pub(super) fn require_qasm3(&self, construct: &str) -> ParseResult<()> {
        match self.dialect {
            Dialect::Qasm3 => Ok(()),
            Dialect::Qasm2 => Err(ParseError::UnsupportedStatement {
                line: self.line(),
                construct: format!("{construct} requires OpenQASM 3"),
            }),
        }
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> ParseResult<Program> {
        self.expect(Token::OpenQasm)?;
        let version = self.parse_version()?;
        self.expect(Token::Semicolon)?;

        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        Ok(Program {
            version,
            statements,
        })
    }

    /// Parse the version number and check it against the dialect.
    #[allow(clippy::cast_precision_loss)]
    fn parse_version(&mut self) -> ParseResult<String> {
        let (major, version) = match self.advance() {
            Some(Token::FloatLiteral(v)) => (v.trunc(), format!("{v:?}")),
            Some(Token::IntLiteral(v)) => (v as f64, format!("{v}.0")),
            Some(other) => {
                return Err(ParseError::InvalidVersion {
                    dialect: self.dialect,
                    found: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("version number".into())),
        };

        if major != f64::from(self.dialect.major_version()) {
            return Err(ParseError::InvalidVersion {
                dialect: self.dialect,
                found: version,
            });
        }
        Ok(version)
    }

    /// Parse identifier list.
    pub(super) fn parse_identifier_list(&mut self) -> ParseResult<Vec<String>> {
        let mut ids = vec![self.parse_identifier()?];
        while self.consume(&Token::Comma) {
            ids.push(self.parse_identifier()?);
        }
        Ok(ids)
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        let line = self.line();
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            Some(other) => Err(ParseError::UnexpectedToken {
                line,
                expected: "identifier".into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("identifier".into())),
        }
    }

    /// Parse a non-negative integer that fits a register size or index.
    pub(super) fn parse_u32(&mut self) -> ParseResult<u32> {
        let line = self.line();
        match self.advance() {
            Some(Token::IntLiteral(v)) => {
                u32::try_from(v).map_err(|_| ParseError::UnexpectedToken {
                    line,
                    expected: "integer below 2^32".into(),
                    found: v.to_string(),
                })
            }
            Some(other) => Err(ParseError::UnexpectedToken {
                line,
                expected: "integer".into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("integer".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bell_state_qasm3() {
        let source = r"
            OPENQASM 3.0;
            qubit[2] q;
            bit[2] c;
            h q[0];
            cx q[0], q[1];
            c = measure q;
        ";

        let circuit = parse(source, Dialect::Qasm3).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.len(), 4);
    }

    #[test]
    fn test_parse_bell_state_qasm2() {
        let source = r#"
            OPENQASM 2.0;
            include "qelib1.inc";
            qreg q[2];
            creg c[2];
            h q[0];
            CX q[0], q[1];
            measure q -> c;
        "#;

        let circuit = parse(source, Dialect::Qasm2).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        let names: Vec<_> = circuit.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["h", "cx", "measure", "measure"]);
    }

    #[test]
    fn test_version_must_match_dialect() {
        let err = parse("OPENQASM 3.0; qubit q;", Dialect::Qasm2).unwrap_err();
        assert!(matches!(err, ParseError::InvalidVersion { .. }));

        let err = parse("OPENQASM 2.0; qreg q[1];", Dialect::Qasm3).unwrap_err();
        assert!(matches!(err, ParseError::InvalidVersion { .. }));
    }

    #[test]
    fn test_qasm2_rejects_qasm3_forms() {
        for source in [
            "OPENQASM 2.0; qubit[2] q;",
            "OPENQASM 2.0; qreg q[2]; ctrl @ x q[0], q[1];",
            "OPENQASM 2.0; qreg q[1]; creg c[1]; c = measure q;",
        ] {
            let err = parse(source, Dialect::Qasm2).unwrap_err();
            assert!(
                matches!(err, ParseError::UnsupportedStatement { .. }),
                "{source}: {err}"
            );
        }
    }

    #[test]
    fn test_control_flow_is_rejected() {
        let source = "OPENQASM 3.0;\nqubit q;\nbit c;\nif (c) x q;";
        let err = parse(source, Dialect::Qasm3).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedStatement { line: 4, .. }));
    }

    #[test]
    fn test_parse_error_undefined() {
        let source = r"
            OPENQASM 3.0;
            h undefined[0];
        ";

        let result = parse(source, Dialect::Qasm3);
        assert!(matches!(result, Err(ParseError::UndefinedIdentifier(_))));
    }
}
