//! Statement parsing.

use super::Parser;
use crate::ast::{BitRef, GateCall, GateDef, GateModifier, GateOp, QubitRef, RegisterRef, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        match token {
            Token::Include => self.parse_include(),
            Token::Qreg => self.parse_register_decl(Token::Qreg),
            Token::Creg => self.parse_register_decl(Token::Creg),
            Token::Qubit => {
                self.require_qasm3("'qubit' declaration")?;
                self.parse_sized_decl(Token::Qubit)
            }
            Token::Bit => {
                self.require_qasm3("'bit' declaration")?;
                self.parse_sized_decl(Token::Bit)
            }
            Token::Input => {
                self.require_qasm3("'input' declaration")?;
                self.parse_input_decl()
            }
            Token::Measure => self.parse_measure(),
            Token::Reset => self.parse_reset(),
            Token::Barrier => self.parse_barrier().map(|qubits| Statement::Barrier { qubits }),
            Token::Gate => self.parse_gate_def(),
            Token::Ctrl | Token::NegCtrl | Token::Inv | Token::Pow => {
                self.parse_modified_call().map(Statement::Gate)
            }
            Token::Identifier(_) => self.parse_identifier_statement(),
            Token::Opaque => Err(self.unsupported("opaque gate declaration")),
            Token::If | Token::For | Token::While => {
                Err(self.unsupported(&format!("classical control flow ('{token}')")))
            }
            _ => Err(ParseError::UnexpectedToken {
                line: self.line(),
                expected: "statement".into(),
                found: token.to_string(),
            }),
        }
    }

    fn unsupported(&self, construct: &str) -> ParseError {
        ParseError::UnsupportedStatement {
            line: self.line(),
            construct: construct.to_string(),
        }
    }

    /// Parse include statement.
    fn parse_include(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Include)?;
        let line = self.line();
        let path = match self.advance() {
            Some(Token::StringLiteral(s)) => s,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "string literal".into(),
                    found: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("include path".into())),
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Include(path))
    }

    /// Parse `qreg name[n];` or `creg name[n];`.
    fn parse_register_decl(&mut self, keyword: Token) -> ParseResult<Statement> {
        let is_quantum = keyword == Token::Qreg;
        self.expect(keyword)?;
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = Some(self.parse_u32()?);
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;

        Ok(if is_quantum {
            Statement::QubitDecl { name, size }
        } else {
            Statement::BitDecl { name, size }
        })
    }

    /// Parse `qubit[n] name;`, `qubit name;` and the `bit` forms.
    fn parse_sized_decl(&mut self, keyword: Token) -> ParseResult<Statement> {
        let is_quantum = keyword == Token::Qubit;
        self.expect(keyword)?;

        let size = if self.consume(&Token::LBracket) {
            let size = self.parse_u32()?;
            self.expect(Token::RBracket)?;
            Some(size)
        } else {
            None
        };

        let name = self.parse_identifier()?;
        self.expect(Token::Semicolon)?;

        Ok(if is_quantum {
            Statement::QubitDecl { name, size }
        } else {
            Statement::BitDecl { name, size }
        })
    }

    /// Parse `input <type>[<width>] name;`.
    fn parse_input_decl(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Input)?;
        let _type_name = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            self.parse_u32()?;
            self.expect(Token::RBracket)?;
        }
        let name = self.parse_identifier()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::InputDecl { name })
    }

    /// Parse `measure q -> c;`.
    fn parse_measure(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Measure)?;
        let qubits = self.parse_register_refs()?;
        self.expect(Token::Arrow)?;
        let bits = self.parse_register_refs()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure { qubits, bits })
    }

    /// Parse reset statement.
    fn parse_reset(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Reset)?;
        let qubits = self.parse_register_refs()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Reset { qubits })
    }

    /// Parse barrier operands; an empty list means every qubit in scope.
    fn parse_barrier(&mut self) -> ParseResult<Vec<QubitRef>> {
        self.expect(Token::Barrier)?;
        let qubits = if self.check(&Token::Semicolon) {
            vec![]
        } else {
            self.parse_register_refs()?
        };
        self.expect(Token::Semicolon)?;
        Ok(qubits)
    }

    /// Parse gate definition.
    fn parse_gate_def(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Gate)?;
        let name = self.parse_identifier()?;

        let params = if self.consume(&Token::LParen) {
            let p = if self.check(&Token::RParen) {
                vec![]
            } else {
                self.parse_identifier_list()?
            };
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };

        let qubits = self.parse_identifier_list()?;

        self.expect(Token::LBrace)?;
        let mut body = Vec::new();
        while !self.check(&Token::RBrace) {
            body.push(self.parse_gate_op()?);
        }
        self.expect(Token::RBrace)?;

        Ok(Statement::GateDef(GateDef {
            name,
            params,
            qubits,
            body,
        }))
    }

    /// Parse one statement inside a gate body.
    fn parse_gate_op(&mut self) -> ParseResult<GateOp> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("'}' closing gate body".into()))?;

        match token {
            Token::Barrier => self.parse_barrier().map(GateOp::Barrier),
            Token::Ctrl | Token::NegCtrl | Token::Inv | Token::Pow => {
                self.parse_modified_call().map(GateOp::Call)
            }
            Token::Identifier(name) => {
                self.advance();
                self.parse_gate_call(name, vec![]).map(GateOp::Call)
            }
            _ => Err(self.unsupported(&format!("'{token}' inside a gate body"))),
        }
    }

    /// Parse statement starting with identifier (gate call or assignment).
    fn parse_identifier_statement(&mut self) -> ParseResult<Statement> {
        let name = self.parse_identifier()?;

        if self.check(&Token::Eq) || self.check(&Token::LBracket) {
            self.require_qasm3("measurement assignment")?;
            return self.parse_measure_assignment(name);
        }

        self.parse_gate_call(name, vec![]).map(Statement::Gate)
    }

    /// Parse `c = measure q;` or `c[i] = measure q[j];`.
    fn parse_measure_assignment(&mut self, target: String) -> ParseResult<Statement> {
        let index = if self.consume(&Token::LBracket) {
            let idx = self.parse_u32()?;
            self.expect(Token::RBracket)?;
            Some(idx)
        } else {
            None
        };

        self.expect(Token::Eq)?;
        if !self.consume(&Token::Measure) {
            return Err(self.unsupported("classical assignment"));
        }

        let qubits = self.parse_register_refs()?;
        self.expect(Token::Semicolon)?;

        let bits: Vec<BitRef> = vec![RegisterRef {
            register: target,
            index,
        }];
        Ok(Statement::Measure { qubits, bits })
    }

    /// Parse a modifier chain followed by the gate call it applies to.
    fn parse_modified_call(&mut self) -> ParseResult<GateCall> {
        self.require_qasm3("gate modifier")?;

        let mut modifiers = Vec::new();
        loop {
            let modifier = match self.peek() {
                Some(Token::Ctrl) => {
                    self.advance();
                    GateModifier::Ctrl(self.parse_modifier_count()?)
                }
                Some(Token::NegCtrl) => {
                    self.advance();
                    GateModifier::NegCtrl(self.parse_modifier_count()?)
                }
                Some(Token::Inv) => {
                    self.advance();
                    GateModifier::Inv
                }
                Some(Token::Pow) => {
                    self.advance();
                    self.expect(Token::LParen)?;
                    let exponent = self.parse_expression()?;
                    self.expect(Token::RParen)?;
                    GateModifier::Pow(exponent)
                }
                _ => break,
            };
            self.expect(Token::At)?;
            modifiers.push(modifier);
        }

        let name = self.parse_identifier()?;
        self.parse_gate_call(name, modifiers)
    }

    /// Optional `(n)` after `ctrl` / `negctrl`; defaults to one.
    fn parse_modifier_count(&mut self) -> ParseResult<u32> {
        if self.consume(&Token::LParen) {
            let n = self.parse_u32()?;
            self.expect(Token::RParen)?;
            Ok(n)
        } else {
            Ok(1)
        }
    }

    /// Parse the rest of a gate call after its name.
    fn parse_gate_call(
        &mut self,
        name: String,
        modifiers: Vec<GateModifier>,
    ) -> ParseResult<GateCall> {
        let params = if self.consume(&Token::LParen) {
            let p = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };

        let qubits = self.parse_register_refs()?;
        self.expect(Token::Semicolon)?;

        Ok(GateCall {
            name,
            params,
            qubits,
            modifiers,
        })
    }

    /// Parse a comma-separated list of `reg` / `reg[i]` operands.
    fn parse_register_refs(&mut self) -> ParseResult<Vec<RegisterRef>> {
        let mut refs = vec![self.parse_register_ref()?];
        while self.consume(&Token::Comma) {
            refs.push(self.parse_register_ref()?);
        }
        Ok(refs)
    }

    fn parse_register_ref(&mut self) -> ParseResult<RegisterRef> {
        let register = self.parse_identifier()?;

        if self.consume(&Token::LBracket) {
            let index = self.parse_u32()?;
            self.expect(Token::RBracket)?;
            Ok(RegisterRef::single(register, index))
        } else {
            Ok(RegisterRef::register(register))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{GateModifier, GateOp, Statement};
    use crate::loader::Dialect;
    use crate::parser::parse_ast;

    #[test]
    fn test_modifier_chain_order() {
        let program = parse_ast(
            "OPENQASM 3.0; qubit[3] q; ctrl(2) @ inv @ x q[0], q[1], q[2];",
            Dialect::Qasm3,
        )
        .unwrap();

        let Statement::Gate(call) = &program.statements[1] else {
            panic!("expected gate call");
        };
        assert_eq!(call.name, "x");
        assert!(matches!(call.modifiers[0], GateModifier::Ctrl(2)));
        assert!(matches!(call.modifiers[1], GateModifier::Inv));
        assert_eq!(call.qubits.len(), 3);
    }

    #[test]
    fn test_gate_definition_body() {
        let program = parse_ast(
            "OPENQASM 2.0; gate g(theta) a, b { rz(theta) a; barrier a, b; CX a, b; }",
            Dialect::Qasm2,
        )
        .unwrap();

        let Statement::GateDef(def) = &program.statements[0] else {
            panic!("expected gate definition");
        };
        assert_eq!(def.params, vec!["theta"]);
        assert_eq!(def.qubits, vec!["a", "b"]);
        assert_eq!(def.body.len(), 3);
        assert!(matches!(def.body[1], GateOp::Barrier(_)));
    }

    #[test]
    fn test_input_declaration() {
        let program =
            parse_ast("OPENQASM 3.0; input float[64] theta;", Dialect::Qasm3).unwrap();
        assert!(matches!(
            &program.statements[0],
            Statement::InputDecl { name } if name == "theta"
        ));
    }

    #[test]
    fn test_measure_forms() {
        let program = parse_ast(
            "OPENQASM 3.0; qubit[2] q; bit[2] c; c[1] = measure q[0]; measure q -> c;",
            Dialect::Qasm3,
        )
        .unwrap();
        assert!(matches!(program.statements[2], Statement::Measure { .. }));
        assert!(matches!(program.statements[3], Statement::Measure { .. }));
    }

    #[test]
    fn test_opaque_is_rejected() {
        let result = parse_ast("OPENQASM 2.0; opaque magic a;", Dialect::Qasm2);
        assert!(result.is_err());
    }
}
