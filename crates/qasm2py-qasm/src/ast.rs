//! Abstract Syntax Tree for `OpenQASM` programs.

use serde::{Deserialize, Serialize};

/// A complete QASM program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// QASM version (e.g., "2.0").
    pub version: String,
    /// Statements in the program.
    pub statements: Vec<Statement>,
}

/// A statement in a QASM program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Statement {
    /// Include statement.
    Include(String),

    /// Quantum register: `qreg q[n];`, `qubit[n] q;` or `qubit q;`
    QubitDecl { name: String, size: Option<u32> },

    /// Classical register: `creg c[n];`, `bit[n] c;` or `bit c;`
    BitDecl { name: String, size: Option<u32> },

    /// Free angle parameter: `input float[64] theta;`
    InputDecl { name: String },

    /// Gate application.
    Gate(GateCall),

    /// Measurement: `measure q -> c;` or `c = measure q;`
    Measure {
        qubits: Vec<QubitRef>,
        bits: Vec<BitRef>,
    },

    /// Reset: `reset q;`
    Reset { qubits: Vec<QubitRef> },

    /// Barrier: `barrier q;` or `barrier;`
    Barrier { qubits: Vec<QubitRef> },

    /// Gate definition.
    GateDef(GateDef),
}

/// A `gate` definition block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDef {
    pub name: String,
    /// Formal angle parameters.
    pub params: Vec<String>,
    /// Formal qubit arguments.
    pub qubits: Vec<String>,
    pub body: Vec<GateOp>,
}

/// A statement allowed inside a gate body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GateOp {
    /// Call of a previously defined or built-in gate.
    Call(GateCall),
    /// Barrier over formal qubits; empty means all of them.
    Barrier(Vec<QubitRef>),
}

/// A gate call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateCall {
    /// Gate name.
    pub name: String,
    /// Gate parameters (angles, etc.).
    pub params: Vec<Expression>,
    /// Qubits the gate acts on.
    pub qubits: Vec<QubitRef>,
    /// Modifiers, outermost first.
    pub modifiers: Vec<GateModifier>,
}

/// Gate modifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GateModifier {
    /// Control modifier: `ctrl @ gate` or `ctrl(n) @ gate`
    Ctrl(u32),
    /// Negated control: `negctrl @ gate`
    NegCtrl(u32),
    /// Inverse: `inv @ gate`
    Inv,
    /// Power: `pow(k) @ gate`
    Pow(Expression),
}

impl GateModifier {
    /// Keyword as written in source.
    pub fn keyword(&self) -> &'static str {
        match self {
            GateModifier::Ctrl(_) => "ctrl",
            GateModifier::NegCtrl(_) => "negctrl",
            GateModifier::Inv => "inv",
            GateModifier::Pow(_) => "pow",
        }
    }
}

/// Reference to a register or one element of it: `q` or `q[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRef {
    pub register: String,
    pub index: Option<u32>,
}

impl RegisterRef {
    /// Create a reference to a single element.
    pub fn single(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index: Some(index),
        }
    }

    /// Create a reference to an entire register.
    pub fn register(register: impl Into<String>) -> Self {
        Self {
            register: register.into(),
            index: None,
        }
    }
}

/// Reference to a qubit or quantum register.
pub type QubitRef = RegisterRef;

/// Reference to a classical bit or classical register.
pub type BitRef = RegisterRef;

/// An expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression {
    /// Integer literal.
    Int(u64),
    /// Float literal.
    Float(f64),
    /// Identifier.
    Identifier(String),
    /// Pi constant.
    Pi,
    /// Tau constant (2π).
    Tau,
    /// Euler's number.
    Euler,
    /// Negation.
    Neg(Box<Expression>),
    /// Binary operation.
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
    /// Built-in function call: `sin(x)`, `sqrt(2)`, ...
    FnCall { name: String, args: Vec<Expression> },
    /// Parenthesized expression.
    Paren(Box<Expression>),
}

impl Expression {
    /// Try to evaluate as a constant f64.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Expression::Int(v) => Some(*v as f64),
            Expression::Float(v) => Some(*v),
            Expression::Pi => Some(std::f64::consts::PI),
            Expression::Tau => Some(std::f64::consts::TAU),
            Expression::Euler => Some(std::f64::consts::E),
            Expression::Identifier(_) => None,
            Expression::Neg(e) => e.as_f64().map(|v| -v),
            Expression::BinOp { left, op, right } => {
                let l = left.as_f64()?;
                let r = right.as_f64()?;
                Some(match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                })
            }
            Expression::FnCall { name, args } => match args.as_slice() {
                [arg] => apply_function(name, arg.as_f64()?),
                _ => None,
            },
            Expression::Paren(e) => e.as_f64(),
        }
    }
}

pub(crate) fn apply_function(name: &str, x: f64) -> Option<f64> {
    Some(match name {
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "exp" => x.exp(),
        "ln" => x.ln(),
        "sqrt" => x.sqrt(),
        "arcsin" | "asin" => x.asin(),
        "arccos" | "acos" => x.acos(),
        "arctan" | "atan" => x.atan(),
        _ => return None,
    })
}

/// Binary operators allowed in angle expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_expression_eval() {
        let expr = Expression::BinOp {
            left: Box::new(Expression::Pi),
            op: BinOp::Div,
            right: Box::new(Expression::Int(2)),
        };

        let result = expr.as_f64().unwrap();
        assert!((result - PI / 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_function_eval() {
        let expr = Expression::FnCall {
            name: "cos".into(),
            args: vec![Expression::Pi],
        };
        assert!((expr.as_f64().unwrap() + 1.0).abs() < 1e-12);

        let unknown = Expression::FnCall {
            name: "gamma".into(),
            args: vec![Expression::Int(1)],
        };
        assert!(unknown.as_f64().is_none());
    }

    #[test]
    fn test_symbolic_does_not_evaluate() {
        let expr = Expression::BinOp {
            left: Box::new(Expression::Identifier("theta".into())),
            op: BinOp::Mul,
            right: Box::new(Expression::Int(2)),
        };
        assert!(expr.as_f64().is_none());
    }
}
