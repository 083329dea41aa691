//! Translation of single instructions into Qiskit calls.

use qasm2py_ir::{Instruction, InstructionKind, ParameterExpression};

use crate::format::{SymbolNames, python_expr, python_list, python_str};
use crate::primitives::is_primitive;

/// How an instruction is written out, decided before any text is produced.
///
/// Operands are resolved indices into the enclosing circuit's registers.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a> {
    /// `cx(control, target)`
    Cx(usize, usize),
    /// `ccx(c0, c1, target)`
    Ccx(usize, usize, usize),
    /// `mcx([controls], target)`
    Mcx(&'a [usize], usize),
    /// `measure(qubit, clbit)`
    Measure(usize, usize),
    /// `barrier([qubits])`
    Barrier(&'a [usize]),
    /// `reset(qubit)`
    Reset(usize),
    /// Parameterless single-qubit gate.
    OneQubit(&'a str, usize),
    /// Single-qubit gate with its parameters first: rx, ry, rz, p, u.
    OneQubitParams(&'a str, Vec<&'a ParameterExpression>, usize),
    /// Parameterless two-qubit gate.
    TwoQubit(&'a str, usize, usize),
    /// Two-qubit gate with one parameter: cp, crx, cry, crz.
    TwoQubitParam(&'a str, &'a ParameterExpression, usize, usize),
    /// `append(build_<name>(), [qubits])`
    Custom(&'a str, &'a [usize]),
    /// No Qiskit call; written as a comment.
    Unsupported,
}

/// Classify an instruction. The first matching rule wins.
///
/// Every instruction tagged with control information takes the controlled
/// route, whatever its base gate: only base x with one or two controls
/// keeps its meaning, everything else becomes a multi-controlled X.
pub fn classify<'a>(
    instruction: &'a Instruction,
    qubits: &'a [usize],
    clbits: &[usize],
) -> Shape<'a> {
    if let Some((num_ctrl, base)) = instruction.control() {
        let Some((&target, controls)) = qubits.split_last() else {
            return Shape::Unsupported;
        };
        return match (base, num_ctrl, controls) {
            ("x", 1, &[control]) => Shape::Cx(control, target),
            ("x", 2, &[c0, c1]) => Shape::Ccx(c0, c1, target),
            _ => Shape::Mcx(controls, target),
        };
    }

    match instruction.kind {
        InstructionKind::Measure => {
            return match (qubits, clbits) {
                (&[qubit], &[clbit]) => Shape::Measure(qubit, clbit),
                _ => Shape::Unsupported,
            };
        }
        InstructionKind::Barrier => return Shape::Barrier(qubits),
        InstructionKind::Reset => {
            return match qubits {
                &[qubit] => Shape::Reset(qubit),
                _ => Shape::Unsupported,
            };
        }
        InstructionKind::Gate(_) => {}
    }

    let name = instruction.name();
    let params = instruction.params();
    match (name, params.as_slice(), qubits) {
        ("id" | "i", _, &[q]) => Shape::OneQubit("id", q),
        ("x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "sx" | "sxdg", [], &[q]) => {
            Shape::OneQubit(name, q)
        }
        ("rx" | "ry" | "rz" | "p", &[_], &[q]) | ("u", &[_, _, _], &[q]) => {
            Shape::OneQubitParams(name, params.clone(), q)
        }
        ("cx" | "cy" | "cz" | "swap", [], &[a, b]) => Shape::TwoQubit(name, a, b),
        ("cp" | "crx" | "cry" | "crz", &[theta], &[a, b]) => {
            Shape::TwoQubitParam(name, theta, a, b)
        }
        ("ccx", [], &[a, b, c]) => Shape::Ccx(a, b, c),
        ("mcx", [], [controls @ .., target]) => Shape::Mcx(controls, *target),
        _ if instruction.definition().is_some() && !is_primitive(name) => {
            Shape::Custom(name, qubits)
        }
        _ => Shape::Unsupported,
    }
}

/// Translate one instruction into lines of Python applying it to `var`.
///
/// Never fails: an instruction without a Qiskit counterpart, or whose
/// operands do not fit its gate, becomes a `# Unsupported gate` comment.
/// Symbolic parameters are written with the variables in `names`.
pub fn emit_instruction(
    instruction: &Instruction,
    var: &str,
    qubits: &[usize],
    clbits: &[usize],
    indent: &str,
    names: &SymbolNames,
) -> Vec<String> {
    let expr = |p: &ParameterExpression| python_expr(p, names);
    let call = match classify(instruction, qubits, clbits) {
        Shape::Cx(c, t) => format!("cx({c}, {t})"),
        Shape::Ccx(c0, c1, t) => format!("ccx({c0}, {c1}, {t})"),
        Shape::Mcx(controls, t) => format!("mcx({}, {t})", python_list(controls)),
        Shape::Measure(q, c) => format!("measure({q}, {c})"),
        Shape::Barrier(qs) => format!("barrier({})", python_list(qs)),
        Shape::Reset(q) => format!("reset({q})"),
        Shape::OneQubit(name, q) => format!("{name}({q})"),
        Shape::OneQubitParams(name, params, q) => {
            let params: Vec<String> = params.into_iter().map(expr).collect();
            format!("{name}({}, {q})", params.join(", "))
        }
        Shape::TwoQubit(name, a, b) => format!("{name}({a}, {b})"),
        Shape::TwoQubitParam(name, theta, a, b) => {
            format!("{name}({}, {a}, {b})", expr(theta))
        }
        Shape::Custom(name, qs) => format!("append(build_{name}(), {})", python_list(qs)),
        Shape::Unsupported => {
            let params = instruction
                .params()
                .into_iter()
                .map(|p| python_str(&expr(p)));
            return vec![format!(
                "{indent}# Unsupported gate: {} params={} qubits={}",
                instruction.name(),
                python_list(params),
                python_list(qubits)
            )];
        }
    };
    vec![format!("{indent}{var}.{call}")]
}
