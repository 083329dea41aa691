//! Gates known to the loader without a user definition.

use qasm2py_ir::{ParameterExpression, StandardGate};

use crate::error::{ParseError, ParseResult};

/// Name, parameter count and qubit count of each fixed-arity standard gate.
const SIGNATURES: [(&str, usize, usize); 31] = [
    ("id", 0, 1),
    ("x", 0, 1),
    ("y", 0, 1),
    ("z", 0, 1),
    ("h", 0, 1),
    ("s", 0, 1),
    ("sdg", 0, 1),
    ("t", 0, 1),
    ("tdg", 0, 1),
    ("sx", 0, 1),
    ("sxdg", 0, 1),
    ("rx", 1, 1),
    ("ry", 1, 1),
    ("rz", 1, 1),
    ("p", 1, 1),
    ("u", 3, 1),
    ("u1", 1, 1),
    ("u2", 2, 1),
    ("u3", 3, 1),
    ("cx", 0, 2),
    ("cy", 0, 2),
    ("cz", 0, 2),
    ("swap", 0, 2),
    ("cp", 1, 2),
    ("crx", 1, 2),
    ("cry", 1, 2),
    ("crz", 1, 2),
    ("cu", 4, 2),
    ("rzz", 1, 2),
    ("ccx", 0, 3),
    ("cswap", 0, 3),
];

/// Alternative spellings accepted for standard gates.
const ALIASES: [(&str, &str); 8] = [
    ("U", "u"),
    ("CX", "cx"),
    ("i", "id"),
    ("phase", "p"),
    ("cphase", "cp"),
    ("cnot", "cx"),
    ("toffoli", "ccx"),
    ("fredkin", "cswap"),
];

/// Gates without a native counterpart, defined in terms of the standard set.
/// Always in scope, whether or not the program includes a standard library.
pub(crate) const LIBRARY_SOURCE: &str = r"
gate ch a, b {
    h b; sdg b; cx a, b; h b; t b; cx a, b; t b; h b; s b; x b; s a;
}
gate cu1(lambda) a, b {
    p(lambda / 2) a; cx a, b; p(-lambda / 2) b; cx a, b; p(lambda / 2) b;
}
gate cu3(theta, phi, lambda) c, t {
    p((lambda + phi) / 2) c;
    p((lambda - phi) / 2) t;
    cx c, t;
    u(-theta / 2, 0, -(phi + lambda) / 2) t;
    cx c, t;
    u(theta / 2, phi, 0) t;
}
gate csx a, b {
    h b; cu1(pi / 2) a, b; h b;
}
gate rxx(theta) a, b {
    u(pi / 2, theta, 0) a; h b; cx a, b; p(-theta) b; cx a, b; h b; u(pi / 2, -pi, pi - theta) a;
}
gate rccx a, b, c {
    u(pi / 2, 0, pi) c; p(pi / 4) c; cx b, c; p(-pi / 4) c; cx a, c;
    p(pi / 4) c; cx b, c; p(-pi / 4) c; u(pi / 2, 0, pi) c;
}
";

/// Resolve an alias to the canonical gate name.
pub(crate) fn canonical_name(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |&(_, canonical)| canonical)
}

/// Whether `name` (or its alias) is a standard gate.
pub(crate) fn is_standard_name(name: &str) -> bool {
    let canonical = canonical_name(name);
    canonical == "mcx" || SIGNATURES.iter().any(|(n, _, _)| *n == canonical)
}

/// Build the standard gate `name` applied to `num_qubits` operands.
///
/// Returns `None` when `name` is not a standard gate at all.
pub(crate) fn standard_gate(
    name: &str,
    params: &[ParameterExpression],
    num_qubits: usize,
) -> Option<ParseResult<StandardGate>> {
    let canonical = canonical_name(name);

    if canonical == "mcx" {
        return Some(multi_controlled_x(params, num_qubits));
    }

    let &(_, expected_params, expected_qubits) =
        SIGNATURES.iter().find(|(n, _, _)| *n == canonical)?;

    if num_qubits != expected_qubits {
        return Some(Err(ParseError::WrongQubitCount {
            gate: canonical.to_string(),
            expected: expected_qubits,
            got: num_qubits,
        }));
    }

    let p = |i: usize| params[i].clone();
    let gate = match (canonical, params.len()) {
        ("id", 0) => StandardGate::I,
        ("x", 0) => StandardGate::X,
        ("y", 0) => StandardGate::Y,
        ("z", 0) => StandardGate::Z,
        ("h", 0) => StandardGate::H,
        ("s", 0) => StandardGate::S,
        ("sdg", 0) => StandardGate::Sdg,
        ("t", 0) => StandardGate::T,
        ("tdg", 0) => StandardGate::Tdg,
        ("sx", 0) => StandardGate::SX,
        ("sxdg", 0) => StandardGate::SXdg,
        ("rx", 1) => StandardGate::Rx(p(0)),
        ("ry", 1) => StandardGate::Ry(p(0)),
        ("rz", 1) => StandardGate::Rz(p(0)),
        ("p", 1) => StandardGate::P(p(0)),
        ("u", 3) => StandardGate::U(p(0), p(1), p(2)),
        ("u1", 1) => StandardGate::U1(p(0)),
        ("u2", 2) => StandardGate::U2(p(0), p(1)),
        ("u3", 3) => StandardGate::U3(p(0), p(1), p(2)),
        ("cx", 0) => StandardGate::CX,
        ("cy", 0) => StandardGate::CY,
        ("cz", 0) => StandardGate::CZ,
        ("swap", 0) => StandardGate::Swap,
        ("cp", 1) => StandardGate::CP(p(0)),
        ("crx", 1) => StandardGate::CRx(p(0)),
        ("cry", 1) => StandardGate::CRy(p(0)),
        ("crz", 1) => StandardGate::CRz(p(0)),
        ("cu", 4) => StandardGate::CU(p(0), p(1), p(2), p(3)),
        ("rzz", 1) => StandardGate::RZZ(p(0)),
        ("ccx", 0) => StandardGate::CCX,
        ("cswap", 0) => StandardGate::CSwap,
        _ => {
            return Some(Err(ParseError::WrongParameterCount {
                gate: canonical.to_string(),
                expected: expected_params,
                got: params.len(),
            }));
        }
    };
    Some(Ok(gate))
}

fn multi_controlled_x(
    params: &[ParameterExpression],
    num_qubits: usize,
) -> ParseResult<StandardGate> {
    if !params.is_empty() {
        return Err(ParseError::WrongParameterCount {
            gate: "mcx".into(),
            expected: 0,
            got: params.len(),
        });
    }
    let num_ctrl_qubits = num_qubits
        .checked_sub(1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ParseError::WrongQubitCount {
            gate: "mcx".into(),
            expected: 1,
            got: num_qubits,
        })?;
    Ok(StandardGate::MCX { num_ctrl_qubits })
}

/// Split a named controlled primitive into its base gate and the number of
/// controls it already carries, so `ctrl @ cz` becomes z with two controls.
pub(crate) fn split_controls(gate: StandardGate) -> (StandardGate, u32) {
    match gate {
        StandardGate::CX => (StandardGate::X, 1),
        StandardGate::CCX => (StandardGate::X, 2),
        StandardGate::MCX { num_ctrl_qubits } => (StandardGate::X, num_ctrl_qubits),
        StandardGate::CY => (StandardGate::Y, 1),
        StandardGate::CZ => (StandardGate::Z, 1),
        StandardGate::CP(lambda) => (StandardGate::P(lambda), 1),
        StandardGate::CRx(theta) => (StandardGate::Rx(theta), 1),
        StandardGate::CRy(theta) => (StandardGate::Ry(theta), 1),
        StandardGate::CRz(theta) => (StandardGate::Rz(theta), 1),
        StandardGate::CSwap => (StandardGate::Swap, 1),
        other => (other, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;
    use crate::parser::parse_definitions;

    #[test]
    fn test_aliases() {
        assert_eq!(canonical_name("CX"), "cx");
        assert_eq!(canonical_name("toffoli"), "ccx");
        assert_eq!(canonical_name("h"), "h");
    }

    #[test]
    fn test_arity_checks() {
        let err = standard_gate("rx", &[], 1).unwrap().unwrap_err();
        assert!(matches!(err, ParseError::WrongParameterCount { expected: 1, .. }));

        let err = standard_gate("cx", &[], 3).unwrap().unwrap_err();
        assert!(matches!(err, ParseError::WrongQubitCount { expected: 2, .. }));

        assert!(standard_gate("ch", &[], 2).is_none());
    }

    #[test]
    fn test_variadic_mcx() {
        let gate = standard_gate("mcx", &[], 4).unwrap().unwrap();
        assert_eq!(gate, StandardGate::MCX { num_ctrl_qubits: 3 });
        assert!(standard_gate("mcx", &[], 0).unwrap().is_err());
    }

    #[test]
    fn test_split_controls() {
        assert_eq!(split_controls(StandardGate::CCX), (StandardGate::X, 2));
        assert_eq!(split_controls(StandardGate::CZ), (StandardGate::Z, 1));
        assert_eq!(split_controls(StandardGate::H), (StandardGate::H, 0));
    }

    #[test]
    fn test_library_parses() {
        let statements = parse_definitions(LIBRARY_SOURCE).unwrap();
        let names: Vec<_> = statements
            .iter()
            .filter_map(|s| match s {
                Statement::GateDef(def) => Some(def.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["ch", "cu1", "cu3", "csx", "rxx", "rccx"]);
    }
}
