//! Dialect detection, sanitizer fallback and load errors.

use proptest::prelude::*;
use qasm2py_qasm::{
    Dialect, LoadError, ParseError, detect_dialect, emit, load_circuit, sanitize_modifiers,
};

#[test]
fn test_loads_both_dialects() {
    let qasm2 = r#"
OPENQASM 2.0;
include "qelib1.inc";
qreg q[2];
creg c[2];
h q[0];
cx q[0], q[1];
measure q -> c;
"#;
    let qasm3 = r"
OPENQASM 3.0;
qubit[2] q;
bit[2] c;
h q[0];
cx q[0], q[1];
c = measure q;
";
    let a = load_circuit(qasm2).unwrap();
    let b = load_circuit(qasm3).unwrap();
    assert_eq!(a.instructions(), b.instructions());
    assert_eq!(a.num_clbits(), 2);
}

#[test]
fn test_marker_found_after_leading_comment() {
    let source = "// exported by some tool\nOPENQASM 2.0;\nqreg q[1];\nx q[0];";
    assert_eq!(detect_dialect(source), Some(Dialect::Qasm2));
    assert_eq!(load_circuit(source).unwrap().len(), 1);
}

#[test]
fn test_unknown_dialect() {
    let err = load_circuit("qreg q[1];\nx q[0];").unwrap_err();
    assert!(matches!(err, LoadError::UnknownDialect));
}

#[test]
fn test_qasm3_falls_back_to_sanitized_text() {
    // `negctrl` is not lowered, so the body is reloaded as `cx a, b, c;`.
    let source = r"
OPENQASM 3.0;
gate g a, b, c {
    negctrl @ cx a, b, c;
}
qubit[3] q;
g q[0], q[1], q[2];
";
    let err = load_circuit(source).unwrap_err();
    // The stripped call has the wrong arity; that second error is reported.
    let LoadError::DialectParse { dialect, source } = err else {
        panic!("expected a parse error");
    };
    assert_eq!(dialect, Dialect::Qasm3);
    assert!(matches!(source, ParseError::WrongQubitCount { .. }));

    let source = r"
OPENQASM 3.0;
gate g a, b {
    inv @ pow(2) @ cx a, b;
}
qubit[2] q;
g q[0], q[1];
";
    let circuit = load_circuit(source).unwrap();
    let body = circuit.instructions()[0].definition().unwrap();
    assert_eq!(body.instructions()[0].name(), "cx");
}

#[test]
fn test_ctrl_modifier_needs_no_fallback() {
    let source = "OPENQASM 3.0;\nqubit[3] q;\nctrl @ cx q[0], q[1], q[2];";
    let circuit = load_circuit(source).unwrap();
    assert_eq!(circuit.instructions()[0].name(), "ccx");
    assert_eq!(circuit.instructions()[0].control(), Some((2, "x")));
}

#[test]
fn test_qasm2_has_no_fallback() {
    let source = "OPENQASM 2.0;\nqreg q[2];\nctrl @ x q[0], q[1];";
    let err = load_circuit(source).unwrap_err();
    let LoadError::DialectParse { dialect, source } = err else {
        panic!("expected a parse error");
    };
    assert_eq!(dialect, Dialect::Qasm2);
    assert!(matches!(source, ParseError::UnsupportedStatement { .. }));
}

#[test]
fn test_control_flow_is_reported() {
    let source = "OPENQASM 3.0;\nqubit q;\nbit c;\nc = measure q;\nif (c) x q;";
    let err = load_circuit(source).unwrap_err();
    assert!(err.to_string().contains("OpenQASM 3"));
    assert!(matches!(
        err,
        LoadError::DialectParse {
            source: ParseError::UnsupportedStatement { line: 5, .. },
            ..
        }
    ));
}

#[test]
fn test_emit_then_load_is_stable() {
    let source = r"
OPENQASM 3.0;
gate layer(theta) a, b { rx(theta) a; rz(theta / 2) b; cz a, b; }
qubit[3] q;
bit[3] c;
layer(0.3) q[0], q[1];
ctrl(2) @ x q[0], q[1], q[2];
reset q[2];
barrier q;
c = measure q;
";
    let circuit = load_circuit(source).unwrap();
    for dialect in [Dialect::Qasm2, Dialect::Qasm3] {
        let flat = load_circuit(&emit(&circuit, dialect)).unwrap();
        let again = load_circuit(&emit(&flat, dialect)).unwrap();
        assert_eq!(flat.instructions(), again.instructions(), "{dialect}");
        assert_eq!(flat.len(), 9);
    }
}

fn arb_modifier() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ctrl".to_string()),
        Just("inv".to_string()),
        Just("negctrl".to_string()),
        (1u32..5).prop_map(|n| format!("ctrl({n})")),
        (1u32..5).prop_map(|n| format!("negctrl({n})")),
        (-3i32..4).prop_map(|n| format!("pow({n})")),
    ]
}

fn arb_line() -> impl Strategy<Value = String> {
    (
        "[ \t]{0,4}",
        prop::collection::vec(arb_modifier(), 0..4),
        prop_oneof![Just("x q[0];"), Just("cx a, b;"), Just("// ctrl @ x"), Just("")],
    )
        .prop_map(|(indent, modifiers, call)| {
            let chain: String = modifiers.iter().map(|m| format!("{m} @ ")).collect();
            format!("{indent}{chain}{call}")
        })
}

proptest! {
    #[test]
    fn test_sanitizer_is_idempotent(lines in prop::collection::vec(arb_line(), 0..8)) {
        let source = lines.join("\n");
        let once = sanitize_modifiers(&source);
        prop_assert_eq!(sanitize_modifiers(&once), once.clone());
        prop_assert!(!once.lines().any(|l| l.trim_start().starts_with("ctrl @")));
    }
}
