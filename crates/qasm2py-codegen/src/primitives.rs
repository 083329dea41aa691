//! Gate names built into the Qiskit circuit API.

/// Gates Qiskit provides natively. An instruction with one of these names is
/// never turned into a generated builder, even when it carries a definition.
pub const PRIMITIVE_GATES: [&str; 33] = [
    "id", "i", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "sx", "sxdg", //
    "rx", "ry", "rz", "p", "u", "u1", "u2", "u3", //
    "cx", "cy", "cz", "swap", "cp", //
    "crx", "cry", "crz", "cu", //
    "ccx", "cswap", "mcx", //
    "rzz",
];

/// Check whether `name` is a primitive gate.
#[inline]
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_GATES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_set() {
        assert!(is_primitive("cx"));
        assert!(is_primitive("i"));
        assert!(is_primitive("u1"));
        assert!(!is_primitive("ch"));
        assert!(!is_primitive("bell"));
        assert!(!is_primitive("CX"));
    }

    #[test]
    fn test_names_are_unique() {
        let mut names = PRIMITIVE_GATES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PRIMITIVE_GATES.len());
    }
}
