//! Discovery of custom gate definitions.

use qasm2py_ir::{Circuit, Instruction};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::primitives::is_primitive;

/// Custom gates in order of first discovery, at most one entry per name.
#[derive(Debug, Default)]
pub struct CustomGateTable<'a> {
    entries: Vec<(&'a str, &'a Circuit)>,
}

impl<'a> CustomGateTable<'a> {
    /// Number of distinct custom gates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no custom gate was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Definition recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&'a Circuit> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, definition)| definition)
    }

    /// Gate names in discovery order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|&(name, _)| name)
    }

    /// `(name, definition)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Circuit)> + '_ {
        self.entries.iter().copied()
    }
}

/// Collect every custom gate reachable from `instructions`.
///
/// The walk is depth-first and pre-order: a gate is recorded, then its own
/// body is searched before the remaining siblings. A name seen before is
/// skipped without descending again, so the first definition of a name wins
/// and a self-referencing definition terminates.
pub fn collect_custom_gates(instructions: &[Instruction]) -> CustomGateTable<'_> {
    let mut collector = Collector::default();
    collector.walk(instructions);
    collector.table
}

#[derive(Default)]
struct Collector<'a> {
    visited: FxHashSet<&'a str>,
    table: CustomGateTable<'a>,
}

impl<'a> Collector<'a> {
    fn walk(&mut self, instructions: &'a [Instruction]) {
        for instruction in instructions {
            let Some(definition) = instruction.definition() else {
                continue;
            };
            let name = instruction.name();
            if is_primitive(name) || !self.visited.insert(name) {
                continue;
            }

            debug!(
                "Discovered custom gate '{name}' on {} qubits",
                definition.num_qubits()
            );
            self.table.entries.push((name, definition));
            self.walk(definition.instructions());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qasm2py_ir::{CustomGate, QubitId, StandardGate};

    fn custom(name: &str, body: Circuit) -> CustomGate {
        CustomGate::new(name, 0).with_definition(body)
    }

    fn one_qubit_body(name: &str) -> Circuit {
        let mut body = Circuit::with_size(name, 1, 0);
        body.h(QubitId(0)).unwrap();
        body
    }

    #[test]
    fn test_dedup_by_name() {
        let mut circuit = Circuit::with_size("main", 2, 0);
        for q in [0, 1, 0] {
            circuit
                .gate(custom("g", one_qubit_body("g")), &[QubitId(q)])
                .unwrap();
        }

        let table = collect_custom_gates(circuit.instructions());
        assert_eq!(table.len(), 1);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["g"]);
    }

    #[test]
    fn test_depth_first_preorder() {
        let mut outer_body = Circuit::with_size("outer", 1, 0);
        outer_body
            .gate(custom("inner", one_qubit_body("inner")), &[QubitId(0)])
            .unwrap();

        let mut circuit = Circuit::with_size("main", 1, 0);
        circuit
            .gate(custom("outer", outer_body), &[QubitId(0)])
            .unwrap();
        circuit
            .gate(custom("later", one_qubit_body("later")), &[QubitId(0)])
            .unwrap();

        let table = collect_custom_gates(circuit.instructions());
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            vec!["outer", "inner", "later"]
        );
        assert_eq!(table.get("inner").unwrap().len(), 1);
    }

    #[test]
    fn test_first_definition_wins() {
        let mut two = Circuit::with_size("g", 1, 0);
        two.x(QubitId(0)).unwrap();
        two.x(QubitId(0)).unwrap();

        let mut circuit = Circuit::with_size("main", 1, 0);
        circuit
            .gate(custom("g", one_qubit_body("g")), &[QubitId(0)])
            .unwrap();
        circuit.gate(custom("g", two), &[QubitId(0)]).unwrap();

        let table = collect_custom_gates(circuit.instructions());
        assert_eq!(table.get("g").unwrap().len(), 1);
    }

    #[test]
    fn test_primitive_names_are_not_collected() {
        // A gate named like a primitive is left to the emitter even when it
        // has a definition, and its body is not searched.
        let mut body = Circuit::with_size("cu1", 1, 0);
        body.gate(custom("hidden", one_qubit_body("hidden")), &[QubitId(0)])
            .unwrap();

        let mut circuit = Circuit::with_size("main", 1, 0);
        circuit.gate(custom("u1", body), &[QubitId(0)]).unwrap();
        circuit.h(QubitId(0)).unwrap();

        assert!(collect_custom_gates(circuit.instructions()).is_empty());
    }

    #[test]
    fn test_controlled_custom_gates_are_not_collected() {
        let mut circuit = Circuit::with_size("main", 2, 0);
        circuit
            .controlled(custom("g", one_qubit_body("g")), &[QubitId(0)], &[QubitId(1)])
            .unwrap();
        circuit
            .controlled(StandardGate::Y, &[QubitId(0)], &[QubitId(1)])
            .unwrap();

        assert!(collect_custom_gates(circuit.instructions()).is_empty());
    }
}
