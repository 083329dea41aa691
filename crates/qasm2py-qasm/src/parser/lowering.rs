//! AST-to-Circuit lowering.

use qasm2py_ir::{Circuit, ClbitId, CustomGate, Gate, Instruction, ParameterExpression, QubitId};
use rustc_hash::{FxHashMap, FxHashSet};

use super::parse_definitions;
use crate::ast::{
    BinOp, Expression, GateCall, GateDef, GateModifier, GateOp, Program, QubitRef, RegisterRef,
    Statement, apply_function,
};
use crate::error::{ParseError, ParseResult};
use crate::library::{self, LIBRARY_SOURCE};

/// Lower an AST Program to a Circuit.
pub(crate) fn lower_to_circuit(program: &Program) -> ParseResult<Circuit> {
    let mut lowerer = Lowerer::new()?;
    lowerer.lower(program)
}

/// Gate definitions in declaration order.
///
/// A definition only sees the definitions declared before it, which rules
/// out recursion. A later definition of the same name shadows earlier ones
/// for everything declared after it.
struct GateTable {
    defs: Vec<GateDef>,
    by_name: FxHashMap<String, Vec<usize>>,
    /// Index of the first user definition; everything before is built in.
    user_start: usize,
}

impl GateTable {
    fn with_library() -> ParseResult<Self> {
        let mut table = Self {
            defs: Vec::new(),
            by_name: FxHashMap::default(),
            user_start: 0,
        };
        for statement in parse_definitions(LIBRARY_SOURCE)? {
            if let Statement::GateDef(def) = statement {
                table.insert(def);
            }
        }
        table.user_start = table.defs.len();
        Ok(table)
    }

    fn insert(&mut self, def: GateDef) {
        self.by_name
            .entry(def.name.clone())
            .or_default()
            .push(self.defs.len());
        self.defs.push(def);
    }

    /// Add a user definition. User definitions may shadow built-in gates
    /// but not each other.
    fn define(&mut self, def: &GateDef) -> ParseResult<()> {
        let redefined = self
            .by_name
            .get(&def.name)
            .is_some_and(|indices| indices.iter().any(|&i| i >= self.user_start));
        if redefined {
            return Err(ParseError::DuplicateDeclaration(def.name.clone()));
        }

        let mut formals: Vec<&str> = def.qubits.iter().map(String::as_str).collect();
        formals.sort_unstable();
        formals.dedup();
        if formals.len() != def.qubits.len() {
            return Err(ParseError::DuplicateDeclaration(format!(
                "qubit argument of gate '{}'",
                def.name
            )));
        }

        self.insert(def.clone());
        Ok(())
    }

    /// Latest definition of `name` among the first `visible` entries.
    fn lookup(&self, name: &str, visible: usize) -> Option<(usize, &GateDef)> {
        let index = *self.by_name.get(name)?.iter().rev().find(|&&i| i < visible)?;
        Some((index, &self.defs[index]))
    }

    fn len(&self) -> usize {
        self.defs.len()
    }
}

/// Name resolution context for gate calls.
struct Scope<'a> {
    /// Formal qubits of the enclosing definition; `None` at top level.
    formals: Option<FxHashMap<&'a str, QubitId>>,
    /// Formal parameters bound to the values of the current call.
    params: FxHashMap<&'a str, ParameterExpression>,
    /// Number of gate table entries callable from here.
    visible: usize,
    /// Names declared with `input`; only visible at top level.
    inputs: Option<&'a FxHashSet<String>>,
}

impl<'a> Scope<'a> {
    fn top_level(visible: usize, inputs: &'a FxHashSet<String>) -> Self {
        Self {
            formals: None,
            params: FxHashMap::default(),
            visible,
            inputs: Some(inputs),
        }
    }

    fn is_input(&self, name: &str) -> bool {
        self.inputs.is_some_and(|inputs| inputs.contains(name))
    }
}

/// A resolved gate operand: one qubit or a whole register.
enum Operand<T> {
    Single(T),
    Register(Vec<T>),
}

impl<T: Copy> Operand<T> {
    /// The operand used in the `i`-th call of a broadcast.
    fn element(&self, i: usize) -> T {
        match self {
            Operand::Single(id) => *id,
            Operand::Register(ids) => ids[i],
        }
    }

    fn flatten(operands: Vec<Self>) -> Vec<T> {
        operands
            .into_iter()
            .flat_map(|operand| match operand {
                Operand::Single(id) => vec![id],
                Operand::Register(ids) => ids,
            })
            .collect()
    }
}

/// Lowers AST to Circuit.
struct Lowerer {
    /// Quantum registers in declaration order of their qubits.
    qregs: FxHashMap<String, Vec<QubitId>>,
    /// Classical registers.
    cregs: FxHashMap<String, Vec<ClbitId>>,
    /// Free parameters declared with `input`.
    inputs: FxHashSet<String>,
    gates: GateTable,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
impl Lowerer {
    fn new() -> ParseResult<Self> {
        Ok(Self {
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
            inputs: FxHashSet::default(),
            gates: GateTable::with_library()?,
        })
    }

    fn lower(&mut self, program: &Program) -> ParseResult<Circuit> {
        let mut circuit = Circuit::new("main");
        for stmt in &program.statements {
            self.lower_statement(&mut circuit, stmt)?;
        }
        Ok(circuit)
    }

    fn lower_statement(&mut self, circuit: &mut Circuit, stmt: &Statement) -> ParseResult<()> {
        match stmt {
            Statement::Include(_) => Ok(()),

            Statement::InputDecl { name } => {
                self.check_unique(name)?;
                self.inputs.insert(name.clone());
                Ok(())
            }

            Statement::QubitDecl { name, size } => {
                self.check_unique(name)?;
                let ids = circuit.add_qreg(name.clone(), size.unwrap_or(1));
                self.qregs.insert(name.clone(), ids);
                Ok(())
            }

            Statement::BitDecl { name, size } => {
                self.check_unique(name)?;
                let ids = circuit.add_creg(name.clone(), size.unwrap_or(1));
                self.cregs.insert(name.clone(), ids);
                Ok(())
            }

            Statement::GateDef(def) => self.gates.define(def),

            Statement::Gate(call) => {
                let scope = Scope::top_level(self.gates.len(), &self.inputs);
                self.lower_gate_call(circuit, call, &scope)
            }

            Statement::Measure { qubits, bits } => {
                let qubits = self.resolve_all(qubits, &Scope::top_level(0, &self.inputs))?;
                let bits = bits
                    .iter()
                    .map(|b| lookup_register(&self.cregs, b))
                    .collect::<ParseResult<Vec<_>>>()?;
                let bits = Operand::flatten(bits);

                if qubits.len() != bits.len() {
                    return Err(ParseError::MeasureMismatch {
                        qubits: qubits.len(),
                        bits: bits.len(),
                    });
                }
                for (qubit, bit) in qubits.into_iter().zip(bits) {
                    circuit.measure(qubit, bit)?;
                }
                Ok(())
            }

            Statement::Reset { qubits } => {
                for qubit in self.resolve_all(qubits, &Scope::top_level(0, &self.inputs))? {
                    circuit.reset(qubit)?;
                }
                Ok(())
            }

            Statement::Barrier { qubits } => {
                if qubits.is_empty() {
                    circuit.barrier_all()?;
                } else {
                    let ids = self.resolve_all(qubits, &Scope::top_level(0, &self.inputs))?;
                    circuit.barrier(ids)?;
                }
                Ok(())
            }
        }
    }

    fn check_unique(&self, name: &str) -> ParseResult<()> {
        if self.qregs.contains_key(name)
            || self.cregs.contains_key(name)
            || self.inputs.contains(name)
        {
            return Err(ParseError::DuplicateDeclaration(name.to_string()));
        }
        Ok(())
    }

    fn resolve_qubit(&self, qubit: &QubitRef, scope: &Scope<'_>) -> ParseResult<Operand<QubitId>> {
        let Some(formals) = &scope.formals else {
            return lookup_register(&self.qregs, qubit);
        };
        if qubit.index.is_some() {
            return Err(ParseError::UnsupportedExpression(format!(
                "indexing gate argument '{}'",
                qubit.register
            )));
        }
        formals
            .get(qubit.register.as_str())
            .map(|&id| Operand::Single(id))
            .ok_or_else(|| ParseError::UndefinedIdentifier(qubit.register.clone()))
    }

    fn resolve_all(&self, qubits: &[QubitRef], scope: &Scope<'_>) -> ParseResult<Vec<QubitId>> {
        let operands = qubits
            .iter()
            .map(|q| self.resolve_qubit(q, scope))
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Operand::flatten(operands))
    }

    fn lower_gate_call(
        &self,
        circuit: &mut Circuit,
        call: &GateCall,
        scope: &Scope<'_>,
    ) -> ParseResult<()> {
        let params = call
            .params
            .iter()
            .map(|e| lower_expression(e, scope))
            .collect::<ParseResult<Vec<_>>>()?;
        let operands = call
            .qubits
            .iter()
            .map(|q| self.resolve_qubit(q, scope))
            .collect::<ParseResult<Vec<_>>>()?;

        let gate = self.build_gate(call, params, operands.len(), scope)?;
        for qubits in broadcast(&call.name, &operands)? {
            circuit.push(Instruction::gate(gate.clone(), qubits))?;
        }
        Ok(())
    }

    /// Resolve the callee and apply its control modifiers.
    fn build_gate(
        &self,
        call: &GateCall,
        params: Vec<ParameterExpression>,
        num_operands: usize,
        scope: &Scope<'_>,
    ) -> ParseResult<Gate> {
        let num_ctrl = control_count(call)?;
        let controls = num_ctrl as usize;
        if controls > 0 && num_operands <= controls {
            return Err(ParseError::WrongQubitCount {
                gate: call.name.clone(),
                expected: controls + 1,
                got: num_operands,
            });
        }
        let num_targets = num_operands - controls;

        if let Some((index, def)) = self.gates.lookup(&call.name, scope.visible) {
            if params.len() != def.params.len() {
                return Err(ParseError::WrongParameterCount {
                    gate: def.name.clone(),
                    expected: def.params.len(),
                    got: params.len(),
                });
            }
            if num_targets != def.qubits.len() {
                return Err(ParseError::WrongQubitCount {
                    gate: def.name.clone(),
                    expected: def.qubits.len() + controls,
                    got: num_operands,
                });
            }

            let body = self.instantiate(index, def, &params)?;
            let custom = CustomGate::new(def.name.clone(), 0)
                .with_params(params)
                .with_definition(body);
            return Ok(match num_ctrl {
                0 => Gate::custom(custom),
                k => Gate::controlled(custom, k),
            });
        }

        let gate = library::standard_gate(&call.name, &params, num_targets)
            .ok_or_else(|| ParseError::UnknownGate(call.name.clone()))??;
        if num_ctrl == 0 {
            return Ok(Gate::standard(gate));
        }
        let (base, carried) = library::split_controls(gate);
        Ok(Gate::controlled(base, num_ctrl + carried))
    }

    /// Expand the definition at `index` with its parameters bound to `params`.
    fn instantiate(
        &self,
        index: usize,
        def: &GateDef,
        params: &[ParameterExpression],
    ) -> ParseResult<Circuit> {
        let mut body = Circuit::with_size(def.name.clone(), def.qubits.len() as u32, 0);
        let scope = Scope {
            formals: Some(
                def.qubits
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.as_str(), QubitId(i as u32)))
                    .collect(),
            ),
            params: def
                .params
                .iter()
                .map(String::as_str)
                .zip(params.iter().cloned())
                .collect(),
            visible: index,
            inputs: None,
        };

        for op in &def.body {
            match op {
                GateOp::Call(call) => self.lower_gate_call(&mut body, call, &scope)?,
                GateOp::Barrier(qubits) if qubits.is_empty() => {
                    body.barrier_all()?;
                }
                GateOp::Barrier(qubits) => {
                    let ids = self.resolve_all(qubits, &scope)?;
                    body.barrier(ids)?;
                }
            }
        }
        Ok(body)
    }
}

/// Resolve `q` or `q[i]` against a register table.
fn lookup_register<T: Copy>(
    registers: &FxHashMap<String, Vec<T>>,
    reference: &RegisterRef,
) -> ParseResult<Operand<T>> {
    let ids = registers
        .get(&reference.register)
        .ok_or_else(|| ParseError::UndefinedIdentifier(reference.register.clone()))?;
    match reference.index {
        None => Ok(Operand::Register(ids.clone())),
        Some(index) => ids
            .get(index as usize)
            .map(|&id| Operand::Single(id))
            .ok_or_else(|| ParseError::IndexOutOfBounds {
                register: reference.register.clone(),
                index: index as usize,
                size: ids.len(),
            }),
    }
}

/// Expand register operands into one operand list per call.
///
/// All register operands must have the same size; single operands are
/// repeated in every call.
fn broadcast<T: Copy>(gate: &str, operands: &[Operand<T>]) -> ParseResult<Vec<Vec<T>>> {
    let sizes: Vec<usize> = operands
        .iter()
        .filter_map(|operand| match operand {
            Operand::Register(ids) => Some(ids.len()),
            Operand::Single(_) => None,
        })
        .collect();

    let width = sizes.first().copied().unwrap_or(1);
    if sizes.iter().any(|&size| size != width) {
        return Err(ParseError::BroadcastMismatch {
            gate: gate.to_string(),
            sizes,
        });
    }

    Ok((0..width)
        .map(|i| operands.iter().map(|operand| operand.element(i)).collect())
        .collect())
}

/// Total number of controls added by the modifier chain.
fn control_count(call: &GateCall) -> ParseResult<u32> {
    call.modifiers
        .iter()
        .try_fold(0u32, |total, modifier| match modifier {
            GateModifier::Ctrl(n) => Ok(total + n),
            other => Err(ParseError::UnsupportedModifier {
                modifier: other.keyword().to_string(),
                gate: call.name.clone(),
            }),
        })
}

fn lower_expression(expr: &Expression, scope: &Scope<'_>) -> ParseResult<ParameterExpression> {
    Ok(lower_expr(expr, scope)?.simplify())
}

#[allow(clippy::cast_precision_loss)]
fn lower_expr(expr: &Expression, scope: &Scope<'_>) -> ParseResult<ParameterExpression> {
    Ok(match expr {
        Expression::Int(v) => ParameterExpression::constant(*v as f64),
        Expression::Float(v) => ParameterExpression::constant(*v),
        Expression::Pi => ParameterExpression::Pi,
        Expression::Tau => ParameterExpression::constant(std::f64::consts::TAU),
        Expression::Euler => ParameterExpression::constant(std::f64::consts::E),
        Expression::Identifier(name) => match scope.params.get(name.as_str()) {
            Some(value) => value.clone(),
            None if scope.is_input(name) => ParameterExpression::symbol(name.clone()),
            None => return Err(ParseError::UndefinedIdentifier(name.clone())),
        },
        Expression::Neg(inner) => -lower_expr(inner, scope)?,
        Expression::Paren(inner) => lower_expr(inner, scope)?,
        Expression::BinOp { left, op, right } => {
            let l = lower_expr(left, scope)?;
            let r = lower_expr(right, scope)?;
            match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => l / r,
                BinOp::Pow => match (l.as_f64(), r.as_f64()) {
                    (Some(base), Some(exp)) => ParameterExpression::constant(base.powf(exp)),
                    _ => {
                        return Err(ParseError::UnsupportedExpression(format!(
                            "symbolic power ({l}) ** ({r})"
                        )));
                    }
                },
            }
        }
        Expression::FnCall { name, args } => {
            let args = args
                .iter()
                .map(|arg| lower_expr(arg, scope))
                .collect::<ParseResult<Vec<_>>>()?;
            let value = match args.as_slice() {
                [arg] => arg.as_f64().and_then(|x| apply_function(name, x)),
                _ => None,
            };
            value
                .map(ParameterExpression::constant)
                .ok_or_else(|| ParseError::UnsupportedExpression(format!("call to '{name}'")))?
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Dialect;
    use crate::parser::parse;

    fn lower3(source: &str) -> ParseResult<Circuit> {
        parse(source, Dialect::Qasm3)
    }

    #[test]
    fn test_registers_are_dense_in_declaration_order() {
        let circuit = lower3("OPENQASM 3.0; qubit[2] a; bit c; qubit b; x b;").unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 1);
        assert_eq!(circuit.instructions()[0].qubits, vec![QubitId(2)]);
    }

    #[test]
    fn test_broadcast_over_registers() {
        let circuit = lower3("OPENQASM 3.0; qubit[3] a; qubit[3] b; cx a, b; h a[0];").unwrap();
        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.instructions()[2].qubits, vec![QubitId(2), QubitId(5)]);

        let circuit = lower3("OPENQASM 3.0; qubit c; qubit[2] t; cx c, t;").unwrap();
        assert_eq!(circuit.instructions()[1].qubits, vec![QubitId(0), QubitId(2)]);

        let err = lower3("OPENQASM 3.0; qubit[2] a; qubit[3] b; cx a, b;").unwrap_err();
        assert!(matches!(err, ParseError::BroadcastMismatch { .. }));
    }

    #[test]
    fn test_measure_register_pairs() {
        let circuit = lower3("OPENQASM 3.0; qubit[2] q; bit[2] c; c = measure q;").unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.instructions()[1].clbits, vec![ClbitId(1)]);

        let err = lower3("OPENQASM 3.0; qubit[2] q; bit[3] c; c = measure q;").unwrap_err();
        assert!(matches!(err, ParseError::MeasureMismatch { qubits: 2, bits: 3 }));
    }

    #[test]
    fn test_index_out_of_bounds() {
        let err = lower3("OPENQASM 3.0; qubit[2] q; x q[2];").unwrap_err();
        assert!(matches!(err, ParseError::IndexOutOfBounds { index: 2, size: 2, .. }));
    }

    #[test]
    fn test_custom_gate_is_instantiated() {
        let source = r"
            OPENQASM 3.0;
            gate bell a, b { h a; cx a, b; }
            gate twice(theta) q { rz(theta) q; rz(2 * theta) q; }
            qubit[2] q;
            bell q[0], q[1];
            twice(0.25) q[0];
        ";
        let circuit = lower3(source).unwrap();
        assert_eq!(circuit.len(), 2);

        let bell = circuit.instructions()[0].definition().unwrap();
        assert_eq!(bell.name(), "bell");
        assert_eq!(bell.num_qubits(), 2);
        assert_eq!(bell.len(), 2);

        let twice = circuit.instructions()[1].definition().unwrap();
        let angles: Vec<_> = twice
            .instructions()
            .iter()
            .map(|i| i.params()[0].as_f64().unwrap())
            .collect();
        assert_eq!(angles, vec![0.25, 0.5]);
    }

    #[test]
    fn test_gate_scope_rules() {
        let err = lower3("OPENQASM 3.0; gate g a { x b; }  qubit q; g q;").unwrap_err();
        assert!(matches!(err, ParseError::UndefinedIdentifier(_)));

        let err = lower3("OPENQASM 3.0; gate g a { rz(theta) a; } qubit q; g q;").unwrap_err();
        assert!(matches!(err, ParseError::UndefinedIdentifier(_)));

        let err = lower3("OPENQASM 3.0; gate g a { g a; } qubit q; g q;").unwrap_err();
        assert!(matches!(err, ParseError::UnknownGate(_)));

        let err = lower3("OPENQASM 3.0; gate g a { x a; } gate g a { y a; }").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateDeclaration(_)));
    }

    #[test]
    fn test_user_definition_shadows_builtin() {
        let source = "OPENQASM 3.0; gate ch a, b { cz a, b; } qubit[2] q; ch q[0], q[1];";
        let circuit = lower3(source).unwrap();
        let body = circuit.instructions()[0].definition().unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body.instructions()[0].name(), "cz");
    }

    #[test]
    fn test_library_gate_available_without_include() {
        let circuit = lower3("OPENQASM 3.0; qubit[2] q; cu1(pi) q[0], q[1];").unwrap();
        let body = circuit.instructions()[0].definition().unwrap();
        assert_eq!(body.len(), 5);
    }

    #[test]
    fn test_control_modifiers() {
        let circuit = lower3("OPENQASM 3.0; qubit[4] q; ctrl @ x q[0], q[1];").unwrap();
        assert_eq!(circuit.instructions()[0].name(), "cx");
        assert_eq!(circuit.instructions()[0].control(), Some((1, "x")));

        let circuit = lower3("OPENQASM 3.0; qubit[4] q; ctrl(2) @ cx q[0], q[1], q[2], q[3];")
            .unwrap();
        assert_eq!(circuit.instructions()[0].control(), Some((3, "x")));
        assert_eq!(circuit.instructions()[0].name(), "c3x");

        let err = lower3("OPENQASM 3.0; qubit[2] q; inv @ x q[0];").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedModifier { .. }));

        let err = lower3("OPENQASM 3.0; qubit q; ctrl @ x q;").unwrap_err();
        assert!(matches!(err, ParseError::WrongQubitCount { .. }));
    }

    #[test]
    fn test_free_symbols_at_top_level() {
        let circuit = lower3("OPENQASM 3.0; input float theta; qubit q; rx(theta / 2) q;").unwrap();
        assert_eq!(
            circuit.free_symbols().into_iter().collect::<Vec<_>>(),
            vec!["theta".to_string()]
        );
    }

    #[test]
    fn test_undeclared_identifier_is_rejected() {
        let err = lower3("OPENQASM 3.0; qubit q; rx(pii) q;").unwrap_err();
        assert!(matches!(err, ParseError::UndefinedIdentifier(ref name) if name == "pii"));

        let err = lower3("OPENQASM 3.0; input float t; qubit t;").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateDeclaration(_)));

        // Inputs are not visible inside gate bodies.
        let source = "OPENQASM 3.0; input float t; gate r a { rx(t) a; } qubit q; r q;";
        assert!(matches!(
            lower3(source).unwrap_err(),
            ParseError::UndefinedIdentifier(_)
        ));
    }

    #[test]
    fn test_constant_expressions_fold() {
        let circuit = lower3("OPENQASM 3.0; qubit q; rz(2 ** 3 + sqrt(4)) q;").unwrap();
        assert_eq!(circuit.instructions()[0].params()[0].as_f64(), Some(10.0));

        let err = lower3("OPENQASM 3.0; input float theta; qubit q; rz(theta ** 2) q;")
            .unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedExpression(_)));
    }
}
