//! qasm2py Circuit Intermediate Representation
//!
//! The in-memory circuit model shared by the QASM loader and the Python
//! code generator.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] are dense handles
//!   scoped to one circuit
//! - **Gates**: [`StandardGate`] for the natively supported gates and
//!   [`CustomGate`] for composite gates that carry their own definition
//! - **Parameters**: [`ParameterExpression`] for numeric or symbolic angles
//! - **Instructions**: [`Instruction`] combining an operation with its operands
//! - **Circuit**: [`Circuit`] ordered instruction list with validation
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qasm2py_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure(QubitId(0), ClbitId(0)).unwrap();
//! circuit.measure(QubitId(1), ClbitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.instructions().len(), 4);
//! ```
//!
//! # Example: Composite Gate
//!
//! ```rust
//! use qasm2py_ir::{Circuit, CustomGate, ParameterExpression, QubitId};
//!
//! let mut body = Circuit::with_size("rot", 1, 0);
//! body.rz(ParameterExpression::symbol("theta"), QubitId(0)).unwrap();
//!
//! let gate = CustomGate::new("rot", 1).with_definition(body);
//! let mut circuit = Circuit::with_size("main", 1, 0);
//! circuit.gate(gate, &[QubitId(0)]).unwrap();
//!
//! assert!(circuit.instructions()[0].definition().is_some());
//! assert!(circuit.free_symbols().contains("theta"));
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{ControlInfo, CustomGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use parameter::ParameterExpression;
pub use qubit::{Clbit, ClbitId, Qubit, QubitId, RegisterSlot};
