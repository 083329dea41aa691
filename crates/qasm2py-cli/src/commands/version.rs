//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - OpenQASM to Qiskit Python translator",
        style("qasm2py").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qasm2py-ir       Circuit intermediate representation");
    println!("  qasm2py-qasm     OpenQASM 2/3 loader and emitter");
    println!("  qasm2py-codegen  Qiskit Python code generation");
    println!("  qasm2py-cli      Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
