//! Convert command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use tracing::info;

use qasm2py_codegen::translate;

use super::common::{input_label, read_input, write_output};
use crate::config;

/// Execute the convert command.
pub fn execute(
    input: Option<&str>,
    output: Option<&str>,
    var_name: Option<&str>,
    no_imports: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let options = config::resolve(config_path, var_name, no_imports)?;
    info!(
        "Converting {} (variable '{}', imports {})",
        input_label(input),
        options.variable_name(),
        if options.include_imports { "on" } else { "off" }
    );

    let source = read_input(input)?;
    let python = translate(&source, &options)?;
    write_output(output, &python)?;

    if let Some(path) = output {
        eprintln!(
            "{} Converted {} -> {}",
            style("✓").green().bold(),
            style(input_label(input)).green(),
            style(path).green()
        );
    }
    Ok(())
}
