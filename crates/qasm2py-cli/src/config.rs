//! Translation options from the command line, environment and config file.
//!
//! Precedence (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables (`QASM2PY_VAR_NAME`, `QASM2PY_NO_IMPORTS`)
//! 3. YAML configuration file
//! 4. Default values
//!
//! Flags and environment variables are merged by clap before they get here.

use std::path::Path;

use anyhow::{Context, Result};
use qasm2py_codegen::TranslateOptions;
use tracing::debug;

/// Load options from a YAML file. Missing fields keep their defaults.
pub fn from_file(path: &Path) -> Result<TranslateOptions> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let options: TranslateOptions = serde_yaml_ng::from_str(&contents)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    debug!("Loaded options from {}: {options:?}", path.display());
    Ok(options)
}

/// Resolve the effective options for a conversion.
pub fn resolve(
    config: Option<&Path>,
    var_name: Option<&str>,
    no_imports: bool,
) -> Result<TranslateOptions> {
    let mut options = match config {
        Some(path) => from_file(path)?,
        None => TranslateOptions::default(),
    };

    if let Some(name) = var_name {
        options.variable_name = Some(name.to_string());
    }
    if no_imports {
        options.include_imports = false;
    }
    Ok(options)
}
