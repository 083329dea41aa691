//! Shared helpers for CLI commands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Read program text from a file, or from stdin for `None` and `-`.
pub fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read from stdin")?;
            Ok(source)
        }
        Some(path) => {
            if !Path::new(path).exists() {
                anyhow::bail!("File not found: {path}");
            }
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
        }
    }
}

/// Write text to a file, or to stdout for `None`.
pub fn write_output(path: Option<&str>, text: &str) -> Result<()> {
    match path {
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{text}").context("Failed to write to stdout")
        }
        Some(path) => {
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("Failed to write file: {path}"))
        }
    }
}

/// Display name for an input argument.
pub fn input_label(path: Option<&str>) -> &str {
    match path {
        None | Some("-") => "<stdin>",
        Some(path) => path,
    }
}
