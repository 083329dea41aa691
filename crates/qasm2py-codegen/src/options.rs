//! Translation options.

use serde::{Deserialize, Serialize};

/// Variable name used when none is configured.
pub const DEFAULT_VARIABLE_NAME: &str = "qc";

/// Options controlling the generated Python.
///
/// Deserializes from a partial document; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    /// Name of the top-level circuit variable. `None` means `qc`.
    pub variable_name: Option<String>,
    /// Whether to emit the import preamble.
    pub include_imports: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            variable_name: None,
            include_imports: true,
        }
    }
}

impl TranslateOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the circuit variable name.
    #[must_use]
    pub fn with_variable_name(mut self, name: impl Into<String>) -> Self {
        self.variable_name = Some(name.into());
        self
    }

    /// Enable or disable the import preamble.
    #[must_use]
    pub fn with_imports(mut self, include: bool) -> Self {
        self.include_imports = include;
        self
    }

    /// The effective circuit variable name.
    pub fn variable_name(&self) -> &str {
        self.variable_name
            .as_deref()
            .unwrap_or(DEFAULT_VARIABLE_NAME)
    }
}
