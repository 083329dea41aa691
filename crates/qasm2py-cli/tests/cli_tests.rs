//! CLI command parsing and configuration tests.
//!
//! The CLI is a binary crate, so argument parsing is checked against a
//! mirror of its clap structs and the config logic against the library
//! types it wraps.

// ============================================================================
// Config file tests
// ============================================================================

mod config_loading {
    use qasm2py_codegen::TranslateOptions;
    use std::fs;
    use std::path::Path;

    /// Equivalent to config::from_file
    fn from_file(path: &Path) -> anyhow::Result<TranslateOptions> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml_ng::from_str(&contents)?)
    }

    /// Equivalent to config::resolve
    fn resolve(
        config: Option<&Path>,
        var_name: Option<&str>,
        no_imports: bool,
    ) -> anyhow::Result<TranslateOptions> {
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

    #[test]
    fn test_full_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qasm2py.yaml");
        fs::write(&path, "variable_name: bell\ninclude_imports: false\n").unwrap();

        let options = from_file(&path).unwrap();
        assert_eq!(options.variable_name(), "bell");
        assert!(!options.include_imports);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qasm2py.yaml");
        fs::write(&path, "include_imports: false\n").unwrap();

        let options = from_file(&path).unwrap();
        assert_eq!(options.variable_name(), "qc");
        assert!(!options.include_imports);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qasm2py.yaml");
        fs::write(&path, "variable_name: from_file\n").unwrap();

        let options = resolve(Some(&path), Some("from_flag"), true).unwrap();
        assert_eq!(options.variable_name(), "from_flag");
        assert!(!options.include_imports);

        let options = resolve(Some(&path), None, false).unwrap();
        assert_eq!(options.variable_name(), "from_file");
        assert!(options.include_imports);
    }

    #[test]
    fn test_defaults_without_config() {
        assert_eq!(resolve(None, None, false).unwrap(), TranslateOptions::default());
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "include_imports: [not, a, bool]\n").unwrap();
        assert!(from_file(&path).is_err());

        assert!(from_file(&dir.path().join("missing.yaml")).is_err());
    }
}

// ============================================================================
// Conversion through files
// ============================================================================

mod conversion {
    use qasm2py_codegen::{TranslateOptions, translate};
    use std::fs;

    #[test]
    fn test_convert_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bell.qasm");
        let output = dir.path().join("bell.py");
        fs::write(
            &input,
            "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\nh q[0];\ncx q[0], q[1];\n",
        )
        .unwrap();

        let source = fs::read_to_string(&input).unwrap();
        let python = translate(&source, &TranslateOptions::default()).unwrap();
        fs::write(&output, format!("{python}\n")).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("from qiskit import QuantumCircuit\n"));
        assert!(written.ends_with("qc.h(0)\nqc.cx(0, 1)\n"));
    }

    #[test]
    fn test_unknown_dialect_message() {
        let err = translate("qreg q[1];", &TranslateOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Cannot detect OPENQASM version"));
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};
    use std::path::PathBuf;

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "qasm2py")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Convert {
            #[arg(short, long)]
            input: Option<String>,
            #[arg(short, long)]
            output: Option<String>,
            #[arg(long)]
            var_name: Option<String>,
            #[arg(long)]
            no_imports: bool,
            #[arg(short, long)]
            config: Option<PathBuf>,
        },
        Inspect {
            #[arg(short, long)]
            input: Option<String>,
            #[arg(short, long, default_value = "json")]
            format: String,
        },
        Version,
    }

    #[test]
    fn test_convert_defaults() {
        let cli = TestCli::try_parse_from(["qasm2py", "convert"]).unwrap();
        match cli.command {
            TestCommands::Convert {
                input,
                output,
                var_name,
                no_imports,
                config,
            } => {
                assert!(input.is_none());
                assert!(output.is_none());
                assert!(var_name.is_none());
                assert!(!no_imports);
                assert!(config.is_none());
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_convert_all_flags() {
        let cli = TestCli::try_parse_from([
            "qasm2py",
            "convert",
            "-i",
            "bell.qasm",
            "-o",
            "bell.py",
            "--var-name",
            "circuit",
            "--no-imports",
            "--config",
            "qasm2py.yaml",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Convert {
                input,
                output,
                var_name,
                no_imports,
                config,
            } => {
                assert_eq!(input.as_deref(), Some("bell.qasm"));
                assert_eq!(output.as_deref(), Some("bell.py"));
                assert_eq!(var_name.as_deref(), Some("circuit"));
                assert!(no_imports);
                assert_eq!(config, Some(PathBuf::from("qasm2py.yaml")));
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_inspect_format() {
        let cli = TestCli::try_parse_from(["qasm2py", "inspect", "-i", "a.qasm"]).unwrap();
        match cli.command {
            TestCommands::Inspect { format, .. } => assert_eq!(format, "json"),
            _ => panic!("Expected Inspect command"),
        }

        let cli = TestCli::try_parse_from(["qasm2py", "inspect", "--format", "qasm2"]).unwrap();
        match cli.command {
            TestCommands::Inspect { input, format } => {
                assert!(input.is_none());
                assert_eq!(format, "qasm2");
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_verbosity_is_global() {
        let cli = TestCli::try_parse_from(["qasm2py", "convert", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = TestCli::try_parse_from(["qasm2py", "-v", "version"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, TestCommands::Version));
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(TestCli::try_parse_from(["qasm2py", "run"]).is_err());
        assert!(TestCli::try_parse_from(["qasm2py"]).is_err());
    }
}
