//! qasm2py Command-Line Interface
//!
//! Converts OpenQASM 2 and 3 programs into Qiskit Python source.
//!
//! ```text
//! qasm2py convert -i bell.qasm -o bell.py
//! cat bell.qasm | qasm2py convert --var-name circuit --no-imports
//! qasm2py inspect -i bell.qasm --format json
//! ```
//!
//! Generated code goes to stdout (or `-o`); status lines and logs go to
//! stderr.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{convert, inspect, version};

/// qasm2py - translate OpenQASM circuits into Qiskit Python code
#[derive(Parser)]
#[command(name = "qasm2py")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an OpenQASM program into a Python script
    Convert {
        /// Input file (stdin if omitted or `-`)
        #[arg(short, long)]
        input: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Name of the circuit variable in the generated code
        #[arg(long, env = "QASM2PY_VAR_NAME")]
        var_name: Option<String>,

        /// Leave out the `from qiskit import ...` preamble
        #[arg(long, env = "QASM2PY_NO_IMPORTS")]
        no_imports: bool,

        /// YAML file with translation options
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Load a program and print the circuit it describes
    Inspect {
        /// Input file (stdin if omitted or `-`)
        #[arg(short, long)]
        input: Option<String>,

        /// Output format (json, qasm2, qasm3)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            var_name,
            no_imports,
            config,
        } => convert::execute(
            input.as_deref(),
            output.as_deref(),
            var_name.as_deref(),
            no_imports,
            config.as_deref(),
        ),
        Commands::Inspect { input, format } => inspect::execute(input.as_deref(), &format),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
