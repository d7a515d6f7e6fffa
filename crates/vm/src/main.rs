//! Lit VM CLI
//!
//! Command-line interface for running compiled `.lbc` Lit bytecode
//! programs.

use clap::{Parser, Subcommand};
use lit_vm::{run_file, VmConfig};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "lit")]
#[command(about = "Lit VM - run compiled .lbc bytecode programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Start the interactive REPL (not yet implemented)
    #[arg(long)]
    repl: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a compiled .lbc program
    Run {
        /// Path to the .lbc bytecode file
        program: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lit_vm=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.repl {
        eprintln!("the Lit REPL is not implemented yet");
        process::exit(0);
    }

    let Some(Commands::Run { program }) = cli.command else {
        eprintln!("usage: lit run <program.lbc>");
        process::exit(0);
    };

    if program.extension().and_then(|e| e.to_str()) != Some("lbc") {
        eprintln!("{}: expected a .lbc file, not running it", program.display());
        process::exit(0);
    }

    match run_file(&program, VmConfig::new()) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
