//! # Aegis Script
//!
//! Compile, check, disassemble and run Aegis scripts.
//!

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod term;

#[derive(Parser, Debug)]
#[command(name = "aegis", version)]
#[command(about = "Compile and run Aegis scripts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile scripts into one instruction stream
    Compile {
        #[arg(required = true)]
        scripts: Vec<PathBuf>,

        /// Output file, defaults to the first script with an .aeb extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the compile listing to this file
        #[arg(long)]
        listing: Option<PathBuf>,

        /// Enum files loaded before the scripts
        #[arg(long = "enum")]
        enums: Vec<PathBuf>,

        /// Definition files loaded before the scripts
        #[arg(long = "def")]
        defs: Vec<PathBuf>,
    },
    /// Compile scripts and run them on the console
    Run {
        #[arg(required = true)]
        scripts: Vec<PathBuf>,

        /// Instructions executed between interrupt checks
        #[arg(long, default_value_t = 5000)]
        cycles: usize,

        #[arg(long = "enum")]
        enums: Vec<PathBuf>,

        #[arg(long = "def")]
        defs: Vec<PathBuf>,
    },
    /// Compile scripts and scan the result without running it
    Check {
        #[arg(required = true)]
        scripts: Vec<PathBuf>,

        #[arg(long = "enum")]
        enums: Vec<PathBuf>,

        #[arg(long = "def")]
        defs: Vec<PathBuf>,
    },
    /// Disassemble a compiled instruction stream
    Dis { binary: PathBuf },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    term::main(cli.command);
}
