//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pybox",
    version,
    about = "Execute Python source with automatic dependency installation and artifact harvesting"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a Python file and print the result as JSON
    Run {
        /// Path to the Python source file
        file: PathBuf,

        /// Augment the source for Manim rendering and harvest artifacts
        #[arg(long)]
        render: bool,

        /// Execution timeout in seconds (default: PYBOX_TIMEOUT_SECS or 30)
        #[arg(long)]
        timeout: Option<u64>,

        /// Log warnings and errors only
        #[arg(long)]
        quiet: bool,
    },
}
