mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use pybox::Executor;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            render,
            timeout,
            quiet,
        } => {
            if quiet {
                std::env::set_var("PYBOX_QUIET", "1");
            }
            pybox_core::observability::init_tracing();

            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("Read source file {}", file.display()))?;

            let executor = Executor::new();
            let timeout = timeout.unwrap_or_else(|| executor.default_timeout_secs());
            let result = executor.execute(&source, timeout, render);

            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
