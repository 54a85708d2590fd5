//! mono-ts-check: type-check a subset of files in a TypeScript monorepo.

mod cli;
mod config;
mod orchestrator;
mod output;

use clap::Parser;
use cli::Args;
use miette::{Diagnostic, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the stderr logger. `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    match orchestrator::run(args).await {
        Ok(summary) => {
            if summary.failed() {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(help) = e.help() {
                eprintln!("  help: {}", help);
            }
            std::process::exit(1);
        }
    }
}
