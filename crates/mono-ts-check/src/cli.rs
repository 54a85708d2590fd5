//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Type-check a subset of files in a TypeScript monorepo.
#[derive(Debug, Parser)]
#[command(name = "mono-ts-check")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files to check (only .ts and .tsx files are checked)
    pub files: Vec<Utf8PathBuf>,

    /// Path to the project tsconfig.json
    #[arg(short = 'p', long)]
    pub project: Option<Utf8PathBuf>,

    /// Drop diagnostics of files matched by the config's ignore list
    #[arg(long)]
    pub ignore: bool,

    /// Path to the config file
    #[arg(long, default_value = "monoTsCheckConfig.js")]
    pub config: Utf8PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Source lines shown around each diagnostic
    #[arg(long, default_value_t = 1)]
    pub context: u32,

    /// Path to the tsc binary
    #[arg(long)]
    pub tsc: Option<Utf8PathBuf>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report with code snippets (default)
    #[default]
    Human,
    /// JSON output
    Json,
    /// Machine-readable (one line per diagnostic)
    Machine,
}
