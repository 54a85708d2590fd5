//! Main orchestration logic.

use crate::cli::Args;
use crate::config::MonoTsCheckConfig;
use crate::output::{CheckStatus, CheckSummary, Formatter};
use camino::{Utf8Path, Utf8PathBuf};
use miette::Diagnostic;
use thiserror::Error;
use ts_diagnostics::{
    absolutize, aggregate, parse_diagnostics, DiagnosticsError, FsSource, IgnoreList,
    RenderOptions, Report,
};
use tsc_runner::{is_typescript_file, TscError, TscOutcome, TscRunner};

/// Orchestration errors.
#[derive(Debug, Error, Diagnostic)]
pub enum OrchestratorError {
    /// The working directory is unusable.
    #[error("failed to resolve the working directory: {0}")]
    WorkingDirectory(String),

    /// No tsc binary was given or found.
    #[error("tsc binary not found")]
    #[diagnostic(help("install typescript in the project or pass --tsc <path>"))]
    TscNotFound,

    /// tsc could not be run or its output could not be read.
    #[error(transparent)]
    Tsc(#[from] TscError),

    /// Diagnostics could not be processed.
    #[error(transparent)]
    Diagnostics(#[from] DiagnosticsError),

    /// The results could not be serialized.
    #[error("failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Runs the check and prints its results.
pub async fn run(args: Args) -> Result<CheckSummary, OrchestratorError> {
    let cwd = std::env::current_dir()
        .map_err(|e| OrchestratorError::WorkingDirectory(e.to_string()))
        .and_then(|p| {
            Utf8PathBuf::try_from(p)
                .map_err(|e| OrchestratorError::WorkingDirectory(e.to_string()))
        })?;

    let (report, summary) = check(&args, &cwd).await?;
    let output = Formatter::new(args.output).format(&report, &summary)?;
    print!("{output}");
    Ok(summary)
}

/// Runs the check from `root` without printing.
async fn check(
    args: &Args,
    root: &Utf8Path,
) -> Result<(Report, CheckSummary), OrchestratorError> {
    let files = input_files(&args.files, root);
    if files.is_empty() {
        tracing::debug!("no TypeScript files among the arguments");
        return Ok((Report::default(), CheckSummary::clean(CheckStatus::Skipped, 0)));
    }

    let config = MonoTsCheckConfig::load(&absolutize(&args.config, root));
    let ignore = if args.ignore {
        IgnoreList::new(&config.ignore, root)?
    } else {
        IgnoreList::disabled()
    };

    let tsc_path = match &args.tsc {
        Some(path) => absolutize(path, root),
        None => TscRunner::find_tsc(Some(root)).ok_or(OrchestratorError::TscNotFound)?,
    };
    let project = args.project.as_deref().map(|p| absolutize(p, root));
    let runner = TscRunner::new(tsc_path, root.to_owned(), project);

    let outcome = runner.check(&files, &config.always_include).await?;
    let total_files = files.len();

    let raw = match outcome {
        TscOutcome::Skipped => {
            return Ok((
                Report::default(),
                CheckSummary::clean(CheckStatus::Skipped, total_files),
            ))
        }
        TscOutcome::Passed => {
            return Ok((
                Report::default(),
                CheckSummary::clean(CheckStatus::Passed, total_files),
            ))
        }
        TscOutcome::MissingOutput => {
            return Ok((
                Report::default(),
                CheckSummary::clean(CheckStatus::MissingOutput, total_files),
            ))
        }
        TscOutcome::Diagnostics(raw) => raw,
    };

    let parsed = parse_diagnostics(&raw, &files, &ignore);
    tracing::debug!(
        reported = parsed.diagnostics.len(),
        ignored = parsed.stats.ignored_error,
        "parsed tsc diagnostics"
    );

    let options = RenderOptions {
        context_lines: args.context,
    };
    let report = aggregate(&parsed.diagnostics, &FsSource, options)?;
    let status = if report.error_count() == 0 {
        CheckStatus::Passed
    } else {
        CheckStatus::Failed
    };
    let summary = CheckSummary {
        status,
        stats: parsed.stats,
        error_count: report.error_count(),
        error_file_count: report.file_count(),
    };

    Ok((report, summary))
}

/// Keeps the `.ts`/`.tsx` arguments, made absolute against `root`.
fn input_files(args: &[Utf8PathBuf], root: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut files: Vec<Utf8PathBuf> = Vec::with_capacity(args.len());
    for file in args.iter().filter(|f| is_typescript_file(f)) {
        let file = absolutize(file, root);
        if !files.contains(&file) {
            files.push(file);
        }
    }
    files
}
