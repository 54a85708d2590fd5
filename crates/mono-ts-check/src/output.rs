//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8Path;
use serde::Serialize;
use ts_diagnostics::{Report, RunStatistics};

/// How a check run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckStatus {
    /// No TypeScript file was requested.
    Skipped,
    /// tsc failed without leaving its build info behind.
    MissingOutput,
    /// Nothing left to report.
    Passed,
    /// At least one diagnostic was reported.
    Failed,
}

/// Summary of a check run.
#[derive(Debug, Clone)]
pub struct CheckSummary {
    /// How the run ended.
    pub status: CheckStatus,
    /// Counts collected while filtering diagnostics.
    pub stats: RunStatistics,
    /// Number of reported diagnostics.
    pub error_count: usize,
    /// Number of files with reported diagnostics.
    pub error_file_count: usize,
}

impl CheckSummary {
    /// A summary for a run that reported nothing.
    pub fn clean(status: CheckStatus, total_files: usize) -> Self {
        Self {
            status,
            stats: RunStatistics {
                total_files,
                ..Default::default()
            },
            error_count: 0,
            error_file_count: 0,
        }
    }

    /// Returns whether the process should exit with a failure status.
    pub fn failed(&self) -> bool {
        self.status == CheckStatus::Failed
    }

    /// Formats the summary lines.
    pub fn format(&self) -> String {
        let mut lines = match self.status {
            CheckStatus::Skipped => {
                vec!["No TypeScript files given, checking process skipped.".to_string()]
            }
            CheckStatus::MissingOutput => {
                vec!["Cannot find tsc output file, checking process skipped.".to_string()]
            }
            CheckStatus::Passed => vec![
                "Typescript checked passed.".to_string(),
                format!("Found 0 error in {} file(s).", self.stats.total_files),
            ],
            CheckStatus::Failed => vec![
                "Typescript check failed.".to_string(),
                format!(
                    "Found {} error(s) in {} file(s).",
                    self.error_count, self.error_file_count
                ),
            ],
        };

        if self.stats.ignored_error > 0 {
            lines.push(format!(
                "Ignored {} error(s) in {} file(s).",
                self.stats.ignored_error, self.stats.ignored_files
            ));
        }

        lines.join("\n")
    }
}

/// A diagnostic in JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDiagnostic<'a> {
    /// The file path.
    pub file: &'a Utf8Path,
    /// 1-based start line.
    pub line: u32,
    /// 1-based start column.
    pub column: u32,
    /// 1-based end line.
    pub end_line: u32,
    /// 1-based end column.
    pub end_column: u32,
    /// Start offset in UTF-16 code units.
    pub start: u32,
    /// Span length in UTF-16 code units.
    pub length: u32,
    /// The TypeScript error code.
    pub code: Option<u32>,
    /// The full message, chain included.
    pub message: String,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    status: CheckStatus,
    stats: &'a RunStatistics,
    diagnostics: Vec<JsonDiagnostic<'a>>,
}

/// Formats check results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the whole run: the report followed by the summary.
    pub fn format(&self, report: &Report, summary: &CheckSummary) -> serde_json::Result<String> {
        match self.format {
            OutputFormat::Human => Ok(Self::format_human(report, summary)),
            OutputFormat::Json => Self::format_json(report, summary),
            OutputFormat::Machine => Ok(Self::format_machine(report)),
        }
    }

    /// Formats as human-readable output.
    fn format_human(report: &Report, summary: &CheckSummary) -> String {
        let mut output = report.render();
        output.push_str(&summary.format());
        output.push('\n');
        output
    }

    /// Formats diagnostics into JSON-ready structs.
    pub fn format_json_diagnostics(report: &Report) -> Vec<JsonDiagnostic<'_>> {
        report
            .entries()
            .map(|(file, entry)| JsonDiagnostic {
                file,
                line: entry.position.line,
                column: entry.position.column,
                end_line: entry.position.end_line,
                end_column: entry.position.end_column,
                start: entry.diagnostic.start,
                length: entry.diagnostic.length,
                code: entry.diagnostic.code,
                message: entry.diagnostic.message.flatten(),
            })
            .collect()
    }

    /// Formats as a single JSON document.
    fn format_json(report: &Report, summary: &CheckSummary) -> serde_json::Result<String> {
        let output = JsonOutput {
            status: summary.status,
            stats: &summary.stats,
            diagnostics: Self::format_json_diagnostics(report),
        };
        let mut json = serde_json::to_string_pretty(&output)?;
        json.push('\n');
        Ok(json)
    }

    /// Formats as machine-readable output, one line per diagnostic.
    fn format_machine(report: &Report) -> String {
        let mut output = String::new();
        for (file, entry) in report.entries() {
            output.push_str(&format!(
                "ERROR {}:{}:{} {}",
                file,
                entry.position.line,
                entry.position.column,
                entry.diagnostic.message.text()
            ));
            if let Some(code) = entry.diagnostic.code {
                output.push_str(&format!(" (TS{code})"));
            }
            output.push('\n');
        }
        output
    }
}
