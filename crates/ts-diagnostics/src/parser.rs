//! Filtering and normalization of raw compiler diagnostics.

use crate::diagnostic::{NormalizedDiagnostic, RawDiagnosticEntry, RawDiagnostics, RunStatistics};
use crate::ignore::IgnoreList;
use crate::path::normalize_path;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;

/// The result of parsing raw diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Diagnostics of requested, non-ignored files, in compiler order.
    pub diagnostics: Vec<NormalizedDiagnostic>,
    /// Run counters.
    pub stats: RunStatistics,
}

impl ParseOutcome {
    /// Returns true when nothing is left to report.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Restricts `raw` to `input_files`, applies `ignore` and counts what was dropped.
///
/// `input_files` are expected to be absolute; they are compared with the raw
/// file paths after lexical normalization. Files the compiler reported that
/// were not requested are skipped without being counted.
pub fn parse_diagnostics(
    raw: &RawDiagnostics,
    input_files: &[Utf8PathBuf],
    ignore: &IgnoreList,
) -> ParseOutcome {
    let requested: HashSet<Utf8PathBuf> = input_files
        .iter()
        .map(|path| normalize_path(path))
        .collect();

    let mut stats = RunStatistics {
        total_files: input_files.len(),
        ..RunStatistics::default()
    };
    let mut diagnostics = Vec::new();

    for (path, entries) in raw.iter() {
        let path = normalize_path(path);
        if entries.is_empty() || !requested.contains(&path) {
            continue;
        }

        if ignore.is_ignored(&path) {
            stats.ignored_files += 1;
            stats.ignored_error += entries.len();
            continue;
        }

        diagnostics.extend(entries.iter().map(|entry| normalize_entry(&path, entry)));
    }

    stats.total_errors = diagnostics.len() + stats.ignored_error;

    ParseOutcome { diagnostics, stats }
}

fn normalize_entry(file: &Utf8Path, entry: &RawDiagnosticEntry) -> NormalizedDiagnostic {
    NormalizedDiagnostic {
        file: file.to_owned(),
        start: entry.start,
        length: entry.length,
        message: entry.message_text.clone(),
        code: entry.code,
    }
}
