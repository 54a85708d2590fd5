//! Grouping of diagnostics by file and rendering of the per-file report.

use crate::diagnostic::NormalizedDiagnostic;
use crate::render::{render_block, RenderOptions};
use crate::DiagnosticsError;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use source_map::{LineIndex, ResolvedPosition};

/// Supplies the text of source files for snippet rendering.
pub trait SourceProvider {
    /// Reads the full text of `path`.
    fn read(&self, path: &Utf8Path) -> std::io::Result<String>;
}

/// Reads sources from disk, replacing invalid UTF-8 sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl SourceProvider for FsSource {
    fn read(&self, path: &Utf8Path) -> std::io::Result<String> {
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// A rendered diagnostic.
#[derive(Debug, Clone)]
pub struct ReportEntry {
    /// The diagnostic.
    pub diagnostic: NormalizedDiagnostic,
    /// Where it points.
    pub position: ResolvedPosition,
    /// The display block.
    pub block: String,
}

/// All rendered diagnostics of one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// The file path.
    pub path: Utf8PathBuf,
    /// Entries in compiler order.
    pub entries: Vec<ReportEntry>,
}

/// The rendered diagnostics of a run, grouped by file.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Files in order of first appearance.
    pub files: Vec<FileReport>,
}

impl Report {
    /// Number of rendered diagnostics.
    pub fn error_count(&self) -> usize {
        self.files.iter().map(|f| f.entries.len()).sum()
    }

    /// Number of distinct files with diagnostics.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Iterates over all entries with their file.
    pub fn entries(&self) -> impl Iterator<Item = (&Utf8Path, &ReportEntry)> {
        self.files
            .iter()
            .flat_map(|f| f.entries.iter().map(move |e| (f.path.as_path(), e)))
    }

    /// Renders the report: a header per file, its blocks separated by blank
    /// lines, and a blank line closing each file.
    pub fn render(&self) -> String {
        let mut output = String::new();
        for file in &self.files {
            output.push_str(file.path.as_str());
            output.push('\n');
            let blocks: Vec<&str> = file.entries.iter().map(|e| e.block.as_str()).collect();
            output.push_str(&blocks.join("\n\n"));
            output.push_str("\n\n");
        }
        output
    }
}

/// Groups diagnostics by file, keeping first-seen file order and per-file order.
pub fn group_by_file(
    diagnostics: &[NormalizedDiagnostic],
) -> IndexMap<&Utf8Path, Vec<&NormalizedDiagnostic>> {
    let mut groups: IndexMap<&Utf8Path, Vec<&NormalizedDiagnostic>> = IndexMap::new();
    for diagnostic in diagnostics {
        groups
            .entry(diagnostic.file.as_path())
            .or_default()
            .push(diagnostic);
    }
    groups
}

/// Resolves and renders every diagnostic, reading each file once.
///
/// Fails on the first file that cannot be read; no partial report is returned.
pub fn aggregate<S: SourceProvider + ?Sized>(
    diagnostics: &[NormalizedDiagnostic],
    sources: &S,
    options: RenderOptions,
) -> Result<Report, DiagnosticsError> {
    let mut report = Report::default();

    for (path, group) in group_by_file(diagnostics) {
        let text = sources
            .read(path)
            .map_err(|source| DiagnosticsError::SourceRead {
                path: path.to_owned(),
                source,
            })?;
        let index = LineIndex::new(&text);

        let entries = group
            .into_iter()
            .map(|diagnostic| {
                let position = ResolvedPosition::resolve_with(
                    &index,
                    &text,
                    diagnostic.span(),
                    options.context_lines,
                );
                ReportEntry {
                    block: render_block(&diagnostic.message, &position),
                    diagnostic: diagnostic.clone(),
                    position,
                }
            })
            .collect();

        report.files.push(FileReport {
            path: path.to_owned(),
            entries,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Message;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::Write;

    #[derive(Default)]
    struct MemorySource {
        files: HashMap<Utf8PathBuf, String>,
        reads: RefCell<Vec<Utf8PathBuf>>,
    }

    impl MemorySource {
        fn with(mut self, path: &str, text: &str) -> Self {
            self.files.insert(path.into(), text.to_string());
            self
        }
    }

    impl SourceProvider for MemorySource {
        fn read(&self, path: &Utf8Path) -> std::io::Result<String> {
            self.reads.borrow_mut().push(path.to_owned());
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
        }
    }

    fn diag(file: &str, start: u32, length: u32, message: &str) -> NormalizedDiagnostic {
        NormalizedDiagnostic {
            file: file.into(),
            start,
            length,
            message: Message::from(message),
            code: None,
        }
    }

    #[test]
    fn test_single_type_error() {
        let sources = MemorySource::default().with("/a.ts", "const x = 1;\nconst y: string = x;\n");
        let diagnostics = vec![diag("/a.ts", 10, 3, "Type error")];

        let report = aggregate(&diagnostics, &sources, RenderOptions::default()).unwrap();

        assert_eq!(report.error_count(), 1);
        assert_eq!(report.file_count(), 1);
        let (path, entry) = report.entries().next().unwrap();
        assert_eq!(path, Utf8Path::new("/a.ts"));
        assert_eq!((entry.position.line, entry.position.column), (1, 11));
        assert!(entry.block.starts_with("Type error\n"));
        assert!(entry.block.contains("  1 | const x = 1;\n    |           ^"));
    }

    #[test]
    fn test_grouping_keeps_first_seen_order() {
        let diagnostics = vec![
            diag("/b.ts", 0, 1, "b1"),
            diag("/a.ts", 0, 1, "a1"),
            diag("/b.ts", 2, 1, "b2"),
            diag("/c.ts", 0, 1, "c1"),
            diag("/a.ts", 2, 1, "a2"),
        ];

        let groups = group_by_file(&diagnostics);
        let files: Vec<&str> = groups.keys().map(|p| p.as_str()).collect();
        assert_eq!(files, vec!["/b.ts", "/a.ts", "/c.ts"]);

        let flattened: Vec<&str> = groups
            .values()
            .flatten()
            .map(|d| d.message.text())
            .collect();
        assert_eq!(flattened, vec!["b1", "b2", "a1", "a2", "c1"]);
    }

    #[test]
    fn test_each_file_read_once() {
        let sources = MemorySource::default()
            .with("/a.ts", "let a = b;\nlet c = d;\n")
            .with("/b.ts", "x;\n");
        let diagnostics = vec![
            diag("/a.ts", 8, 1, "Cannot find name 'b'."),
            diag("/b.ts", 0, 1, "Cannot find name 'x'."),
            diag("/a.ts", 19, 1, "Cannot find name 'd'."),
        ];

        let report = aggregate(&diagnostics, &sources, RenderOptions::default()).unwrap();

        assert_eq!(
            *sources.reads.borrow(),
            vec![Utf8PathBuf::from("/a.ts"), Utf8PathBuf::from("/b.ts")]
        );
        assert_eq!(report.error_count(), 3);
        assert_eq!(report.file_count(), 2);
        let lines: Vec<u32> = report.files[0]
            .entries
            .iter()
            .map(|e| e.position.line)
            .collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_unreadable_source_is_fatal() {
        let sources = MemorySource::default().with("/a.ts", "ok;\n");
        let diagnostics = vec![diag("/a.ts", 0, 1, "one"), diag("/gone.ts", 0, 1, "two")];

        let err = aggregate(&diagnostics, &sources, RenderOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            DiagnosticsError::SourceRead { ref path, .. } if path.as_str() == "/gone.ts"
        ));
    }

    #[test]
    fn test_render_report_layout() {
        let sources = MemorySource::default().with("/a.ts", "a;\nb;\n");
        let diagnostics = vec![diag("/a.ts", 0, 1, "first"), diag("/a.ts", 3, 1, "second")];
        let options = RenderOptions { context_lines: 0 };

        let report = aggregate(&diagnostics, &sources, options).unwrap();

        let expected = [
            "/a.ts",
            "first",
            "  --> 1:1",
            "  1 | a;",
            "    | ^",
            "",
            "second",
            "  --> 2:1",
            "  2 | b;",
            "    | ^",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(report.render(), expected);
    }

    #[test]
    fn test_fs_source_reads_lossily() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"let s = \"\xff\";\n").unwrap();
        let path = Utf8PathBuf::try_from(file.path().to_path_buf()).unwrap();

        let text = FsSource.read(&path).unwrap();
        assert!(text.starts_with("let s = \""));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        let report = aggregate(&[], &FsSource, RenderOptions::default()).unwrap();
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.file_count(), 0);
        assert_eq!(report.render(), "");
    }
}
