//! Diagnostic types.

use crate::DiagnosticsError;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use source_map::Span;

/// A diagnostic message as reported by the compiler.
///
/// The compiler emits either a plain string or a chain of nested messages
/// explaining the top-level one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// A single message.
    Plain(String),
    /// A message with nested explanations.
    Chain(MessageChain),
}

/// Shown for a message whose chain carries no text at all.
pub const EMPTY_MESSAGE: &str = "(no message text)";

/// A message with optional nested sub-messages.
///
/// Links without text occur in module-resolution chains, which carry an
/// `info` object instead. They are skipped when displaying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageChain {
    /// This level's text.
    #[serde(default)]
    pub message_text: String,
    /// Nested explanations, one level deeper.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next: Vec<MessageChain>,
}

impl MessageChain {
    /// Creates a chain link without children.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            message_text: text.into(),
            next: Vec::new(),
        }
    }

    /// Adds a nested message.
    pub fn with_next(mut self, next: MessageChain) -> Self {
        self.next.push(next);
        self
    }

    fn collect<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a str)>) {
        let child_depth = if self.message_text.is_empty() {
            depth
        } else {
            out.push((depth, self.message_text.as_str()));
            depth + 1
        };
        for child in &self.next {
            child.collect(child_depth, out);
        }
    }
}

impl Message {
    /// Returns the top-level text.
    pub fn text(&self) -> &str {
        match self {
            Message::Plain(text) => text,
            Message::Chain(chain) => {
                let mut out = Vec::new();
                chain.collect(0, &mut out);
                out.first().map_or(EMPTY_MESSAGE, |(_, text)| *text)
            }
        }
    }

    /// Flattens the message into `(depth, text)` pairs in display order.
    pub fn entries(&self) -> Vec<(usize, &str)> {
        match self {
            Message::Plain(text) => vec![(0, text.as_str())],
            Message::Chain(chain) => {
                let mut out = Vec::new();
                chain.collect(0, &mut out);
                out
            }
        }
    }

    /// Renders the message with two spaces of indentation per nesting level.
    pub fn flatten(&self) -> String {
        let mut lines = Vec::new();
        for (depth, text) in self.entries() {
            let indent = "  ".repeat(depth);
            for line in text.lines() {
                lines.push(format!("{indent}{line}"));
            }
        }
        if lines.is_empty() {
            return EMPTY_MESSAGE.to_string();
        }
        lines.join("\n")
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Plain(text.to_string())
    }
}

impl From<MessageChain> for Message {
    fn from(chain: MessageChain) -> Self {
        Message::Chain(chain)
    }
}

/// A diagnostic entry as found in the compiler output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDiagnosticEntry {
    /// The owning file, when the compiler states it explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Utf8PathBuf>,
    /// Start offset in UTF-16 code units.
    pub start: u32,
    /// Span length in UTF-16 code units.
    pub length: u32,
    /// The message.
    pub message_text: Message,
    /// The TypeScript error code (`2322` for `TS2322`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
}

impl RawDiagnosticEntry {
    /// Creates an entry with no explicit owning file.
    pub fn new(start: u32, length: u32, message: impl Into<Message>) -> Self {
        Self {
            file: None,
            start,
            length,
            message_text: message.into(),
            code: None,
        }
    }
}

/// Compiler diagnostics keyed by file path, in the order the compiler listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDiagnostics {
    files: IndexMap<Utf8PathBuf, Vec<RawDiagnosticEntry>>,
}

impl RawDiagnostics {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object of the form `{ "<path>": [entry, ...] }`.
    pub fn from_json(json: &str) -> Result<Self, DiagnosticsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Appends entries for a file, keeping the file's first-seen position.
    pub fn extend_file(
        &mut self,
        path: impl Into<Utf8PathBuf>,
        entries: impl IntoIterator<Item = RawDiagnosticEntry>,
    ) {
        self.files.entry(path.into()).or_default().extend(entries);
    }

    /// Returns the entries for a file.
    pub fn get(&self, path: &Utf8Path) -> Option<&[RawDiagnosticEntry]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Iterates over files and their entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Utf8Path, &[RawDiagnosticEntry])> {
        self.files
            .iter()
            .map(|(path, entries)| (path.as_path(), entries.as_slice()))
    }

    /// Returns the total number of entries across all files.
    pub fn entry_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Returns true if no file has any entry.
    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

/// A diagnostic reduced to what grouping and rendering need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedDiagnostic {
    /// The requested input file the diagnostic belongs to.
    pub file: Utf8PathBuf,
    /// Start offset in UTF-16 code units.
    pub start: u32,
    /// Span length in UTF-16 code units.
    pub length: u32,
    /// The message.
    #[serde(rename = "messageText")]
    pub message: Message,
    /// The TypeScript error code, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
}

impl NormalizedDiagnostic {
    /// Returns the diagnostic's span.
    pub fn span(&self) -> Span {
        Span::at(self.start, self.length)
    }
}

/// Counters describing one check run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatistics {
    /// Number of input files requested.
    pub total_files: usize,
    /// Reported plus ignored errors.
    pub total_errors: usize,
    /// Number of files whose errors were ignored.
    pub ignored_files: usize,
    /// Number of errors that were ignored.
    pub ignored_error: usize,
}
