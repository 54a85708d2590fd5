//! Resolution of spans into displayable positions.

use crate::{LineCol, LineIndex, Span};

/// A source line shown around a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextLine {
    /// 1-indexed line number.
    pub number: u32,
    /// Line content without its terminator.
    pub text: String,
}

/// The position of a diagnostic span together with its surrounding lines.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ResolvedPosition {
    /// 1-indexed line of the span start.
    pub line: u32,
    /// 1-indexed column of the span start.
    pub column: u32,
    /// 1-indexed line of the span end.
    pub end_line: u32,
    /// 1-indexed column of the span end.
    pub end_column: u32,
    /// The offending line and its neighbours, in line order.
    pub context_lines: Vec<ContextLine>,
}

impl ResolvedPosition {
    /// Resolves `span` against `text`, keeping `context` lines on each side.
    ///
    /// Never fails: spans reaching past the end of the text are clamped to it.
    pub fn resolve(text: &str, span: Span, context: u32) -> Self {
        Self::resolve_with(&LineIndex::new(text), text, span, context)
    }

    /// Like [`ResolvedPosition::resolve`], reusing an existing index for `text`.
    pub fn resolve_with(index: &LineIndex, text: &str, span: Span, context: u32) -> Self {
        let span = span.clamp(index.len());
        let start = index.line_col(span.start);
        let mut end = index.line_col(span.end);

        // A span that swallows a line terminator ends on the line it terminates.
        if end.line > start.line && end.col == 0 {
            let prev = end.line - 1;
            if let (Some(line_start), Some(line_end)) =
                (index.line_start(prev), index.line_end(prev))
            {
                end = LineCol::new(prev, u32::from(line_end - line_start));
            }
        }

        let last_line = index.line_count().saturating_sub(1) as u32;
        let first = start.line.saturating_sub(context);
        let last = std::cmp::min(start.line.saturating_add(context), last_line);

        let context_lines = (first..=last)
            .filter_map(|line| {
                index.line_text(line, text).map(|content| ContextLine {
                    number: line + 1,
                    text: content.to_string(),
                })
            })
            .collect();

        Self {
            line: start.line + 1,
            column: start.col + 1,
            end_line: end.line + 1,
            end_column: end.col + 1,
            context_lines,
        }
    }

    /// Returns the line the span starts on.
    pub fn target_line(&self) -> Option<&ContextLine> {
        self.context_lines.iter().find(|l| l.number == self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "const x = 1;\nconst y: string = x;\n";

    #[test]
    fn test_resolve_first_line() {
        let pos = ResolvedPosition::resolve(SOURCE, Span::at(10, 3), 0);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 11);
        // The span covers `1;\n`; its end stays on line 1.
        assert_eq!(pos.end_line, 1);
        assert_eq!(pos.end_column, 13);
        assert_eq!(
            pos.context_lines,
            vec![ContextLine {
                number: 1,
                text: "const x = 1;".to_string(),
            }]
        );
    }

    #[test]
    fn test_resolve_with_context() {
        let pos = ResolvedPosition::resolve(SOURCE, Span::at(19, 6), 1);
        assert_eq!((pos.line, pos.column), (2, 7));
        let numbers: Vec<u32> = pos.context_lines.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(pos.target_line().unwrap().text, "const y: string = x;");
    }

    #[test]
    fn test_zero_length_span() {
        let pos = ResolvedPosition::resolve(SOURCE, Span::at(6, 0), 0);
        assert_eq!((pos.line, pos.column), (1, 7));
        assert_eq!((pos.end_line, pos.end_column), (1, 7));
    }

    #[test]
    fn test_start_past_end_of_file() {
        let text = "let a = 1;\nlet b = 2;";
        let pos = ResolvedPosition::resolve(text, Span::at(400, 5), 1);
        assert_eq!((pos.line, pos.column), (2, 11));
        assert_eq!(pos.target_line().unwrap().text, "let b = 2;");
    }

    #[test]
    fn test_crlf_source() {
        let text = "const x = 1;\r\nconst y: string = x;\r\n";
        let pos = ResolvedPosition::resolve(text, Span::at(20, 6), 0);
        assert_eq!((pos.line, pos.column), (2, 7));
        assert_eq!(pos.context_lines[0].text, "const y: string = x;");
    }
}
