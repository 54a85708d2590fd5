//! Line index for offset ↔ line/column conversion.

use crate::TextOffset;
use text_size::TextSize;

/// A line and column position (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column (UTF-16 code units within the line).
    pub col: u32,
}

impl LineCol {
    /// Creates a new line/column position.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// An index for conversion between offsets and line/column positions.
///
/// `\n` and `\r\n` both terminate a line. The `\r` of a `\r\n` pair is not part
/// of the line's content, so columns on CRLF files match the LF rendition.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Offset of the start of each line.
    line_starts: Vec<TextOffset>,
    /// Offset just past the content of each line (terminator excluded).
    line_ends: Vec<TextOffset>,
    /// Byte offset of the start of each line, for slicing the text.
    byte_starts: Vec<usize>,
    /// Total length of the text.
    len: TextOffset,
}

impl LineIndex {
    /// Creates a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        let mut line_ends = Vec::new();
        let mut byte_starts = vec![0];
        let mut units = 0u32;
        let mut prev = None;

        for (offset, c) in text.char_indices() {
            if c == '\n' {
                let content_end = if prev == Some('\r') { units - 1 } else { units };
                line_ends.push(TextSize::from(content_end));
                // Next line starts after the newline
                line_starts.push(TextSize::from(units + 1));
                byte_starts.push(offset + 1);
            }
            units += c.len_utf16() as u32;
            prev = Some(c);
        }
        line_ends.push(TextSize::from(units));

        Self {
            line_starts,
            line_ends,
            byte_starts,
            len: TextSize::from(units),
        }
    }

    /// Returns the number of lines in the source.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the length of the indexed text.
    #[inline]
    pub fn len(&self) -> TextOffset {
        self.len
    }

    /// Returns true if the indexed text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == TextSize::from(0)
    }

    /// Converts an offset to a line/column position.
    ///
    /// Offsets past the end of the text resolve to the end of the last line.
    /// An offset pointing at the `\n` of a `\r\n` pair resolves to the end of
    /// that line's content.
    pub fn line_col(&self, offset: TextOffset) -> LineCol {
        let offset = std::cmp::min(offset, self.len);

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };

        let offset = std::cmp::min(offset, self.line_ends[line]);
        let col = u32::from(offset) - u32::from(self.line_starts[line]);

        LineCol {
            line: line as u32,
            col,
        }
    }

    /// Converts a line/column position to an offset.
    ///
    /// Returns `None` if the line is out of bounds.
    pub fn offset(&self, line_col: LineCol) -> Option<TextOffset> {
        let line_start = *self.line_starts.get(line_col.line as usize)?;
        Some(line_start + TextSize::from(line_col.col))
    }

    /// Returns the offset where a line starts.
    pub fn line_start(&self, line: u32) -> Option<TextOffset> {
        self.line_starts.get(line as usize).copied()
    }

    /// Returns the offset where a line's content ends (before its terminator).
    pub fn line_end(&self, line: u32) -> Option<TextOffset> {
        self.line_ends.get(line as usize).copied()
    }

    /// Returns the content of a line without its terminator.
    pub fn line_text<'a>(&self, line: u32, text: &'a str) -> Option<&'a str> {
        let line = line as usize;
        let start = *self.byte_starts.get(line)?;
        let end = self
            .byte_starts
            .get(line + 1)
            .copied()
            .unwrap_or(text.len());
        let content = text.get(start..end)?;
        let content = content.strip_suffix('\n').unwrap_or(content);
        Some(content.strip_suffix('\r').unwrap_or(content))
    }
}

/// Converts a UTF-16 column within `line` to a byte index, clamped to the line.
pub fn utf16_to_byte(line: &str, units: u32) -> usize {
    let mut seen = 0u32;
    for (idx, c) in line.char_indices() {
        if seen >= units {
            return idx;
        }
        seen += c.len_utf16() as u32;
    }
    line.len()
}
