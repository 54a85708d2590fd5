//! Span and offset types for diagnostic locations.

use text_size::TextSize;

/// An offset into a source string, counted in UTF-16 code units.
///
/// This is the unit the TypeScript compiler uses for `start`/`length`; for
/// ASCII sources it is identical to a byte offset.
pub type TextOffset = TextSize;

/// A span representing a range in source code.
///
/// Spans are half-open intervals `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The start offset (inclusive).
    pub start: TextOffset,
    /// The end offset (exclusive).
    pub end: TextOffset,
}

impl Span {
    /// Creates a new span from start and end offsets.
    #[inline]
    pub fn new(start: impl Into<TextOffset>, end: impl Into<TextOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates a span from a compiler-style `(start, length)` pair.
    ///
    /// The end saturates at `u32::MAX` instead of overflowing.
    #[inline]
    pub fn at(start: u32, length: u32) -> Self {
        Self::new(start, start.saturating_add(length))
    }

    /// Returns the length of this span.
    #[inline]
    pub fn len(&self) -> TextSize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Clamps both ends of the span to `limit`.
    #[inline]
    pub fn clamp(self, limit: TextOffset) -> Span {
        Span {
            start: std::cmp::min(self.start, limit),
            end: std::cmp::min(self.end, limit),
        }
    }
}
