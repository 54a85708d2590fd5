//! Source position tracking for mono-ts-check.
//!
//! The TypeScript compiler reports diagnostic locations as `(start, length)`
//! spans measured in UTF-16 code units. This crate turns those spans into
//! 1-based line/column positions and extracts the surrounding source lines so
//! that a diagnostic can be shown next to the code it refers to.

mod line_index;
mod position;
mod span;

pub use line_index::{utf16_to_byte, LineCol, LineIndex};
pub use position::{ContextLine, ResolvedPosition};
pub use span::{Span, TextOffset};
