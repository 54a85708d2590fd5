//! Rendering of a single diagnostic into a display block.

use crate::diagnostic::Message;
use source_map::{utf16_to_byte, ContextLine, ResolvedPosition};

/// Options for rendering diagnostic blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Number of source lines shown before and after the offending line.
    pub context_lines: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { context_lines: 1 }
    }
}

/// Renders `message` followed by the source context of `position`.
///
/// ```text
/// Type error
///   --> 1:11
///   1 | const x = 1;
///     |           ^^
///   2 | const y: string = x;
/// ```
///
/// The block carries no trailing newline.
pub fn render_block(message: &Message, position: &ResolvedPosition) -> String {
    let mut lines = vec![message.flatten()];
    lines.push(format!("  --> {}:{}", position.line, position.column));

    let gutter = position
        .context_lines
        .iter()
        .map(|l| l.number.to_string().len())
        .max()
        .unwrap_or(1);

    for context in &position.context_lines {
        lines.push(format!("  {:>gutter$} | {}", context.number, context.text));
        if context.number == position.line {
            lines.push(format!(
                "  {:gutter$} | {}",
                "",
                marker_line(context, position)
            ));
        }
    }

    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the `^^^` marker for the offending line, keeping tabs so it aligns.
fn marker_line(target: &ContextLine, position: &ResolvedPosition) -> String {
    let text = target.text.as_str();
    let start = utf16_to_byte(text, position.column - 1);
    let end = if position.end_line == position.line {
        utf16_to_byte(text, position.end_column - 1)
    } else {
        text.len()
    };

    let padding: String = text[..start]
        .chars()
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    let width = text[start..end.max(start)].chars().count().max(1);

    format!("{}{}", padding, "^".repeat(width))
}
