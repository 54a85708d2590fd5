//! Error types.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while processing compiler diagnostics.
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    /// The raw diagnostics did not have the expected shape.
    #[error("malformed diagnostic input: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A file referenced by a diagnostic could not be read for rendering.
    #[error("failed to read {path}: {source}")]
    SourceRead {
        /// The file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An ignore rule is not a valid glob.
    #[error("invalid ignore pattern `{pattern}`: {message}")]
    InvalidIgnorePattern {
        /// The offending rule.
        pattern: String,
        /// Why it was rejected.
        message: String,
    },
}
