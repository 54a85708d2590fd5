//! TypeScript diagnostic processing for mono-ts-check.
//!
//! This crate turns the raw diagnostics reported by `tsc` into a report for
//! people:
//! - [`parse_diagnostics`] keeps the diagnostics of the requested files, drops
//!   ignored files and counts what was dropped
//! - [`aggregate`] groups diagnostics by file, reads each file once and
//!   resolves every span into a line/column position
//! - [`render_block`] builds the display block for one diagnostic
//!
//! # Example
//!
//! ```
//! use camino::Utf8PathBuf;
//! use ts_diagnostics::{aggregate, parse_diagnostics, IgnoreList, RawDiagnostics, RenderOptions};
//!
//! let raw = RawDiagnostics::from_json(r#"{"/a.ts": []}"#).unwrap();
//! let outcome = parse_diagnostics(&raw, &[Utf8PathBuf::from("/a.ts")], &IgnoreList::disabled());
//! assert!(outcome.is_clean());
//!
//! let report = aggregate(
//!     &outcome.diagnostics,
//!     &ts_diagnostics::FsSource,
//!     RenderOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(report.error_count(), 0);
//! ```

mod aggregate;
mod diagnostic;
mod error;
mod ignore;
mod parser;
mod path;
mod render;

pub use aggregate::{
    aggregate, group_by_file, FileReport, FsSource, Report, ReportEntry, SourceProvider,
};
pub use diagnostic::{
    Message, MessageChain, NormalizedDiagnostic, RawDiagnosticEntry, RawDiagnostics, RunStatistics,
};
pub use error::DiagnosticsError;
pub use ignore::IgnoreList;
pub use parser::{parse_diagnostics, ParseOutcome};
pub use path::{absolutize, normalize_path};
pub use render::{render_block, RenderOptions};
