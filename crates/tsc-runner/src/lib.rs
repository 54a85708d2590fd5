//! tsc process runner for type-checking a subset of a TypeScript project.
//!
//! The runner copies the project's `tsconfig.json` into a temporary config that
//! lists only the requested files, runs `tsc --noEmit` against it and reads the
//! per-file diagnostics back from the build-info file `tsc` writes.
//!
//! # Example
//!
//! ```ignore
//! use camino::Utf8PathBuf;
//! use tsc_runner::{TscOutcome, TscRunner};
//!
//! #[tokio::main]
//! async fn main() {
//!     let project_root = Utf8PathBuf::from("/path/to/project");
//!     let tsc_path = TscRunner::find_tsc(Some(&project_root)).unwrap();
//!     let runner = TscRunner::new(tsc_path, project_root.clone(), None);
//!
//!     let files = vec![project_root.join("src/index.ts")];
//!     match runner.check(&files, &[]).await.unwrap() {
//!         TscOutcome::Diagnostics(raw) => println!("{} diagnostics", raw.entry_count()),
//!         other => println!("{other:?}"),
//!     }
//! }
//! ```

mod build_info;
mod runner;
mod tsconfig;

pub use build_info::parse_build_info;
pub use runner::{is_typescript_file, TscError, TscOutcome, TscRunner};
pub use tsconfig::{check_tsconfig, load_tsconfig, strip_json_comments};
