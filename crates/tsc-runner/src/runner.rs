//! tsc process runner.

use crate::build_info::parse_build_info;
use crate::tsconfig::{check_tsconfig, config_dir, load_tsconfig};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use ts_diagnostics::{DiagnosticsError, RawDiagnostics};

const BUILD_INFO_FILE_NAME: &str = "tsc_output.json";

/// Error types for the tsc runner.
#[derive(Debug, Error)]
pub enum TscError {
    /// Failed to spawn or wait for the tsc process.
    #[error("failed to spawn tsc: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// tsc binary not found.
    #[error("tsc binary not found at: {0}")]
    NotFound(Utf8PathBuf),

    /// tsconfig not found.
    #[error("tsconfig not found at: {0}")]
    TsconfigNotFound(Utf8PathBuf),

    /// tsconfig could not be read or parsed.
    #[error("invalid tsconfig {path}: {message}")]
    InvalidTsconfig { path: Utf8PathBuf, message: String },

    /// Failed to write temporary files.
    #[error("failed to write temporary files: {0}")]
    TempFileFailed(String),

    /// The build-info output did not have the expected shape.
    #[error("failed to read build info: {0}")]
    BuildInfo(String),

    /// A diagnostic inside the build info was malformed.
    #[error(transparent)]
    Diagnostics(#[from] DiagnosticsError),

    /// The check was interrupted before tsc finished.
    #[error("type-check interrupted")]
    Interrupted,
}

/// What a tsc run produced.
#[derive(Debug)]
pub enum TscOutcome {
    /// No `.ts`/`.tsx` file was requested, tsc was not started.
    Skipped,
    /// tsc exited successfully.
    Passed,
    /// tsc failed without writing its build info.
    MissingOutput,
    /// tsc reported diagnostics.
    Diagnostics(RawDiagnostics),
}

/// The tsc runner.
pub struct TscRunner {
    /// Path to the tsc binary.
    tsc_path: Utf8PathBuf,
    /// Project root directory.
    project_root: Utf8PathBuf,
    /// Optional tsconfig path override.
    tsconfig_path: Option<Utf8PathBuf>,
}

impl TscRunner {
    /// Creates a new tsc runner.
    pub fn new(
        tsc_path: Utf8PathBuf,
        project_root: Utf8PathBuf,
        tsconfig_path: Option<Utf8PathBuf>,
    ) -> Self {
        Self {
            tsc_path,
            project_root,
            tsconfig_path,
        }
    }

    /// Attempts to find tsc in the workspace, PATH, or common locations.
    ///
    /// Search order:
    /// 1. `node_modules/.bin/tsc` in the workspace or any parent directory
    /// 2. System PATH
    /// 3. Common installation locations
    pub fn find_tsc(workspace_root: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
        // Monorepos usually hoist typescript to the repository root
        if let Some(workspace) = workspace_root {
            for dir in workspace.ancestors() {
                let candidate = dir.join("node_modules/.bin/tsc");
                if candidate.exists() {
                    return Some(candidate);
                }
            }
        }

        if let Ok(path) = which::which("tsc") {
            if let Ok(utf8_path) = Utf8PathBuf::try_from(path) {
                return Some(utf8_path);
            }
        }

        let common_paths = [
            "/usr/local/bin/tsc",
            "/usr/bin/tsc",
            "~/.npm-global/bin/tsc",
            "~/.local/bin/tsc",
        ];

        for path in common_paths {
            let expanded = shellexpand::tilde(path);
            let path = Utf8Path::new(expanded.as_ref());
            if path.exists() {
                return Some(path.to_owned());
            }
        }

        None
    }

    /// Returns the project tsconfig the check starts from.
    pub fn tsconfig_path(&self) -> Utf8PathBuf {
        match &self.tsconfig_path {
            Some(path) if path.is_relative() => self.project_root.join(path),
            Some(path) => path.clone(),
            None => self.project_root.join("tsconfig.json"),
        }
    }

    /// Type-checks `files` with the project's settings.
    ///
    /// Only `.ts`/`.tsx` files are passed to tsc. The temporary tsconfig and
    /// the build-info directory are removed when this returns, whatever the
    /// outcome.
    pub async fn check(
        &self,
        files: &[Utf8PathBuf],
        always_include: &[String],
    ) -> Result<TscOutcome, TscError> {
        let ts_files: Vec<Utf8PathBuf> = files
            .iter()
            .filter(|f| is_typescript_file(f))
            .cloned()
            .collect();
        if ts_files.is_empty() {
            tracing::debug!("no TypeScript files requested, skipping tsc");
            return Ok(TscOutcome::Skipped);
        }

        if !self.tsc_path.exists() {
            return Err(TscError::NotFound(self.tsc_path.clone()));
        }

        let project_tsconfig = self.tsconfig_path();
        let base = load_tsconfig(&project_tsconfig)?;
        let config = check_tsconfig(base, &ts_files, always_include, &self.project_root);

        // Written next to the project config so its relative `extends` keeps working
        let mut temp_tsconfig = tempfile::Builder::new()
            .prefix("tsconfig.")
            .suffix(".json")
            .tempfile_in(config_dir(&project_tsconfig, &self.project_root))
            .map_err(|e| TscError::TempFileFailed(format!("create tsconfig: {e}")))?;
        serde_json::to_writer_pretty(temp_tsconfig.as_file_mut(), &config)
            .map_err(|e| TscError::TempFileFailed(format!("write tsconfig: {e}")))?;
        temp_tsconfig
            .as_file_mut()
            .flush()
            .map_err(|e| TscError::TempFileFailed(format!("write tsconfig: {e}")))?;

        let output_dir = tempfile::Builder::new()
            .prefix(".mono-ts-check-")
            .tempdir_in(&self.project_root)
            .map_err(|e| TscError::TempFileFailed(format!("create output dir: {e}")))?;
        let output_dir_path = Utf8PathBuf::try_from(output_dir.path().to_path_buf())
            .map_err(|e| TscError::TempFileFailed(e.to_string()))?;
        let build_info = output_dir_path.join(BUILD_INFO_FILE_NAME);

        tracing::debug!(
            tsc = %self.tsc_path,
            tsconfig = %temp_tsconfig.path().display(),
            files = ts_files.len(),
            "running tsc"
        );

        let mut child = Command::new(&self.tsc_path)
            .arg("-p")
            .arg(temp_tsconfig.path())
            .arg("--noEmit")
            .arg("--tsBuildInfoFile")
            .arg(&build_info)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let status = tokio::select! {
            status = child.wait() => status?,
            _ = tokio::signal::ctrl_c() => {
                let _ = child.kill().await;
                return Err(TscError::Interrupted);
            }
        };
        tracing::debug!(code = ?status.code(), "tsc finished");

        if status.success() {
            return Ok(TscOutcome::Passed);
        }

        let content = match std::fs::read_to_string(&build_info) {
            Ok(content) if !content.trim().is_empty() => content,
            _ => return Ok(TscOutcome::MissingOutput),
        };

        let raw = parse_build_info(&content, &output_dir_path)?;
        Ok(TscOutcome::Diagnostics(raw))
    }
}

/// Returns true for `.ts` and `.tsx` paths.
pub fn is_typescript_file(path: &Utf8Path) -> bool {
    matches!(path.extension(), Some("ts") | Some("tsx"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_typescript_file() {
        assert!(is_typescript_file(Utf8Path::new("src/a.ts")));
        assert!(is_typescript_file(Utf8Path::new("src/App.tsx")));
        assert!(is_typescript_file(Utf8Path::new("types/env.d.ts")));
        assert!(!is_typescript_file(Utf8Path::new("src/a.js")));
        assert!(!is_typescript_file(Utf8Path::new("--ignore")));
        assert!(!is_typescript_file(Utf8Path::new("src/ts")));
    }

    #[test]
    fn test_tsconfig_path() {
        let root = Utf8PathBuf::from("/repo");
        let runner = TscRunner::new("tsc".into(), root.clone(), None);
        assert_eq!(runner.tsconfig_path(), Utf8PathBuf::from("/repo/tsconfig.json"));

        let runner = TscRunner::new("tsc".into(), root.clone(), Some("tsconfig.app.json".into()));
        assert_eq!(runner.tsconfig_path(), Utf8PathBuf::from("/repo/tsconfig.app.json"));

        let runner = TscRunner::new("tsc".into(), root, Some("/elsewhere/tsconfig.json".into()));
        assert_eq!(runner.tsconfig_path(), Utf8PathBuf::from("/elsewhere/tsconfig.json"));
    }

    #[test]
    fn test_find_tsc_in_parent_node_modules() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let bin = root.join("node_modules/.bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("tsc"), "").unwrap();
        let package = root.join("packages/web");
        std::fs::create_dir_all(&package).unwrap();

        assert_eq!(TscRunner::find_tsc(Some(&package)), Some(bin.join("tsc")));
    }

    #[tokio::test]
    async fn test_check_without_typescript_files_is_skipped() {
        let runner = TscRunner::new("/missing/tsc".into(), "/repo".into(), None);
        let files = vec![Utf8PathBuf::from("/repo/README.md")];
        let outcome = runner.check(&files, &[]).await.unwrap();
        assert!(matches!(outcome, TscOutcome::Skipped));
    }

    #[tokio::test]
    async fn test_check_with_missing_tsc() {
        let runner = TscRunner::new("/missing/tsc".into(), "/repo".into(), None);
        let files = vec![Utf8PathBuf::from("/repo/a.ts")];
        let err = runner.check(&files, &[]).await.unwrap_err();
        assert!(matches!(err, TscError::NotFound(_)));
    }
}
