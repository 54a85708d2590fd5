//! Ignore policy for per-file error suppression.

use crate::path::absolutize;
use crate::DiagnosticsError;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;

/// A compiled set of ignore rules.
///
/// Plain rules match a file only when both resolve to the same normalized
/// path. Rules containing glob metacharacters are matched against the path
/// relative to the project root and against the absolute path.
#[derive(Debug, Clone)]
pub struct IgnoreList {
    root: Utf8PathBuf,
    exact: HashSet<Utf8PathBuf>,
    globs: GlobSet,
}

impl Default for IgnoreList {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::new(),
            exact: HashSet::new(),
            globs: GlobSet::empty(),
        }
    }
}

impl IgnoreList {
    /// Returns a list that ignores nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Compiles `rules`, resolving relative ones against `root`.
    pub fn new<S: AsRef<str>>(rules: &[S], root: &Utf8Path) -> Result<Self, DiagnosticsError> {
        let mut exact = HashSet::new();
        let mut builder = GlobSetBuilder::new();

        for rule in rules {
            let rule = rule.as_ref();
            if is_glob(rule) {
                let glob = Glob::new(rule).map_err(|e| DiagnosticsError::InvalidIgnorePattern {
                    pattern: rule.to_string(),
                    message: e.to_string(),
                })?;
                builder.add(glob);
            } else {
                exact.insert(absolutize(Utf8Path::new(rule), root));
            }
        }

        let globs = builder
            .build()
            .map_err(|e| DiagnosticsError::InvalidIgnorePattern {
                pattern: rules
                    .iter()
                    .map(|r| r.as_ref())
                    .collect::<Vec<_>>()
                    .join(", "),
                message: e.to_string(),
            })?;

        Ok(Self {
            root: root.to_owned(),
            exact,
            globs,
        })
    }

    /// Returns true if no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.globs.is_empty()
    }

    /// Returns true if `path` (absolute and normalized) is ignored.
    pub fn is_ignored(&self, path: &Utf8Path) -> bool {
        if self.exact.contains(path) {
            return true;
        }
        if self.globs.is_empty() {
            return false;
        }
        if let Ok(relative) = path.strip_prefix(&self.root) {
            if self.globs.is_match(relative.as_str()) {
                return true;
            }
        }
        self.globs.is_match(path.as_str())
    }
}

fn is_glob(rule: &str) -> bool {
    rule.contains(|c: char| matches!(c, '*' | '?' | '[' | '{'))
}
