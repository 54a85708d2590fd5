//! Lexical path helpers.
//!
//! Paths are compared as text after normalization; the filesystem is never
//! consulted, so symlinks are not resolved.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Removes `.` components and folds `..` into the preceding component.
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match out.components().next_back() {
                Some(Utf8Component::Normal(_)) => {
                    out.pop();
                }
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_str()),
        }
    }
    out
}

/// Resolves `path` against `base` when relative, then normalizes it.
pub fn absolutize(path: &Utf8Path, base: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}
