//! Project tsconfig loading and the temporary check config.

use crate::runner::TscError;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value};
use std::fs;
use ts_diagnostics::absolutize;

/// Loads a tsconfig file, tolerating comments and trailing commas.
pub fn load_tsconfig(path: &Utf8Path) -> Result<Map<String, Value>, TscError> {
    if !path.exists() {
        return Err(TscError::TsconfigNotFound(path.to_owned()));
    }
    let content = fs::read_to_string(path).map_err(|e| TscError::InvalidTsconfig {
        path: path.to_owned(),
        message: e.to_string(),
    })?;
    let content = strip_trailing_commas(&strip_json_comments(&content));

    match serde_json::from_str(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(TscError::InvalidTsconfig {
            path: path.to_owned(),
            message: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(TscError::InvalidTsconfig {
            path: path.to_owned(),
            message: e.to_string(),
        }),
    }
}

/// Builds the config `tsc` runs with: the project config restricted to `files`.
///
/// Every key of `base` is kept. `skipLibCheck` and `composite` are forced on,
/// `files` lists the requested files and `include` is replaced by
/// `always_include`, resolved against `root` since the config may be written
/// to another directory.
pub fn check_tsconfig(
    mut base: Map<String, Value>,
    files: &[Utf8PathBuf],
    always_include: &[String],
    root: &Utf8Path,
) -> Value {
    let mut compiler_options = match base.remove("compilerOptions") {
        Some(Value::Object(options)) => options,
        _ => Map::new(),
    };
    compiler_options.insert("skipLibCheck".to_string(), Value::Bool(true));
    compiler_options.insert("composite".to_string(), Value::Bool(true));

    base.insert(
        "compilerOptions".to_string(),
        Value::Object(compiler_options),
    );
    base.insert(
        "files".to_string(),
        Value::Array(
            files
                .iter()
                .map(|f| Value::String(f.to_string()))
                .collect(),
        ),
    );
    base.insert(
        "include".to_string(),
        Value::Array(
            always_include
                .iter()
                .map(|p| Value::String(absolutize(Utf8Path::new(p), root).into_string()))
                .collect(),
        ),
    );

    Value::Object(base)
}

/// Removes single-line and multi-line comments from JSON.
pub fn strip_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
        } else if c == '"' {
            result.push(c);
            in_string = true;
        } else if c == '/' {
            match chars.peek() {
                Some('/') => {
                    // Single-line comment
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        chars.next();
                    }
                }
                Some('*') => {
                    // Multi-line comment
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '*' && chars.peek() == Some(&'/') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {
                    result.push(c);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Drops commas directly followed by `}` or `]`. Expects comment-free input.
fn strip_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut result = String::with_capacity(json.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            result.push(c);
            if c == '\\' {
                if let Some(&next) = chars.get(i + 1) {
                    result.push(next);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            result.push(c);
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().copied().find(|c| !c.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                result.push(c);
            }
        } else {
            result.push(c);
        }
        i += 1;
    }

    result
}

/// Returns the directory the temporary config is written to.
pub(crate) fn config_dir(tsconfig_path: &Utf8Path, fallback: &Utf8Path) -> Utf8PathBuf {
    match tsconfig_path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_owned(),
        _ => fallback.to_owned(),
    }
}
