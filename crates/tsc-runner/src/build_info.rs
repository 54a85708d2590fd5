//! Extraction of per-file diagnostics from a tsc build-info file.

use crate::runner::TscError;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use ts_diagnostics::{absolutize, RawDiagnosticEntry, RawDiagnostics};

/// Parses the JSON `tsc` writes for `--tsBuildInfoFile`.
///
/// Diagnostics live in `semanticDiagnosticsPerFile`, either at the top level
/// or under `program` depending on the compiler version. Each element is a
/// bare file reference (nothing to report) or a `[file, [diagnostic, ...]]`
/// pair. A file reference is a path or a 1-based index into `fileNames`.
/// Relative paths are resolved against `base_dir`, the build-info directory.
pub fn parse_build_info(json: &str, base_dir: &Utf8Path) -> Result<RawDiagnostics, TscError> {
    let root: Value =
        serde_json::from_str(json).map_err(|e| TscError::BuildInfo(e.to_string()))?;
    let program = root.get("program").unwrap_or(&root);

    let file_names: Vec<&str> = program
        .get("fileNames")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut raw = RawDiagnostics::new();
    let Some(per_file) = program
        .get("semanticDiagnosticsPerFile")
        .and_then(Value::as_array)
    else {
        return Ok(raw);
    };

    for item in per_file {
        let Some(pair) = item.as_array() else {
            continue;
        };
        let [file_ref, entries] = pair.as_slice() else {
            return Err(TscError::BuildInfo(format!(
                "expected [file, diagnostics], found {item}"
            )));
        };

        let path = resolve_file(file_ref, &file_names, base_dir)?;
        let entries: Vec<RawDiagnosticEntry> = serde_json::from_value(entries.clone())
            .map_err(ts_diagnostics::DiagnosticsError::from)?;
        raw.extend_file(path, entries);
    }

    Ok(raw)
}

fn resolve_file(
    file_ref: &Value,
    file_names: &[&str],
    base_dir: &Utf8Path,
) -> Result<Utf8PathBuf, TscError> {
    let name = match file_ref {
        Value::String(name) => name.as_str(),
        Value::Number(id) => id
            .as_u64()
            .and_then(|id| usize::try_from(id).ok())
            .and_then(|id| id.checked_sub(1))
            .and_then(|idx| file_names.get(idx).copied())
            .ok_or_else(|| TscError::BuildInfo(format!("unknown file id {id}")))?,
        other => {
            return Err(TscError::BuildInfo(format!(
                "unexpected file reference {other}"
            )))
        }
    };
    Ok(absolutize(Utf8Path::new(name), base_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ts_diagnostics::{DiagnosticsError, Message};

    #[test]
    fn test_program_section_with_file_ids() {
        let json = r#"{
            "program": {
                "fileNames": ["../node_modules/typescript/lib/lib.d.ts", "../src/a.ts", "../src/b.ts"],
                "semanticDiagnosticsPerFile": [
                    1,
                    [2, [{"start": 10, "length": 3, "messageText": "Type error", "category": 1, "code": 2322}]],
                    3
                ]
            },
            "version": "5.4.5"
        }"#;

        let raw = parse_build_info(json, Utf8Path::new("/repo/.out")).unwrap();

        let files: Vec<&str> = raw.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(files, vec!["/repo/src/a.ts"]);
        let entry = &raw.get(Utf8Path::new("/repo/src/a.ts")).unwrap()[0];
        assert_eq!((entry.start, entry.length, entry.code), (10, 3, Some(2322)));
        assert_eq!(entry.message_text, Message::Plain("Type error".to_string()));
    }

    #[test]
    fn test_top_level_section_with_paths() {
        let json = r#"{
            "fileNames": [],
            "semanticDiagnosticsPerFile": [
                "/repo/src/ok.ts",
                ["/repo/src/bad.ts", [
                    {"file": "/repo/src/bad.ts", "start": 0, "length": 5, "messageText": {
                        "messageText": "Argument of type 'string' is not assignable.",
                        "category": 1,
                        "code": 2345,
                        "next": [{"messageText": "Type 'string' is not 'number'.", "category": 1, "code": 2322}]
                    }}
                ]]
            ]
        }"#;

        let raw = parse_build_info(json, Utf8Path::new("/tmp")).unwrap();

        assert_eq!(raw.entry_count(), 1);
        let entry = &raw.get(Utf8Path::new("/repo/src/bad.ts")).unwrap()[0];
        assert_eq!(
            entry.message_text.entries(),
            vec![
                (0, "Argument of type 'string' is not assignable."),
                (1, "Type 'string' is not 'number'."),
            ]
        );
    }

    #[test]
    fn test_no_diagnostics_section() {
        let json = r#"{"program": {"fileNames": []}}"#;
        let raw = parse_build_info(json, Utf8Path::new("/")).unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_build_info("not json", Utf8Path::new("/")).unwrap_err();
        assert!(matches!(err, TscError::BuildInfo(_)));
    }

    #[test]
    fn test_unknown_file_id() {
        let json = r#"{"fileNames": ["a.ts"], "semanticDiagnosticsPerFile": [[7, []]]}"#;
        let err = parse_build_info(json, Utf8Path::new("/")).unwrap_err();
        assert_eq!(err.to_string(), "failed to read build info: unknown file id 7");
    }

    #[test]
    fn test_malformed_entry() {
        let json = r#"{"semanticDiagnosticsPerFile": [["/a.ts", [{"length": 1}]]]}"#;
        let err = parse_build_info(json, Utf8Path::new("/")).unwrap_err();
        assert!(matches!(
            err,
            TscError::Diagnostics(DiagnosticsError::Malformed(_))
        ));
    }
}
