//! Configuration loading.

use camino::Utf8Path;
use std::fs;
use std::sync::Arc;
use swc_common::SourceMap;
use swc_ecma_ast::{
    AssignExpr, AssignTarget, Decl, ExportDefaultExpr, Expr, ExprStmt, KeyValueProp, Lit,
    MemberExpr, MemberProp, ModuleDecl, ModuleItem, ObjectLit, Pat, Prop, PropName, PropOrSpread,
    SimpleAssignTarget, Stmt,
};
use swc_ecma_parser::{parse_file_as_module, EsSyntax, Syntax};

/// Contents of `monoTsCheckConfig.js`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonoTsCheckConfig {
    /// Files whose diagnostics are dropped when `--ignore` is given.
    pub ignore: Vec<String>,

    /// Patterns always handed to tsc through `include`.
    pub always_include: Vec<String>,

    /// Whether the config declares an `onFinish` hook.
    pub on_finish: bool,
}

impl MonoTsCheckConfig {
    /// Loads the config file, falling back to the default config when it is
    /// missing or cannot be parsed.
    pub fn load(path: &Utf8Path) -> Self {
        if !path.exists() {
            tracing::debug!(%path, "no config file, using defaults");
            return Self::default();
        }

        match Self::parse_config(path) {
            Ok(config) => {
                if config.on_finish {
                    tracing::warn!(
                        %path,
                        "onFinish hooks are not supported and will not be called"
                    );
                }
                config
            }
            Err(e) => {
                tracing::warn!(%path, "failed to parse config: {e}");
                Self::default()
            }
        }
    }

    /// Parses a config file statically using SWC. The file is never executed.
    fn parse_config(path: &Utf8Path) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::parse_source(path.as_str(), content)
    }

    fn parse_source(name: &str, content: String) -> Result<Self, String> {
        let cm: Arc<SourceMap> = Default::default();
        let fm = cm.new_source_file(
            swc_common::FileName::Custom(name.to_string()).into(),
            content,
        );

        let module = parse_file_as_module(
            &fm,
            Syntax::Es(EsSyntax {
                jsx: false,
                ..Default::default()
            }),
            swc_ecma_ast::EsVersion::Es2022,
            None,
            &mut Vec::new(),
        )
        .map_err(|e| format!("Parse error: {:?}", e))?;

        let mut config = MonoTsCheckConfig::default();

        for item in &module.body {
            let exported = match item {
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(ExportDefaultExpr {
                    expr,
                    ..
                })) => Some(expr.as_ref()),
                ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) => module_exports_value(expr),
                _ => None,
            };

            match exported {
                Some(Expr::Object(obj)) => Self::extract_config_from_object(obj, &mut config),
                Some(Expr::Ident(ident)) => {
                    // `const config = { ... }; module.exports = config;`
                    if let Some(obj) = find_object_binding(&module.body, ident.sym.as_str()) {
                        Self::extract_config_from_object(obj, &mut config);
                    }
                }
                _ => {}
            }
        }

        Ok(config)
    }

    /// Gets a string value from a PropName.
    fn prop_name_str(key: &PropName) -> Option<&str> {
        match key {
            PropName::Ident(ident) => Some(ident.sym.as_str()),
            PropName::Str(s) => s.value.as_str(),
            _ => None,
        }
    }

    /// Collects the string elements of an array literal.
    fn string_array(value: &Expr) -> Vec<String> {
        let Expr::Array(arr) = value else {
            return Vec::new();
        };
        arr.elems
            .iter()
            .flatten()
            .filter_map(|elem| match elem.expr.as_ref() {
                Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
                _ => None,
            })
            .collect()
    }

    /// Extracts configuration from an object literal.
    fn extract_config_from_object(obj: &ObjectLit, config: &mut MonoTsCheckConfig) {
        for prop in &obj.props {
            let PropOrSpread::Prop(prop) = prop else {
                continue;
            };
            match prop.as_ref() {
                Prop::KeyValue(KeyValueProp { key, value }) => {
                    let Some(key_name) = Self::prop_name_str(key) else {
                        continue;
                    };

                    match key_name {
                        "ignore" => config.ignore = Self::string_array(value),
                        "alwaysInclude" => config.always_include = Self::string_array(value),
                        "onFinish" => config.on_finish = true,
                        _ => {}
                    }
                }
                // `onFinish(context) { ... }`
                Prop::Method(method) => {
                    if Self::prop_name_str(&method.key) == Some("onFinish") {
                        config.on_finish = true;
                    }
                }
                _ => {}
            }
        }
    }
}

/// Returns the right-hand side of a `module.exports = ...` assignment.
fn module_exports_value(expr: &Expr) -> Option<&Expr> {
    let Expr::Assign(AssignExpr {
        left: AssignTarget::Simple(SimpleAssignTarget::Member(MemberExpr { obj, prop, .. })),
        right,
        ..
    }) = expr
    else {
        return None;
    };

    let is_module = matches!(obj.as_ref(), Expr::Ident(ident) if ident.sym.as_str() == "module");
    let is_exports = matches!(prop, MemberProp::Ident(ident) if ident.sym.as_str() == "exports");
    (is_module && is_exports).then_some(right.as_ref())
}

/// Finds a top-level `const|let|var <name> = { ... }`.
fn find_object_binding<'a>(body: &'a [ModuleItem], name: &str) -> Option<&'a ObjectLit> {
    body.iter()
        .filter_map(|item| match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => Some(var),
            _ => None,
        })
        .flat_map(|var| var.decls.iter())
        .find_map(|decl| match (&decl.name, decl.init.as_deref()) {
            (Pat::Ident(binding), Some(Expr::Object(obj))) if binding.id.sym.as_str() == name => {
                Some(obj)
            }
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> MonoTsCheckConfig {
        MonoTsCheckConfig::parse_source("monoTsCheckConfig.js", source.to_string()).unwrap()
    }

    #[test]
    fn test_module_exports() {
        let config = parse(
            r#"
            module.exports = {
                ignore: ['packages/legacy/src/old.ts', "packages/**/generated/*.ts"],
                alwaysInclude: ['types/**/*.d.ts'],
            };
            "#,
        );

        assert_eq!(
            config,
            MonoTsCheckConfig {
                ignore: vec![
                    "packages/legacy/src/old.ts".to_string(),
                    "packages/**/generated/*.ts".to_string(),
                ],
                always_include: vec!["types/**/*.d.ts".to_string()],
                on_finish: false,
            }
        );
    }

    #[test]
    fn test_export_default() {
        let config = parse("export default { 'ignore': ['a.ts'] };");
        assert_eq!(config.ignore, vec!["a.ts".to_string()]);
        assert!(config.always_include.is_empty());
    }

    #[test]
    fn test_exported_binding() {
        let config = parse(
            r#"
            const config = { alwaysInclude: ['global.d.ts'] };
            module.exports = config;
            "#,
        );
        assert_eq!(config.always_include, vec!["global.d.ts".to_string()]);
    }

    #[test]
    fn test_on_finish_detected() {
        let arrow = parse("module.exports = { onFinish: (context) => console.log(context) };");
        assert!(arrow.on_finish);

        let method = parse("module.exports = { onFinish(context) { process.exit(0); } };");
        assert!(method.on_finish);
    }

    #[test]
    fn test_unrelated_assignments_ignored() {
        let config = parse("exports.ignore = ['a.ts']; module.foo = { ignore: ['b.ts'] };");
        assert_eq!(config, MonoTsCheckConfig::default());
    }

    #[test]
    fn test_non_string_elements_skipped() {
        let config = parse("module.exports = { ignore: ['a.ts', 42, null, `b.ts`] };");
        assert_eq!(config.ignore, vec!["a.ts".to_string()]);
    }

    #[test]
    fn test_load_missing_file() {
        let config = MonoTsCheckConfig::load(Utf8Path::new("/definitely/not/here/config.js"));
        assert_eq!(config, MonoTsCheckConfig::default());
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("monoTsCheckConfig.js")).unwrap();
        std::fs::write(&path, "module.exports = { ignore: [").unwrap();

        assert_eq!(MonoTsCheckConfig::load(&path), MonoTsCheckConfig::default());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("monoTsCheckConfig.js")).unwrap();
        std::fs::write(&path, "module.exports = { ignore: ['src/skip.ts'] };\n").unwrap();

        let config = MonoTsCheckConfig::load(&path);
        assert_eq!(config.ignore, vec!["src/skip.ts".to_string()]);
    }
}
