//! Transpilation of tgo files into Go.
//!
//! Go code is copied verbatim. Tags, attributes, and string or template
//! literal statements become writes to the enclosing template function's
//! context value, and line directives map every copied statement back to
//! its position in the tgo file.
//!
//! The input must have passed [`tgo_analyzer::analyze`]; unbalanced tags
//! are treated as an internal error.

mod context;
mod generator;
pub mod helpers;
mod white;

use source_map::{Position, SourceFile, SourceMap};
use tgo_parser::File;

use generator::Generator;

/// Names used where a function's classification does not provide them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspileOptions {
    /// Context value referenced from writes outside template functions.
    pub ctx_name: String,
    /// Runtime package referenced from writes outside template functions.
    pub runtime_name: String,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            ctx_name: "__tgo_ctx".to_string(),
            runtime_name: "__tgo".to_string(),
        }
    }
}

/// Result of transpiling one file.
#[derive(Debug, Clone)]
pub struct TranspileResult {
    /// The generated Go source.
    pub code: String,
    /// Ranges of `code` copied verbatim from the tgo source.
    pub source_map: SourceMap,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranspileError {
    #[error("{position}: carriage returns are not supported")]
    CarriageReturn { position: Position },
    #[error("{position}: template content needs a named context parameter")]
    UnnamedContext { position: Position },
    #[error("{position}: context parameter is shadowed at template content")]
    ShadowedContext { position: Position },
    #[error("{position}: every runtime import is shadowed at template content")]
    ShadowedRuntime { position: Position },
}

impl TranspileError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::CarriageReturn { .. } => "carriage-return",
            Self::UnnamedContext { .. } => "unnamed-context",
            Self::ShadowedContext { .. } => "shadowed-context",
            Self::ShadowedRuntime { .. } => "shadowed-runtime",
        }
    }

    pub fn position(&self) -> &Position {
        match self {
            Self::CarriageReturn { position }
            | Self::UnnamedContext { position }
            | Self::ShadowedContext { position }
            | Self::ShadowedRuntime { position } => position,
        }
    }
}

/// Transpile a parsed and analyzed file.
pub fn transpile(
    file: &File,
    source: &SourceFile,
    options: &TranspileOptions,
) -> Result<TranspileResult, TranspileError> {
    if let Some(offset) = source.text().find('\r') {
        return Err(TranspileError::CarriageReturn {
            position: source.position(offset as u32),
        });
    }

    let funcs = tgo_analyzer::tgofuncs::check(file);
    let result = Generator::new(file, source, &funcs, options).run()?;

    tracing::debug!(
        file = source.name(),
        template_funcs = funcs.len(),
        mapped = result.source_map.len(),
        "transpiled"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PRELUDE: &str = "package a\n\nimport \"github.com/mateusz834/tgo\"\n\n";
    const HEADER: &str = "// Code generated by tgo DO NOT EDIT.\n\n//line test.tgo:1:1\n";

    fn run(src: &str) -> Result<String, TranspileError> {
        let parsed = tgo_parser::parse_file("test.tgo", src).unwrap();
        tgo_analyzer::analyze(&parsed.ast, &parsed.source).unwrap();
        transpile(&parsed.ast, &parsed.source, &TranspileOptions::default()).map(|r| r.code)
    }

    /// Transpile a file made of the runtime import and `rest`, returning
    /// the output after the copied import.
    fn body(rest: &str) -> String {
        let code = run(&format!("{PRELUDE}{rest}")).unwrap();
        let expected_start = format!("{HEADER}{PRELUDE}");
        assert!(code.starts_with(&expected_start), "{code}");
        code[expected_start.len()..].to_string()
    }

    #[test]
    fn test_plain_go_is_copied() {
        let src = "package a\n\n// f does things.\nfunc f() {\n\tx := 1 /* one */\n\t_ = x\n}\n";
        assert_eq!(run(src).unwrap(), format!("{HEADER}{src}"));
    }

    #[test]
    fn test_empty_statements_are_copied() {
        let src = "package a\n\nfunc f() {\n\t;\n\tfor {\n\tL: ;\n\t}\nM:\n}\n";
        assert_eq!(run(src).unwrap(), format!("{HEADER}{src}"));
    }

    #[test]
    fn test_static_writes_merge() {
        let got = body("func f(ctx tgo.Ctx) error {\n\t<div>\"hello\"</div>\n\treturn nil\n}\n");
        assert_eq!(
            got,
            concat!(
                "func f(ctx tgo.Ctx) error {\n",
                "\tif err := ctx.WriteString(`<div>hello</div>`); err != nil {\n",
                "\t\treturn err\n",
                "\t}\n",
                "//line test.tgo:7:1\n",
                "\treturn nil\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_nested_tags_without_code_need_no_block() {
        let got = body(concat!(
            "func f(ctx tgo.Ctx) error {\n",
            "\t<div>\n",
            "\t\t<p>\"hi\"</p>\n",
            "\t</div>\n",
            "\treturn nil\n",
            "}\n",
        ));
        assert_eq!(
            got,
            concat!(
                "func f(ctx tgo.Ctx) error {\n",
                "\tif err := ctx.WriteString(`<div><p>hi</p></div>`); err != nil {\n",
                "\t\treturn err\n",
                "\t}\n",
                "//line test.tgo:9:1\n",
                "\treturn nil\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_loop_inside_tag() {
        let got = body(concat!(
            "func list(ctx tgo.Ctx, items []string) error {\n",
            "\t<ul>\n",
            "\t\tfor _, item := range items {\n",
            "\t\t\t<li>\"\\{item}\"</li>\n",
            "\t\t}\n",
            "\t</ul>\n",
            "\treturn nil\n",
            "}\n",
        ));
        assert_eq!(
            got,
            concat!(
                "func list(ctx tgo.Ctx, items []string) error {\n",
                "\tif err := ctx.WriteString(`<ul>`); err != nil {\n",
                "\t\treturn err\n",
                "\t}\n",
                "\t{\n",
                "//line test.tgo:7:1\n",
                "\t\tfor _, item := range items {\n",
                "\t\t\tif err := ctx.WriteString(`<li>`); err != nil {\n",
                "\t\t\t\treturn err\n",
                "\t\t\t}\n",
                "\t\t\tif err := tgo.DynamicWrite(ctx, /*line test.tgo:8:11*/item); err != nil {\n",
                "\t\t\t\treturn err\n",
                "\t\t\t}\n",
                "\t\t\tif err := ctx.WriteString(`</li>`); err != nil {\n",
                "\t\t\t\treturn err\n",
                "\t\t\t}\n",
                "//line test.tgo:9:1\n",
                "\t\t}\n",
                "\t}\n",
                "\tif err := ctx.WriteString(`</ul>`); err != nil {\n",
                "\t\treturn err\n",
                "\t}\n",
                "//line test.tgo:11:1\n",
                "\treturn nil\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_attributes() {
        let got = body(concat!(
            "func f(ctx tgo.Ctx, t string) error {\n",
            "\t<a @href=\"/x\" @hidden @title=\"a \\{t} b\">\"go\"</a>\n",
            "\treturn nil\n",
            "}\n",
        ));
        assert_eq!(
            got,
            concat!(
                "func f(ctx tgo.Ctx, t string) error {\n",
                "\tif err := ctx.WriteString(`<a href=\"/x\" hidden title=\"a `); err != nil {\n",
                "\t\treturn err\n",
                "\t}\n",
                "\tif err := tgo.DynamicWrite(ctx, /*line test.tgo:6:36*/t); err != nil {\n",
                "\t\treturn err\n",
                "\t}\n",
                "\tif err := ctx.WriteString(` b\">go</a>`); err != nil {\n",
                "\t\treturn err\n",
                "\t}\n",
                "//line test.tgo:7:1\n",
                "\treturn nil\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_case_bodies() {
        let got = body(concat!(
            "func f(ctx tgo.Ctx, ok bool) error {\n",
            "\tswitch {\n",
            "\tcase ok:\n",
            "\t\t\"yes\"\n",
            "\tdefault:\n",
            "\t\t\"no\"\n",
            "\t}\n",
            "\treturn nil\n",
            "}\n",
        ));
        assert_eq!(
            got,
            concat!(
                "func f(ctx tgo.Ctx, ok bool) error {\n",
                "\tswitch {\n",
                "\tcase ok:\n",
                "\t\tif err := ctx.WriteString(`yes`); err != nil {\n",
                "\t\t\treturn err\n",
                "\t\t}\n",
                "//line test.tgo:9:1\n",
                "\tdefault:\n",
                "\t\tif err := ctx.WriteString(`no`); err != nil {\n",
                "\t\t\treturn err\n",
                "\t\t}\n",
                "//line test.tgo:11:1\n",
                "\t}\n",
                "\treturn nil\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_code_after_tag_on_same_line() {
        let got = body("func f(ctx tgo.Ctx) error {\n\t<br></br> x()\n\treturn nil\n}\n");
        assert_eq!(
            got,
            concat!(
                "func f(ctx tgo.Ctx) error {\n",
                "\tif err := ctx.WriteString(`<br></br>`); err != nil {\n",
                "\t\treturn err\n",
                "\t}; /*line test.tgo:6:11*/ x()\n",
                "\treturn nil\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_backtick_is_spliced() {
        let got = body("func f(ctx tgo.Ctx) error {\n\t\"a`b\"\n\treturn nil\n}\n");
        assert!(
            got.contains("\tif err := ctx.WriteString(``+\"a`b\"+``); err != nil {\n"),
            "{got}"
        );
    }

    #[test]
    fn test_aliased_runtime_import() {
        let src = concat!(
            "package a\n\n",
            "import rt \"github.com/mateusz834/tgo\"\n\n",
            "func f(w rt.Ctx, n int) error {\n",
            "\t\"\\{n}\"\n",
            "\treturn nil\n",
            "}\n",
        );
        let code = run(src).unwrap();
        assert!(
            code.contains("\tif err := rt.DynamicWrite(w, /*line test.tgo:6:5*/n); err != nil {\n"),
            "{code}"
        );
    }

    #[test]
    fn test_unnamed_context() {
        let err = run("package a\n\nimport \"github.com/mateusz834/tgo\"\n\nfunc f(_ tgo.Ctx) error {\n\t\"x\"\n\treturn nil\n}\n")
            .unwrap_err();
        assert!(matches!(err, TranspileError::UnnamedContext { .. }));
        assert_eq!(err.position().to_string(), "test.tgo:6:2");
    }

    #[test]
    fn test_shadowed_runtime_alias() {
        let err = run(concat!(
            "package a\n\nimport \"github.com/mateusz834/tgo\"\n\n",
            "func f(ctx tgo.Ctx, items []string) error {\n",
            "\tfor _, tgo := range items {\n",
            "\t\t<li>\"\\{tgo}\"</li>\n",
            "\t}\n",
            "\treturn nil\n",
            "}\n",
        ))
        .unwrap_err();
        assert_eq!(err.code(), "shadowed-runtime");
        assert_eq!(
            err.to_string(),
            "test.tgo:7:10: every runtime import is shadowed at template content"
        );
    }

    #[test]
    fn test_shadowed_alias_falls_back_to_another_import() {
        let code = run(concat!(
            "package a\n\n",
            "import (\n",
            "\t\"github.com/mateusz834/tgo\"\n",
            "\tt \"github.com/mateusz834/tgo\"\n",
            ")\n\n",
            "func f(ctx tgo.Ctx) error {\n",
            "\tif tgo := 1; tgo > 0 {\n",
            "\t\t\"\\{tgo}\"\n",
            "\t}\n",
            "\treturn nil\n",
            "}\n",
        ))
        .unwrap();
        assert!(
            code.contains("\t\tif err := t.DynamicWrite(ctx, /*line test.tgo:10:6*/tgo); err != nil {\n"),
            "{code}"
        );
        assert!(!code.contains("tgo.DynamicWrite"), "{code}");
    }

    #[test]
    fn test_shadowed_context() {
        let err = run(concat!(
            "package a\n\nimport \"github.com/mateusz834/tgo\"\n\n",
            "func f(ctx tgo.Ctx) error {\n",
            "\t{\n",
            "\t\tctx := \"b\"\n",
            "\t\t\"\\{ctx}\"\n",
            "\t}\n",
            "\treturn nil\n",
            "}\n",
        ))
        .unwrap_err();
        assert_eq!(err.code(), "shadowed-context");
        assert_eq!(err.position().to_string(), "test.tgo:8:6");
    }

    #[test]
    fn test_context_param_named_like_runtime() {
        // Static writes only need the context, so they still work when the
        // parameter hides the import.
        let got = body("func f(tgo tgo.Ctx) error {\n\t<p></p>\n\treturn nil\n}\n");
        assert!(got.contains("\tif err := tgo.WriteString(`<p></p>`); err != nil {\n"), "{got}");
    }

    #[test]
    fn test_control_characters_are_spliced() {
        let got = body("func f(ctx tgo.Ctx) error {\n\t\"a\\x00b\\rc\"\n\treturn nil\n}\n");
        assert!(
            got.contains("\tif err := ctx.WriteString(``+\"a\\x00b\\rc\"+``); err != nil {\n"),
            "{got}"
        );
        assert!(!got.contains(['\0', '\r']), "{got:?}");
    }

    #[test]
    fn test_carriage_return_rejected() {
        let file = tgo_parser::parse("package a\n").unwrap();
        let source = SourceFile::new("t.tgo", "package a\r\n");
        let err = transpile(&file, &source, &TranspileOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "t.tgo:1:10: carriage returns are not supported");
    }

    #[test]
    fn test_source_map_covers_copied_code() {
        let src = format!("{PRELUDE}func f(ctx tgo.Ctx) error {{\n\t<p></p>\n\treturn nil\n}}\n");
        let parsed = tgo_parser::parse_file("test.tgo", src.as_str()).unwrap();
        let result = transpile(&parsed.ast, &parsed.source, &TranspileOptions::default()).unwrap();

        let generated = result.code.find("return nil\n}").unwrap() as u32;
        let original = src.find("return nil\n}").unwrap() as u32;
        assert_eq!(result.source_map.to_source_offset(generated), Some(original));

        let write = result.code.find("WriteString").unwrap() as u32;
        assert_eq!(result.source_map.to_source_offset(write), None);
    }
}
