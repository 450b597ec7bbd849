//! Parser for tgo, Go extended with tags, attributes and template literals.
//!
//! The scanner produces Go tokens (automatic semicolons included) plus
//! template literal pieces; the parser builds an owned syntax tree whose
//! positions are byte offsets into the source.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod visit;

pub use ast::*;
pub use error::{ErrorCode, ParseError, ParseResult};
pub use parser::parse_source;
pub use visit::Visit;

use source_map::SourceFile;

/// Module path of the tgo runtime package.
pub const RUNTIME_MODULE: &str = "github.com/mateusz834/tgo";

/// A parsed file together with its source text.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub ast: File,
    pub source: SourceFile,
}

/// Parse a tgo file and return the parsed result.
pub fn parse(source: &str) -> ParseResult<File> {
    parse_source(source)
}

/// Parse the named source, keeping the text for position lookups.
pub fn parse_file(name: impl Into<String>, source: impl Into<String>) -> ParseResult<ParsedFile> {
    let source = SourceFile::new(name, source);
    let ast = parse_source(source.text())?;
    Ok(ParsedFile { ast, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template_file() {
        let src = r#"package templates

import "github.com/mateusz834/tgo"

func page(ctx tgo.Ctx, title string) error {
	<html>
		<head>
			<title>"\{title}"</title>
		</head>
	</html>
	return nil
}
"#;
        let parsed = parse_file("page.tgo", src).unwrap();
        assert_eq!(parsed.source.name(), "page.tgo");
        assert_eq!(parsed.ast.imports[0].path_value(), RUNTIME_MODULE);
        let Decl::Func(func) = &parsed.ast.decls[1] else {
            panic!("expected function")
        };
        assert_eq!(func.name.name, "page");
        assert_eq!(func.body.as_ref().unwrap().stmts.len(), 8);
    }

    #[test]
    fn test_comments_kept() {
        let file = parse("package a\n\n// doc\nfunc f() {\n\t/* inner */\n}\n").unwrap();
        let texts: Vec<_> = file.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["// doc", "/* inner */"]);
        assert_eq!(file.comments[0].body(), " doc");
    }

    #[test]
    fn test_parse_error_span() {
        let src = "package a\nfunc f() { @ }";
        let err = parse(src).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedToken);
        assert_eq!(&src[err.span.to_range()], "}");
    }

    #[test]
    fn test_visitor_sees_template_parts() {
        struct Idents(Vec<String>);
        impl<'ast> Visit<'ast> for Idents {
            fn visit_ident(&mut self, ident: &'ast Ident) {
                self.0.push(ident.name.to_string());
            }
        }

        let file = parse("package a\nfunc f() { <p @id=\"\\{id}\">\"\\{name}\"</p> }").unwrap();
        let mut v = Idents(Vec::new());
        v.visit_file(&file);
        assert_eq!(v.0, vec!["a", "f", "p", "id", "id", "name", "p"]);
    }
}
