//! Semantic analysis for tgo files.
//!
//! The checks run over a successfully parsed file:
//! - tag pairing inside each statement list
//! - template context (tags, attributes and template literals only where
//!   they are allowed)
//! - control flow that would leave a tag body early
//! - rejection of hand-written line directives
//!
//! Control flow is only checked once the file is otherwise clean, since its
//! depth tracking assumes balanced tags.

pub mod branch;
pub mod context;
pub mod directives;
pub mod tags;
pub mod tgofuncs;

use source_map::{Position, SourceFile, Span};
use tgo_parser::File;

pub use tgofuncs::{TgoFunc, TgoFuncs, WriteScope};

/// A single analysis failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("{start}: {message}")]
pub struct AnalyzeError {
    pub message: String,
    pub start: Position,
    pub end: Position,
    /// Byte range of the offending node.
    pub span: Span,
    pub kind: AnalyzeErrorKind,
}

impl AnalyzeError {
    pub fn new(
        kind: AnalyzeErrorKind,
        message: impl Into<String>,
        source: &SourceFile,
        span: Span,
    ) -> Self {
        Self {
            message: message.into(),
            start: source.position(span.start),
            end: source.position(span.end),
            span,
            kind,
        }
    }
}

/// Which check produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AnalyzeErrorKind {
    /// Template syntax used where it is not allowed.
    Context,
    /// Open and end tags that do not pair up.
    TagPair,
    /// A branch statement leaving an open tag body.
    ControlFlow,
    /// A `//line` directive in the input.
    Directive,
}

impl AnalyzeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::TagPair => "tag-pair",
            Self::ControlFlow => "control-flow",
            Self::Directive => "directive",
        }
    }
}

/// Every error found in one file, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", summarize(.0))]
pub struct AnalyzeErrors(pub Vec<AnalyzeError>);

fn summarize(errors: &[AnalyzeError]) -> String {
    match errors {
        [] => "no errors".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more errors)", rest.len()),
    }
}

impl AnalyzeErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnalyzeError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<AnalyzeError> {
        self.0
    }
}

impl IntoIterator for AnalyzeErrors {
    type Item = AnalyzeError;
    type IntoIter = std::vec::IntoIter<AnalyzeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AnalyzeErrors {
    type Item = &'a AnalyzeError;
    type IntoIter = std::slice::Iter<'a, AnalyzeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Run every check over `file`.
pub fn analyze(file: &File, source: &SourceFile) -> Result<(), AnalyzeErrors> {
    analyze_with(file, source, &tgofuncs::check(file))
}

/// Like [`analyze`], reusing an existing template function classification.
pub fn analyze_with(
    file: &File,
    source: &SourceFile,
    funcs: &TgoFuncs,
) -> Result<(), AnalyzeErrors> {
    let mut errors = tags::check(file, source);
    errors.extend(context::check(file, funcs, source));

    if errors.is_empty() {
        errors.extend(branch::check(file, source));
    }

    errors.extend(directives::check(file, source));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AnalyzeErrors(errors))
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    pub fn run(src: &str) -> Vec<String> {
        let source = SourceFile::new("test.tgo", src);
        let file = tgo_parser::parse(src).unwrap();
        match analyze(&file, &source) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::run;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_template_file() {
        let src = r#"package a

import "github.com/mateusz834/tgo"

func page(ctx tgo.Ctx, items []string) error {
	<ul @class="list">
		for _, item := range items {
			<li>"\{item}"</li>
		}
	</ul>
	return nil
}
"#;
        assert!(run(src).is_empty());
    }

    #[test]
    fn test_tags_outside_template_function() {
        let src = "package a\n\nfunc f() {\n\t<div></div>\n}\n";
        assert_eq!(
            run(src),
            vec![
                "test.tgo:4:2: open tag is not allowed in this context",
                "test.tgo:4:7: end tag is not allowed in this context",
            ]
        );
    }

    #[test]
    fn test_mismatch_suppresses_control_flow_check() {
        let src = r#"package a

import "github.com/mateusz834/tgo"

func f(ctx tgo.Ctx) error {
	<div><span></div></span>
	return nil
}
"#;
        assert_eq!(
            run(src),
            vec![
                r#"test.tgo:6:13: unexpected close tag: "div", want: "span""#,
                r#"test.tgo:6:19: unexpected close tag: "span", want: "div""#,
            ]
        );
    }

    #[test]
    fn test_directive_reported_with_other_errors() {
        let src = "package a\n\nfunc f() {\n\t<div></div>\n}\n\n//line x.go:1\n";
        insta::assert_debug_snapshot!(run(src), @r###"
        [
            "test.tgo:4:2: open tag is not allowed in this context",
            "test.tgo:4:7: end tag is not allowed in this context",
            "test.tgo:7:1: line directive is not allowed inside of the tgo file",
        ]
        "###);
    }

    #[test]
    fn test_errors_summary() {
        let source = SourceFile::new("a.tgo", "package a\n");
        let err = |msg: &str| {
            AnalyzeError::new(AnalyzeErrorKind::Context, msg, &source, Span::new(0, 7))
        };

        assert_eq!(AnalyzeErrors::default().to_string(), "no errors");
        assert_eq!(
            AnalyzeErrors(vec![err("bad")]).to_string(),
            "a.tgo:1:1: bad"
        );
        assert_eq!(
            AnalyzeErrors(vec![err("bad"), err("worse"), err("worst")]).to_string(),
            "a.tgo:1:1: bad (and 2 more errors)"
        );
    }

    #[test]
    fn test_error_positions() {
        let source = SourceFile::new("a.tgo", "package a\nfunc f() {}\n");
        let e = AnalyzeError::new(AnalyzeErrorKind::TagPair, "x", &source, Span::new(10, 14));
        assert_eq!((e.start.line, e.start.column), (2, 1));
        assert_eq!((e.end.line, e.end.column), (2, 5));
        assert_eq!(e.kind.as_str(), "tag-pair");
    }
}
