//! Open/end tag pairing.

use smol_str::SmolStr;
use source_map::{SourceFile, Span};
use tgo_parser::visit::{self, Visit};
use tgo_parser::{File, Stmt};

use crate::{AnalyzeError, AnalyzeErrorKind};

/// Check that tags pair up within every statement list of `file`.
pub fn check(file: &File, source: &SourceFile) -> Vec<AnalyzeError> {
    let mut checker = TagChecker {
        source,
        errors: Vec::new(),
    };
    checker.visit_file(file);
    checker.errors
}

struct TagChecker<'a> {
    source: &'a SourceFile,
    errors: Vec<AnalyzeError>,
}

impl TagChecker<'_> {
    fn error(&mut self, message: String, span: Span) {
        self.errors.push(AnalyzeError::new(
            AnalyzeErrorKind::TagPair,
            message,
            self.source,
            span,
        ));
    }

    fn check_list(&mut self, list: &[Stmt]) {
        let mut stack: Vec<(&SmolStr, Span)> = Vec::new();

        for stmt in list {
            match stmt {
                Stmt::OpenTag(tag) => {
                    stack.push((&tag.name.name, Span::new(tag.open_pos, tag.close_pos)));
                }
                Stmt::EndTag(tag) => {
                    let span = Span::new(tag.open_pos, tag.close_pos);
                    match stack.pop() {
                        None => self.error("missing open tag".to_string(), span),
                        Some((open, _)) if !names_match(open, &tag.name.name) => self.error(
                            format!(
                                "unexpected close tag: {:?}, want: {:?}",
                                tag.name.name.as_str(),
                                open.as_str()
                            ),
                            span,
                        ),
                        Some(_) => {}
                    }
                }
                _ => {}
            }
        }

        for (_, span) in stack {
            self.error("unclosed tag".to_string(), span);
        }
    }
}

fn names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

impl<'ast> Visit<'ast> for TagChecker<'_> {
    fn visit_stmt_list(&mut self, list: &'ast [Stmt]) {
        self.check_list(list);
        visit::walk_stmt_list(self, list);
    }
}
