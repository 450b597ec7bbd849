//! Control flow leaving an open tag body.
//!
//! Generated code writes the end tag where the source has it, so a `break`,
//! `continue`, `goto` or `return` that jumps past an end tag would skip it.
//! Depths count the tags opened since the innermost enclosing construct the
//! statement would leave.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use source_map::{SourceFile, Span};
use tgo_parser::visit::{self, Visit};
use tgo_parser::{BranchKind, File, FuncDecl, FuncLit, Stmt};

use crate::{AnalyzeError, AnalyzeErrorKind};

/// Report branch statements that would exit an unclosed tag body.
///
/// Expects balanced tags; see [`crate::tags`].
pub fn check(file: &File, source: &SourceFile) -> Vec<AnalyzeError> {
    let mut checker = BranchChecker {
        source,
        depths: Depths::default(),
        errors: Vec::new(),
    };
    checker.visit_file(file);
    checker.errors
}

#[derive(Debug, Clone, Default)]
struct Depths {
    tag: u32,
    break_: u32,
    continue_: u32,
    labels: FxHashMap<SmolStr, u32>,
}

impl Depths {
    fn open(&mut self) {
        self.tag += 1;
        self.break_ += 1;
        self.continue_ += 1;
        for depth in self.labels.values_mut() {
            *depth += 1;
        }
    }

    fn close(&mut self) {
        fn dec(depth: &mut u32) {
            match depth.checked_sub(1) {
                Some(d) => *depth = d,
                None => panic!("end tag without a matching open tag"),
            }
        }
        dec(&mut self.tag);
        dec(&mut self.break_);
        dec(&mut self.continue_);
        for depth in self.labels.values_mut() {
            dec(depth);
        }
    }
}

struct BranchChecker<'a> {
    source: &'a SourceFile,
    depths: Depths,
    errors: Vec<AnalyzeError>,
}

impl BranchChecker<'_> {
    fn scoped(&mut self, depths: Depths, f: impl FnOnce(&mut Self)) {
        let saved = std::mem::replace(&mut self.depths, depths);
        f(self);
        self.depths = saved;
    }

    fn error(&mut self, keyword: &str, span: Span) {
        let span = Span::new(span.start, span.end.saturating_sub(1).max(span.start));
        self.errors.push(AnalyzeError::new(
            AnalyzeErrorKind::ControlFlow,
            format!(
                "unexpected {keyword} statement in the middle of a tag body, ensure that all open tags are closed"
            ),
            self.source,
            span,
        ));
    }

    fn label_depth(&self, label: Option<&SmolStr>, fallback: u32) -> u32 {
        label
            .and_then(|name| self.depths.labels.get(name).copied())
            .unwrap_or(fallback)
    }
}

impl<'ast> Visit<'ast> for BranchChecker<'_> {
    fn visit_func_decl(&mut self, func: &'ast FuncDecl) {
        self.scoped(Depths::default(), |v| visit::walk_func_decl(v, func));
    }

    fn visit_func_lit(&mut self, func: &'ast FuncLit) {
        self.scoped(Depths::default(), |v| visit::walk_func_lit(v, func));
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::For(_) | Stmt::Range(_) => {
                let depths = Depths {
                    break_: 0,
                    continue_: 0,
                    ..self.depths.clone()
                };
                self.scoped(depths, |v| visit::walk_stmt(v, stmt));
            }
            Stmt::Switch(_) | Stmt::TypeSwitch(_) | Stmt::Select(_) => {
                let depths = Depths {
                    break_: 0,
                    ..self.depths.clone()
                };
                self.scoped(depths, |v| visit::walk_stmt(v, stmt));
            }
            Stmt::Labeled(labeled) => {
                let mut depths = Depths {
                    break_: 0,
                    ..self.depths.clone()
                };
                depths.labels.insert(labeled.label.name.clone(), 0);
                self.scoped(depths, |v| visit::walk_stmt(v, stmt));
            }
            Stmt::OpenTag(_) => {
                self.depths.open();
                visit::walk_stmt(self, stmt);
            }
            Stmt::EndTag(_) => self.depths.close(),
            Stmt::Branch(branch) => {
                let label = branch.label.as_ref().map(|l| &l.name);
                let depth = match branch.kind {
                    BranchKind::Break => self.label_depth(label, self.depths.break_),
                    BranchKind::Continue => self.label_depth(label, self.depths.continue_),
                    BranchKind::Goto => self.depths.tag,
                    BranchKind::Fallthrough => 0,
                };
                if depth != 0 {
                    self.error(branch.kind.as_str(), branch.span);
                }
            }
            Stmt::Return(ret) => {
                if self.depths.tag != 0 {
                    self.error("return", ret.span);
                }
                visit::walk_stmt(self, stmt);
            }
            _ => visit::walk_stmt(self, stmt),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::run;
    use pretty_assertions::assert_eq;

    fn body_errors(body: &str) -> Vec<String> {
        let src = format!(
            "package a\n\nimport \"github.com/mateusz834/tgo\"\n\nfunc f(ctx tgo.Ctx) error {{\n{body}\n\treturn nil\n}}\n"
        );
        run(&src)
            .into_iter()
            .map(|line| {
                let (pos, msg) = line.split_once(": ").unwrap();
                let keyword = msg.split(' ').nth(1).unwrap();
                format!("{pos} {keyword}")
            })
            .collect()
    }

    #[test]
    fn test_return_inside_tag() {
        assert_eq!(body_errors("\t<div>\n\treturn nil\n\t</div>"), vec!["test.tgo:7:2 return"]);
        assert!(body_errors("\t<div>\n\t</div>").is_empty());
    }

    #[test]
    fn test_full_message() {
        let src = "package a\n\nimport \"github.com/mateusz834/tgo\"\n\nfunc f(ctx tgo.Ctx) error {\n\t<div>return nil</div>\n}\n";
        assert_eq!(
            run(src),
            vec!["test.tgo:6:7: unexpected return statement in the middle of a tag body, ensure that all open tags are closed"]
        );
    }

    #[test]
    fn test_loop_inside_tag() {
        let body = "\t<ul>\n\tfor {\n\t\tbreak\n\t\tcontinue\n\t}\n\t</ul>";
        assert!(body_errors(body).is_empty());
    }

    #[test]
    fn test_tag_inside_loop() {
        let body = "\tfor {\n\t\t<li>\n\t\tbreak\n\t\tcontinue\n\t\t</li>\n\t}";
        assert_eq!(
            body_errors(body),
            vec!["test.tgo:8:3 break", "test.tgo:9:3 continue"]
        );
    }

    #[test]
    fn test_switch_resets_only_break() {
        let body = "\tfor {\n\t\t<li>\n\t\tswitch {\n\t\tcase true:\n\t\t\tbreak\n\t\tdefault:\n\t\t\tcontinue\n\t\t}\n\t\t</li>\n\t}";
        assert_eq!(body_errors(body), vec!["test.tgo:12:4 continue"]);
    }

    #[test]
    fn test_labeled_break() {
        let body = "L:\n\tfor {\n\t\t<li>\n\t\tfor {\n\t\t\tbreak L\n\t\t}\n\t\t</li>\n\t}";
        assert_eq!(body_errors(body), vec!["test.tgo:10:4 break"]);

        let body = "\t<ul>\nL:\n\tfor {\n\t\tfor {\n\t\t\tcontinue L\n\t\t}\n\t}\n\t</ul>";
        assert!(body_errors(body).is_empty());
    }

    #[test]
    fn test_goto_inside_tag() {
        let body = "\t<p>\n\tgoto end\n\t</p>\nend:\n\tprintln()";
        assert_eq!(body_errors(body), vec!["test.tgo:7:2 goto"]);
    }

    #[test]
    fn test_closure_resets_depth() {
        let body = "\t<p>\n\t_ = func() error { return nil }\n\t</p>";
        assert!(body_errors(body).is_empty());
    }

    #[test]
    fn test_fallthrough_allowed() {
        let body = "\tswitch {\n\tcase true:\n\t\t<p></p>\n\t\tfallthrough\n\tdefault:\n\t}";
        assert!(body_errors(body).is_empty());
    }
}
