//! Template context validation.
//!
//! Tags and template literals may only appear directly in the body of a
//! template function (possibly nested in control flow), attributes only in
//! an open tag header.

use source_map::{SourceFile, Span};
use tgo_parser::visit::{self, Visit};
use tgo_parser::{
    AttributeStmt, EndTagStmt, Expr, FieldList, File, FuncDecl, FuncLit, FuncType, OpenTagStmt,
    Stmt, TemplateLiteral,
};

use crate::{AnalyzeError, AnalyzeErrorKind, TgoFuncs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    NotTgo,
    TgoBody,
    TgoTag,
}

/// Report template syntax used outside of its allowed context.
pub fn check(file: &File, funcs: &TgoFuncs, source: &SourceFile) -> Vec<AnalyzeError> {
    let mut checker = ContextChecker {
        funcs,
        source,
        context: Context::NotTgo,
        errors: Vec::new(),
    };
    checker.visit_file(file);
    checker.errors
}

struct ContextChecker<'a> {
    funcs: &'a TgoFuncs,
    source: &'a SourceFile,
    context: Context,
    errors: Vec<AnalyzeError>,
}

impl ContextChecker<'_> {
    fn with_context(&mut self, context: Context, f: impl FnOnce(&mut Self)) {
        let saved = std::mem::replace(&mut self.context, context);
        f(self);
        self.context = saved;
    }

    fn error(&mut self, message: &str, span: Span) {
        self.errors.push(AnalyzeError::new(
            AnalyzeErrorKind::Context,
            message,
            self.source,
            span,
        ));
    }

    fn func_context(&self, span: Span) -> Context {
        if self.funcs.contains(span) {
            Context::TgoBody
        } else {
            Context::NotTgo
        }
    }

    fn visit_template_parts<'ast>(&mut self, lit: &'ast TemplateLiteral) {
        self.with_context(Context::NotTgo, |v| visit::walk_template_literal(v, lit));
    }
}

impl<'ast> Visit<'ast> for ContextChecker<'_> {
    fn visit_func_decl(&mut self, func: &'ast FuncDecl) {
        let context = self.func_context(func.span);
        self.with_context(context, |v| visit::walk_func_decl(v, func));
    }

    fn visit_func_lit(&mut self, func: &'ast FuncLit) {
        let context = self.func_context(func.span);
        self.with_context(context, |v| visit::walk_func_lit(v, func));
    }

    fn visit_func_type(&mut self, ty: &'ast FuncType) {
        self.with_context(Context::NotTgo, |v| visit::walk_func_type(v, ty));
    }

    fn visit_field_list(&mut self, list: &'ast FieldList) {
        self.with_context(Context::NotTgo, |v| visit::walk_field_list(v, list));
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::Block(_)
            | Stmt::If(_)
            | Stmt::Switch(_)
            | Stmt::Case(_)
            | Stmt::For(_)
            | Stmt::Select(_)
            | Stmt::Comm(_)
            | Stmt::Range(_)
            | Stmt::TypeSwitch(_)
            | Stmt::Expr(_)
            | Stmt::Labeled(_)
            | Stmt::OpenTag(_)
            | Stmt::EndTag(_)
            | Stmt::Attribute(_) => visit::walk_stmt(self, stmt),
            _ => self.with_context(Context::NotTgo, |v| visit::walk_stmt(v, stmt)),
        }
    }

    fn visit_open_tag(&mut self, tag: &'ast OpenTagStmt) {
        if self.context != Context::TgoBody {
            self.error("open tag is not allowed in this context", tag.span());
        }
        self.with_context(Context::TgoTag, |v| visit::walk_open_tag(v, tag));
    }

    fn visit_end_tag(&mut self, tag: &'ast EndTagStmt) {
        if self.context != Context::TgoBody {
            self.error("end tag is not allowed in this context", tag.span());
        }
    }

    fn visit_attribute(&mut self, attr: &'ast AttributeStmt) {
        if self.context != Context::TgoTag {
            self.error("attribute is not allowed in this context", attr.span);
        }
        if let Some(Expr::TemplateLiteral(lit)) = &attr.value {
            self.visit_template_parts(lit);
        }
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::TemplateLiteral(_) | Expr::FuncLit(_) => visit::walk_expr(self, expr),
            _ => self.with_context(Context::NotTgo, |v| visit::walk_expr(v, expr)),
        }
    }

    fn visit_template_literal(&mut self, lit: &'ast TemplateLiteral) {
        if self.context != Context::TgoBody {
            self.error("template literal is not allowed in this context", lit.span);
        }
        self.visit_template_parts(lit);
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::run;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "package a\n\nimport \"github.com/mateusz834/tgo\"\n\n";

    fn run_body(sig: &str, body: &str) -> Vec<String> {
        run(&format!("{HEADER}func {sig} {{\n{body}\n}}\n"))
    }

    #[test]
    fn test_template_function_allows_tags() {
        let body = "\tif true {\n\t\t<div @id=\"a\">\"\\{1}\"</div>\n\t}\n\treturn nil";
        assert!(run_body("f(ctx tgo.Ctx) error", body).is_empty());
    }

    #[test]
    fn test_template_literal_in_call_argument() {
        let errors = run_body("f(ctx tgo.Ctx) error", "\tprintln(\"\\{1}\")\n\treturn nil");
        assert_eq!(
            errors,
            vec!["test.tgo:6:10: template literal is not allowed in this context"]
        );
    }

    #[test]
    fn test_attribute_outside_tag_header() {
        let errors = run_body("f(ctx tgo.Ctx) error", "\t@class=\"x\"\n\treturn nil");
        assert_eq!(
            errors,
            vec!["test.tgo:6:2: attribute is not allowed in this context"]
        );
    }

    #[test]
    fn test_attribute_template_value_parts_checked() {
        let body = "\t<a @href=\"\\{\"\\{1}\"}\"></a>\n\treturn nil";
        let errors = run_body("f(ctx tgo.Ctx) error", body);
        assert_eq!(
            errors,
            vec!["test.tgo:6:14: template literal is not allowed in this context"]
        );
    }

    #[test]
    fn test_plain_closure_inside_template() {
        let body = "\t_ = func() {\n\t\t<b></b>\n\t}\n\treturn nil";
        let errors = run_body("f(ctx tgo.Ctx) error", body);
        assert_eq!(
            errors,
            vec![
                "test.tgo:7:3: open tag is not allowed in this context",
                "test.tgo:7:6: end tag is not allowed in this context",
            ]
        );
    }

    #[test]
    fn test_template_closure_inside_plain_function() {
        let body = "\t_ = func(ctx tgo.Ctx) error {\n\t\t<b></b>\n\t\treturn nil\n\t}";
        assert!(run_body("f()", body).is_empty());
    }

    #[test]
    fn test_template_literal_in_header_statement() {
        let errors = run_body("f(ctx tgo.Ctx) error", "\t<p \"\\{1}\"></p>\n\treturn nil");
        assert_eq!(
            errors,
            vec!["test.tgo:6:5: template literal is not allowed in this context"]
        );
    }
}
