//! Statement-level rewrite of a parsed file.

use smol_str::SmolStr;
use source_map::{line_directive, CodeBuilder, DirectiveForm, SourceFile};
use tgo_analyzer::TgoFuncs;
use tgo_parser::visit::{self, Visit};
use tgo_parser::{
    lexer, AttributeStmt, BasicLit, BlockStmt, Comment, EndTagStmt, Expr, ExprStmt, File,
    FuncDecl, FuncLit, OpenTagStmt, Stmt, TemplateLiteral,
};

use crate::context::{ScopeStack, WriteNames};
use crate::helpers::{
    dynamic_write_head, raw_fragment, static_write_head, write_tail, GENERATED_HEADER,
};
use crate::white::{iter_white, White, WhiteKind};
use crate::{TranspileError, TranspileOptions, TranspileResult};

pub(crate) struct Generator<'a> {
    file: &'a File,
    src: &'a str,
    source: &'a SourceFile,
    comments: &'a [Comment],
    funcs: &'a TgoFuncs,
    options: &'a TranspileOptions,
    out: CodeBuilder,
    /// Source offset up to which the input has been consumed.
    last: u32,
    /// Indentation of the source line being rewritten, `\n` included.
    indent: String,
    scopes: ScopeStack,
    names: WriteNames,
    /// Generated offset where the text of the open static write ends.
    static_at: Option<usize>,
    /// Generated code was written since the last verbatim copy.
    directive_owed: bool,
    /// The output ends in a generated statement.
    needs_semi: bool,
    error: Option<TranspileError>,
}

impl<'a> Generator<'a> {
    pub fn new(
        file: &'a File,
        source: &'a SourceFile,
        funcs: &'a TgoFuncs,
        options: &'a TranspileOptions,
    ) -> Self {
        Self {
            file,
            src: source.text(),
            source,
            comments: &file.comments,
            funcs,
            options,
            out: CodeBuilder::with_capacity(source.text().len() * 2),
            last: 0,
            indent: "\n".to_string(),
            scopes: ScopeStack::default(),
            names: WriteNames {
                ctx: Some(SmolStr::new(&options.ctx_name)),
                runtime: Some(SmolStr::new(&options.runtime_name)),
                ctx_shadowed: false,
            },
            static_at: None,
            directive_owed: false,
            needs_semi: false,
            error: None,
        }
    }

    pub fn run(mut self) -> Result<TranspileResult, TranspileError> {
        self.out.push_str(GENERATED_HEADER);
        self.out.push_str(&line_directive(
            DirectiveForm::Block,
            &self.source.position(0),
        ));
        self.out.push_str("\n");

        let file = self.file;
        self.visit_file(file);
        self.copy_to(self.src.len() as u32);

        if let Some(err) = self.error {
            return Err(err);
        }
        let (code, source_map) = self.out.finish();
        Ok(TranspileResult { code, source_map })
    }

    fn copy_to(&mut self, end: u32) {
        if end <= self.last {
            return;
        }
        let src = self.src;
        self.out
            .push_mapped(&src[self.last as usize..end as usize], self.last);
        self.last = end;
        self.static_at = None;
        self.needs_semi = false;
    }

    fn whites(&self, end: u32) -> Vec<White<'a>> {
        iter_white(self.src, self.comments, self.last, end).collect()
    }

    fn update_indent(&mut self, whites: &[White<'_>]) -> Option<u32> {
        let indent = whites.iter().rev().find(|w| w.kind == WhiteKind::Indent)?;
        self.indent = indent.text.to_string();
        Some(indent.offset)
    }

    fn write_directive(&mut self, separate: bool) {
        let last = self.last;
        if self.src.as_bytes().get(last as usize) == Some(&b'\n') {
            let pos = self.source.position(last + 1);
            self.out
                .push_str(&line_directive(DirectiveForm::Block, &pos));
        } else {
            if separate && self.needs_semi {
                self.out.push_str(";");
            }
            let pos = self.source.position(last);
            self.out
                .push_str(&line_directive(DirectiveForm::Inline, &pos));
        }
        self.directive_owed = false;
        self.static_at = None;
    }

    fn fail(&mut self, err: TranspileError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn ctx_name(&mut self) -> SmolStr {
        let position = self.source.position(self.last);
        let err = match &self.names.ctx {
            Some(_) if self.names.ctx_shadowed => TranspileError::ShadowedContext { position },
            Some(ctx) => return ctx.clone(),
            None => TranspileError::UnnamedContext { position },
        };
        self.fail(err);
        SmolStr::new(&self.options.ctx_name)
    }

    fn runtime_name(&mut self) -> SmolStr {
        if let Some(runtime) = &self.names.runtime {
            return runtime.clone();
        }
        self.fail(TranspileError::ShadowedRuntime {
            position: self.source.position(self.last),
        });
        SmolStr::new(&self.options.runtime_name)
    }

    fn names_for(&self, span: source_map::Span) -> WriteNames {
        match self.funcs.get(span) {
            Some(func) => WriteNames {
                ctx: func.ctx_name().map(SmolStr::new),
                runtime: Some(func.alias.clone()),
                ctx_shadowed: false,
            },
            None => self.names.clone(),
        }
    }

    /// Rewrite the statements of a block or clause body.
    fn transpile_list(&mut self, stmts: &'a [Stmt]) {
        let scopes = std::mem::take(&mut self.scopes);
        let indent = self.indent.clone();
        self.directive_owed = false;

        self.transpile_stmts(stmts);

        if !self.scopes.is_empty() {
            panic!("statement list ends with an open tag at offset {}", self.last);
        }
        if self.directive_owed {
            self.write_directive(true);
        }
        self.scopes = scopes;
        self.indent = indent;
    }

    fn transpile_stmts(&mut self, stmts: &'a [Stmt]) {
        for stmt in stmts {
            match stmt {
                Stmt::Labeled(labeled) if labeled.stmt.is_template_content() => {
                    self.enter_ordinary(labeled.span.start);
                    let label_end = labeled.label.span.end;
                    let colon = match self.src[label_end as usize..].find(':') {
                        Some(i) => label_end + i as u32 + 1,
                        None => panic!("label without a colon at offset {label_end}"),
                    };
                    self.copy_to(colon);
                    self.template_content(&labeled.stmt);
                }
                stmt if stmt.is_template_content() => self.template_content(stmt),
                stmt => {
                    let span = stmt.span();
                    self.enter_ordinary(span.start);
                    self.visit_stmt(stmt);
                    self.copy_to(span.end);
                }
            }
        }
    }

    /// Drop the material before a static statement. Coming from ordinary
    /// code, the lines before the statement's own line are kept.
    fn enter_static(&mut self, start: u32) {
        let whites = self.whites(start);
        let line_start = self.update_indent(&whites);
        if !self.directive_owed {
            if let Some(offset) = line_start {
                self.copy_to(offset);
            }
            self.directive_owed = true;
        }
        self.last = start;
    }

    fn enter_ordinary(&mut self, start: u32) {
        let whites = self.whites(start);
        self.update_indent(&whites);

        for indent in self.scopes.force(&self.indent) {
            self.out.push_str(&format!("{indent}{{"));
            self.static_at = None;
            self.needs_semi = false;
        }

        if self.directive_owed {
            let breaks_line = whites.iter().any(|w| match w.kind {
                WhiteKind::Indent | WhiteKind::Semi => true,
                WhiteKind::Comment => w.text.contains('\n'),
                WhiteKind::White => false,
            });
            self.write_directive(!breaks_line);
        }
        self.copy_to(start);
    }

    fn template_content(&mut self, stmt: &'a Stmt) {
        self.enter_static(stmt.span().start);
        let saved = self.names.clone();
        if let Some(scope) = self.funcs.write_scope(stmt.span()) {
            self.names.runtime = scope.runtime.clone();
            self.names.ctx_shadowed = scope.ctx_shadowed;
        }

        match stmt {
            Stmt::OpenTag(tag) => self.open_tag(tag),
            Stmt::EndTag(tag) => self.end_tag(tag),
            Stmt::Attribute(attr) => self.attribute(attr),
            Stmt::Expr(ExprStmt {
                x: Expr::BasicLit(lit),
            }) => self.string(lit),
            Stmt::Expr(ExprStmt {
                x: Expr::TemplateLiteral(lit),
            }) => self.template_literal(lit),
            other => panic!(
                "not template content at offset {}",
                other.span().start
            ),
        }
        self.names = saved;
    }

    fn open_tag(&mut self, tag: &'a OpenTagStmt) {
        self.static_write(&format!("<{}", tag.name.name));
        self.last = tag.name.span.end;
        self.scopes.push(&self.indent);

        self.transpile_stmts(&tag.body);

        let whites = self.whites(tag.close_pos);
        self.update_indent(&whites);
        self.last = tag.close_pos;
        self.close_scope();

        self.static_write(">");
        self.last = tag.close_pos + 1;
        self.scopes.push(&self.indent);
    }

    fn end_tag(&mut self, tag: &EndTagStmt) {
        self.close_scope();
        self.static_write(&format!("</{}>", tag.name.name));
        self.last = tag.close_pos + 1;
    }

    fn close_scope(&mut self) {
        if let Some(indent) = self.scopes.pop() {
            self.out.push_str(&format!("{indent}}}"));
            self.static_at = None;
            self.needs_semi = true;
            self.directive_owed = true;
        }
    }

    fn attribute(&mut self, attr: &'a AttributeStmt) {
        let name = &attr.name.name;
        match &attr.value {
            None => self.static_write(&format!(" {name}")),
            Some(Expr::BasicLit(lit)) => {
                let value = raw_fragment(lexer::unquote(&lit.value).as_deref(), &lit.value);
                self.static_write(&format!(" {name}=\"{value}\""));
            }
            Some(Expr::TemplateLiteral(lit)) => {
                self.static_write(&format!(" {name}=\""));
                self.template_literal(lit);
                self.static_write("\"");
            }
            Some(other) => panic!(
                "unexpected attribute value at offset {}",
                other.span().start
            ),
        }
        self.last = attr.span.end;
    }

    fn string(&mut self, lit: &BasicLit) {
        let text = raw_fragment(lexer::unquote(&lit.value).as_deref(), &lit.value);
        self.static_write(&text);
        self.last = lit.span.end;
    }

    fn template_literal(&mut self, lit: &'a TemplateLiteral) {
        for (i, part) in lit.parts.iter().enumerate() {
            self.static_segment(lit, i);
            self.dynamic_write(part);
        }
        self.static_segment(lit, lit.parts.len());
        self.last = lit.span.end;
    }

    fn static_segment(&mut self, lit: &TemplateLiteral, i: usize) {
        let Some(quoted) = lit.segment_literal(i) else {
            panic!("template literal without segment {i} at offset {}", lit.span.start);
        };
        let text = raw_fragment(lit.segment_value(i).as_deref(), &quoted);
        self.static_write(&text);
    }

    /// Append `text` to the open static write, or start a new one.
    fn static_write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(at) = self.static_at {
            self.out.insert_str(at, text);
            self.static_at = Some(at + text.len());
            return;
        }

        let indent = self.scopes.indent(&self.indent);
        let ctx = self.ctx_name();
        self.out.push_str(&indent);
        self.out.push_str(&static_write_head(&ctx));
        self.out.push_str(text);
        self.static_at = Some(self.out.code().len());
        self.out.push_str(&write_tail("`)", &indent));
        self.needs_semi = true;
        self.directive_owed = true;
    }

    fn dynamic_write(&mut self, expr: &'a Expr) {
        let span = expr.span();
        self.last = span.start;
        let indent = self.scopes.indent(&self.indent);
        let ctx = self.ctx_name();
        let runtime = self.runtime_name();
        let head = dynamic_write_head(&runtime, &ctx);
        self.out.push_str(&indent);
        self.out.push_str(&head);
        self.out.push_str(&line_directive(
            DirectiveForm::Inline,
            &self.source.position(span.start),
        ));

        self.visit_expr(expr);
        self.copy_to(span.end);

        self.out.push_str(&write_tail(")", &indent));
        self.static_at = None;
        self.needs_semi = true;
        self.directive_owed = true;
    }
}

impl<'a> Visit<'a> for Generator<'a> {
    fn visit_func_decl(&mut self, func: &'a FuncDecl) {
        let names = self.names_for(func.span);
        let saved = std::mem::replace(&mut self.names, names);
        visit::walk_func_decl(self, func);
        self.names = saved;
    }

    fn visit_func_lit(&mut self, func: &'a FuncLit) {
        let names = self.names_for(func.span);
        let saved = std::mem::replace(&mut self.names, names);
        visit::walk_func_lit(self, func);
        self.names = saved;
    }

    fn visit_block(&mut self, block: &'a BlockStmt) {
        self.copy_to(block.lbrace + 1);
        self.transpile_list(&block.stmts);
        self.copy_to(block.rbrace);
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Case(clause) => {
                for expr in &clause.list {
                    self.visit_expr(expr);
                }
                self.copy_to(clause.colon + 1);
                self.transpile_list(&clause.body);
            }
            Stmt::Comm(clause) => {
                if let Some(comm) = &clause.comm {
                    self.visit_stmt(comm);
                }
                self.copy_to(clause.colon + 1);
                self.transpile_list(&clause.body);
            }
            _ => visit::walk_stmt(self, stmt),
        }
    }
}
