//! Syntax tree traversal.
//!
//! Implementers override `visit_*` methods to add behavior and call the
//! matching `walk_*` function to continue into children. Children are
//! visited in source order.

use crate::ast::*;

pub trait Visit<'ast> {
    fn visit_file(&mut self, file: &'ast File) {
        walk_file(self, file);
    }

    fn visit_decl(&mut self, decl: &'ast Decl) {
        walk_decl(self, decl);
    }

    fn visit_gen_decl(&mut self, decl: &'ast GenDecl) {
        walk_gen_decl(self, decl);
    }

    fn visit_spec(&mut self, spec: &'ast Spec) {
        walk_spec(self, spec);
    }

    fn visit_func_decl(&mut self, func: &'ast FuncDecl) {
        walk_func_decl(self, func);
    }

    fn visit_func_lit(&mut self, func: &'ast FuncLit) {
        walk_func_lit(self, func);
    }

    fn visit_func_type(&mut self, ty: &'ast FuncType) {
        walk_func_type(self, ty);
    }

    fn visit_field_list(&mut self, list: &'ast FieldList) {
        walk_field_list(self, list);
    }

    fn visit_block(&mut self, block: &'ast BlockStmt) {
        walk_block(self, block);
    }

    /// Called for every statement list: block bodies, case and comm clause
    /// bodies, and open tag headers.
    fn visit_stmt_list(&mut self, list: &'ast [Stmt]) {
        walk_stmt_list(self, list);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_open_tag(&mut self, tag: &'ast OpenTagStmt) {
        walk_open_tag(self, tag);
    }

    fn visit_end_tag(&mut self, tag: &'ast EndTagStmt) {
        self.visit_ident(&tag.name);
    }

    fn visit_attribute(&mut self, attr: &'ast AttributeStmt) {
        walk_attribute(self, attr);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_template_literal(&mut self, lit: &'ast TemplateLiteral) {
        walk_template_literal(self, lit);
    }

    fn visit_ident(&mut self, _ident: &'ast Ident) {
        // Leaf node
    }
}

pub fn walk_file<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, file: &'ast File) {
    v.visit_ident(&file.package);
    for decl in &file.decls {
        v.visit_decl(decl);
    }
}

pub fn walk_decl<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, decl: &'ast Decl) {
    match decl {
        Decl::Gen(d) => v.visit_gen_decl(d),
        Decl::Func(f) => v.visit_func_decl(f),
    }
}

pub fn walk_gen_decl<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, decl: &'ast GenDecl) {
    for spec in &decl.specs {
        v.visit_spec(spec);
    }
}

pub fn walk_spec<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, spec: &'ast Spec) {
    match spec {
        Spec::Import(s) => {
            if let Some(name) = &s.name {
                v.visit_ident(name);
            }
        }
        Spec::Value(s) => {
            for name in &s.names {
                v.visit_ident(name);
            }
            if let Some(ty) = &s.ty {
                v.visit_expr(ty);
            }
            for value in &s.values {
                v.visit_expr(value);
            }
        }
        Spec::Type(s) => {
            v.visit_ident(&s.name);
            if let Some(tp) = &s.type_params {
                v.visit_field_list(tp);
            }
            v.visit_expr(&s.ty);
        }
    }
}

pub fn walk_func_decl<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, func: &'ast FuncDecl) {
    if let Some(recv) = &func.recv {
        v.visit_field_list(recv);
    }
    v.visit_ident(&func.name);
    v.visit_func_type(&func.ty);
    if let Some(body) = &func.body {
        v.visit_block(body);
    }
}

pub fn walk_func_lit<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, func: &'ast FuncLit) {
    v.visit_func_type(&func.ty);
    v.visit_block(&func.body);
}

pub fn walk_func_type<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, ty: &'ast FuncType) {
    if let Some(tp) = &ty.type_params {
        v.visit_field_list(tp);
    }
    v.visit_field_list(&ty.params);
    if let Some(results) = &ty.results {
        v.visit_field_list(results);
    }
}

pub fn walk_field_list<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, list: &'ast FieldList) {
    for field in &list.fields {
        for name in &field.names {
            v.visit_ident(name);
        }
        v.visit_expr(&field.ty);
    }
}

pub fn walk_block<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, block: &'ast BlockStmt) {
    v.visit_stmt_list(&block.stmts);
}

pub fn walk_stmt_list<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, list: &'ast [Stmt]) {
    for stmt in list {
        v.visit_stmt(stmt);
    }
}

fn walk_opt_stmt<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, stmt: &'ast Option<Box<Stmt>>) {
    if let Some(s) = stmt {
        v.visit_stmt(s);
    }
}

pub fn walk_stmt<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Decl(d) => v.visit_gen_decl(d),
        Stmt::Labeled(s) => {
            v.visit_ident(&s.label);
            v.visit_stmt(&s.stmt);
        }
        Stmt::Expr(s) => v.visit_expr(&s.x),
        Stmt::Send(s) => {
            v.visit_expr(&s.chan);
            v.visit_expr(&s.value);
        }
        Stmt::IncDec(s) => v.visit_expr(&s.x),
        Stmt::Assign(s) => {
            for e in &s.lhs {
                v.visit_expr(e);
            }
            for e in &s.rhs {
                v.visit_expr(e);
            }
        }
        Stmt::Go(s) => v.visit_expr(&s.call),
        Stmt::Defer(s) => v.visit_expr(&s.call),
        Stmt::Return(s) => {
            for e in &s.results {
                v.visit_expr(e);
            }
        }
        Stmt::Branch(s) => {
            if let Some(label) = &s.label {
                v.visit_ident(label);
            }
        }
        Stmt::Block(b) => v.visit_block(b),
        Stmt::If(s) => {
            walk_opt_stmt(v, &s.init);
            v.visit_expr(&s.cond);
            v.visit_block(&s.body);
            walk_opt_stmt(v, &s.else_branch);
        }
        Stmt::Case(c) => {
            for e in &c.list {
                v.visit_expr(e);
            }
            v.visit_stmt_list(&c.body);
        }
        Stmt::Switch(s) => {
            walk_opt_stmt(v, &s.init);
            if let Some(tag) = &s.tag {
                v.visit_expr(tag);
            }
            v.visit_block(&s.body);
        }
        Stmt::TypeSwitch(s) => {
            walk_opt_stmt(v, &s.init);
            v.visit_stmt(&s.assign);
            v.visit_block(&s.body);
        }
        Stmt::Comm(c) => {
            walk_opt_stmt(v, &c.comm);
            v.visit_stmt_list(&c.body);
        }
        Stmt::Select(s) => v.visit_block(&s.body),
        Stmt::For(s) => {
            walk_opt_stmt(v, &s.init);
            if let Some(cond) = &s.cond {
                v.visit_expr(cond);
            }
            walk_opt_stmt(v, &s.post);
            v.visit_block(&s.body);
        }
        Stmt::Range(s) => {
            if let Some(key) = &s.key {
                v.visit_expr(key);
            }
            if let Some(value) = &s.value {
                v.visit_expr(value);
            }
            v.visit_expr(&s.x);
            v.visit_block(&s.body);
        }
        Stmt::OpenTag(t) => v.visit_open_tag(t),
        Stmt::EndTag(t) => v.visit_end_tag(t),
        Stmt::Attribute(a) => v.visit_attribute(a),
        Stmt::Empty(_) => {}
    }
}

pub fn walk_open_tag<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, tag: &'ast OpenTagStmt) {
    v.visit_ident(&tag.name);
    v.visit_stmt_list(&tag.body);
}

pub fn walk_attribute<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, attr: &'ast AttributeStmt) {
    v.visit_ident(&attr.name);
    if let Some(value) = &attr.value {
        v.visit_expr(value);
    }
}

pub fn walk_template_literal<'ast, V: Visit<'ast> + ?Sized>(
    v: &mut V,
    lit: &'ast TemplateLiteral,
) {
    for part in &lit.parts {
        v.visit_expr(part);
    }
}

pub fn walk_expr<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::Ident(i) => v.visit_ident(i),
        Expr::BasicLit(_) => {}
        Expr::TemplateLiteral(t) => v.visit_template_literal(t),
        Expr::CompositeLit(c) => {
            if let Some(ty) = &c.ty {
                v.visit_expr(ty);
            }
            for e in &c.elts {
                v.visit_expr(e);
            }
        }
        Expr::FuncLit(f) => v.visit_func_lit(f),
        Expr::Paren(p) => v.visit_expr(&p.x),
        Expr::Selector(s) => {
            v.visit_expr(&s.x);
            v.visit_ident(&s.sel);
        }
        Expr::Index(i) => {
            v.visit_expr(&i.x);
            for e in &i.indices {
                v.visit_expr(e);
            }
        }
        Expr::Slice(s) => {
            v.visit_expr(&s.x);
            for e in [&s.low, &s.high, &s.max].into_iter().flatten() {
                v.visit_expr(e);
            }
        }
        Expr::TypeAssert(t) => {
            v.visit_expr(&t.x);
            if let Some(ty) = &t.ty {
                v.visit_expr(ty);
            }
        }
        Expr::Call(c) => {
            v.visit_expr(&c.fun);
            for arg in &c.args {
                v.visit_expr(arg);
            }
        }
        Expr::Star(s) => v.visit_expr(&s.x),
        Expr::Unary(u) => v.visit_expr(&u.x),
        Expr::Binary(b) => {
            v.visit_expr(&b.x);
            v.visit_expr(&b.y);
        }
        Expr::KeyValue(kv) => {
            v.visit_expr(&kv.key);
            v.visit_expr(&kv.value);
        }
        Expr::Ellipsis(e) => {
            if let Some(elt) = &e.elt {
                v.visit_expr(elt);
            }
        }
        Expr::ArrayType(a) => {
            if let Some(len) = &a.len {
                v.visit_expr(len);
            }
            v.visit_expr(&a.elt);
        }
        Expr::StructType(s) => v.visit_field_list(&s.fields),
        Expr::FuncType(f) => v.visit_func_type(f),
        Expr::InterfaceType(i) => v.visit_field_list(&i.methods),
        Expr::MapType(m) => {
            v.visit_expr(&m.key);
            v.visit_expr(&m.value);
        }
        Expr::ChanType(c) => v.visit_expr(&c.value),
    }
}
