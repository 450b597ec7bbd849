//! Template function detection.
//!
//! A function is a template function when its signature is
//! `func(X.Ctx, ...) error` and `X` names an import of the runtime module
//! that is visible (not shadowed) at the signature. Shadowing is tracked
//! syntactically: every binding that could hide an alias is recorded while
//! walking the file, and the same tracking decides which names generated
//! writes can use at each template statement.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use source_map::Span;
use tgo_parser::visit::{self, Visit};
use tgo_parser::{
    AssignStmt, Expr, FieldList, File, FuncDecl, FuncLit, FuncType, Ident, Spec, Stmt,
    RUNTIME_MODULE,
};

/// Default local name of the runtime package.
pub const RUNTIME_PACKAGE_NAME: &str = "tgo";

const INLINE_BITS: usize = 63;

/// Set of shadowed names, indexed by their position in the tracked name
/// list (runtime aliases first, then context parameters in scope).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadowSet {
    bits: u64,
    overflow: FxHashSet<usize>,
}

impl ShadowSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, n: usize) {
        if n < INLINE_BITS {
            self.bits |= 1 << n;
        } else {
            self.overflow.insert(n);
        }
    }

    pub fn unset(&mut self, n: usize) {
        if n < INLINE_BITS {
            self.bits &= !(1 << n);
        } else {
            self.overflow.remove(&n);
        }
    }

    pub fn is_set(&self, n: usize) -> bool {
        if n < INLINE_BITS {
            self.bits & (1 << n) != 0
        } else {
            self.overflow.contains(&n)
        }
    }

    pub fn union_with(&mut self, other: &ShadowSet) {
        self.bits |= other.bits;
        self.overflow.extend(other.overflow.iter().copied());
    }
}

/// A detected template function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TgoFunc {
    /// Span of the whole function declaration or literal.
    pub span: Span,
    /// Runtime alias used in the context parameter's type.
    pub alias: SmolStr,
    /// Name of the context parameter, if it has one.
    pub ctx: Option<Ident>,
}

impl TgoFunc {
    /// The context parameter name usable from generated code.
    pub fn ctx_name(&self) -> Option<&str> {
        self.ctx
            .as_ref()
            .filter(|ident| !ident.is_blank())
            .map(|ident| ident.name.as_str())
    }
}

/// Names a generated write can refer to at one template statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteScope {
    /// A runtime alias not shadowed at the statement, the function's own
    /// alias when possible.
    pub runtime: Option<SmolStr>,
    /// The context parameter is hidden by a binding in the body.
    pub ctx_shadowed: bool,
}

/// Template functions of a file, in source order.
#[derive(Debug, Clone, Default)]
pub struct TgoFuncs {
    aliases: Vec<SmolStr>,
    funcs: IndexMap<Span, TgoFunc>,
    writes: FxHashMap<Span, WriteScope>,
}

impl TgoFuncs {
    /// Local names the runtime module is imported under.
    pub fn aliases(&self) -> &[SmolStr] {
        &self.aliases
    }

    pub fn get(&self, span: Span) -> Option<&TgoFunc> {
        self.funcs.get(&span)
    }

    /// Write names at the template statement spanning `span`, when it sits
    /// directly in a template function.
    pub fn write_scope(&self, span: Span) -> Option<&WriteScope> {
        self.writes.get(&span)
    }

    pub fn contains(&self, span: Span) -> bool {
        self.funcs.contains_key(&span)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TgoFunc> {
        self.funcs.values()
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

/// Local names under which `file` imports the runtime module.
///
/// # Panics
///
/// Panics on a dot import of the runtime, which cannot be tracked by name.
pub fn runtime_aliases(file: &File) -> Vec<SmolStr> {
    let mut aliases = Vec::new();
    for import in &file.imports {
        if import.path_value() != RUNTIME_MODULE {
            continue;
        }
        let alias = match &import.name {
            Some(name) if name.name == "." => {
                panic!("dot import of {RUNTIME_MODULE} is not supported")
            }
            Some(name) if name.is_blank() => continue,
            Some(name) => name.name.clone(),
            None => SmolStr::new_static(RUNTIME_PACKAGE_NAME),
        };
        aliases.push(alias);
    }
    aliases
}

/// Find every template function in `file`.
pub fn check(file: &File) -> TgoFuncs {
    let aliases = runtime_aliases(file);
    let mut classifier = Classifier {
        names: aliases.clone(),
        alias_count: aliases.len(),
        funcs: IndexMap::new(),
        writes: FxHashMap::default(),
        shadowed: ShadowSet::new(),
        target: None,
    };
    if !aliases.is_empty() {
        classifier.visit_file(file);
    }
    let Classifier { funcs, writes, .. } = classifier;
    TgoFuncs {
        aliases,
        funcs,
        writes,
    }
}

/// Tracked names of the template function whose body is being walked.
#[derive(Debug, Clone, Copy)]
struct WriteTarget {
    alias: usize,
    ctx: Option<usize>,
}

struct Classifier {
    /// Runtime aliases followed by the context parameters in scope.
    names: Vec<SmolStr>,
    alias_count: usize,
    funcs: IndexMap<Span, TgoFunc>,
    writes: FxHashMap<Span, WriteScope>,
    shadowed: ShadowSet,
    target: Option<WriteTarget>,
}

impl Classifier {
    fn shadow_ident(&self, set: &mut ShadowSet, name: &str) {
        for (i, tracked) in self.names.iter().enumerate() {
            if tracked == name {
                set.set(i);
            }
        }
    }

    fn shadow_fields(&self, set: &mut ShadowSet, list: Option<&FieldList>) {
        if let Some(list) = list {
            for name in list.names() {
                self.shadow_ident(set, &name.name);
            }
        }
    }

    fn shadow_exprs<'e>(&self, set: &mut ShadowSet, exprs: impl IntoIterator<Item = &'e Expr>) {
        for expr in exprs {
            if let Expr::Ident(ident) = expr {
                self.shadow_ident(set, &ident.name);
            }
        }
    }

    /// Bindings introduced by a simple statement (an init or comm clause).
    fn stmt_bindings(&self, set: &mut ShadowSet, stmt: Option<&Stmt>) {
        if let Some(Stmt::Assign(AssignStmt { lhs, .. })) = stmt {
            self.shadow_exprs(set, lhs);
        }
    }

    fn walk_with(&mut self, set: ShadowSet, f: impl FnOnce(&mut Self)) {
        let saved = std::mem::replace(&mut self.shadowed, set);
        f(self);
        self.shadowed = saved;
    }

    /// Walk a function body. A template function's named context parameter
    /// is tracked for the duration of the body.
    fn walk_body(
        &mut self,
        mut inside: ShadowSet,
        found: Option<&(usize, Option<Ident>)>,
        f: impl FnOnce(&mut Self),
    ) {
        let tracked = self.names.len();
        let target = found.map(|(alias, ctx)| {
            let ctx = ctx.as_ref().filter(|ident| !ident.is_blank()).map(|ident| {
                self.names.push(ident.name.clone());
                inside.unset(tracked);
                tracked
            });
            WriteTarget { alias: *alias, ctx }
        });

        let saved = std::mem::replace(&mut self.target, target);
        self.walk_with(inside, f);
        self.target = saved;
        self.names.truncate(tracked);
    }

    fn record_write(&mut self, span: Span, shadowed: &ShadowSet) {
        let Some(target) = self.target else {
            return;
        };
        let runtime = std::iter::once(target.alias)
            .chain(0..self.alias_count)
            .find(|&i| !shadowed.is_set(i))
            .map(|i| self.names[i].clone());
        let ctx_shadowed = target.ctx.is_some_and(|i| shadowed.is_set(i));
        self.writes.insert(
            span,
            WriteScope {
                runtime,
                ctx_shadowed,
            },
        );
    }

    /// Classify a signature. Returns the alias index and context parameter
    /// when it is a template signature, plus the set in effect inside the
    /// body.
    fn check_func_type(
        &self,
        outer: &ShadowSet,
        ty: &FuncType,
    ) -> (Option<(usize, Option<Ident>)>, ShadowSet) {
        let mut before = outer.clone();
        self.shadow_fields(&mut before, ty.type_params.as_ref());

        let mut inside = before.clone();
        self.shadow_fields(&mut inside, Some(&ty.params));
        self.shadow_fields(&mut inside, ty.results.as_ref());

        (self.template_signature(&before, ty), inside)
    }

    fn template_signature(
        &self,
        shadowed: &ShadowSet,
        ty: &FuncType,
    ) -> Option<(usize, Option<Ident>)> {
        let first = ty.params.fields.first()?;
        let results = ty.results.as_ref()?;
        if results.num_fields() != 1 {
            return None;
        }
        match results.fields[0].ty.unparen() {
            Expr::Ident(ident) if ident.name == "error" => {}
            _ => return None,
        }

        let Expr::Selector(sel) = first.ty.unparen() else {
            return None;
        };
        let pkg = sel.x.as_ident()?;
        if sel.sel.name != "Ctx" {
            return None;
        }
        let index = (0..self.alias_count)
            .find(|&i| self.names[i] == pkg.name && !shadowed.is_set(i))?;

        Some((index, first.names.first().cloned()))
    }

    fn record(&mut self, span: Span, found: Option<&(usize, Option<Ident>)>) {
        if let Some((alias, ctx)) = found {
            let alias = self.names[*alias].clone();
            let ctx = ctx.clone();
            self.funcs.insert(span, TgoFunc { span, alias, ctx });
        }
    }

    fn analyze_stmts(&mut self, list: &[Stmt]) {
        let mut shadowed = self.shadowed.clone();
        for stmt in list {
            let mut stmt = stmt;
            while let Stmt::Labeled(labeled) = stmt {
                stmt = &labeled.stmt;
            }
            if stmt.is_template_content() {
                self.record_write(stmt.span(), &shadowed);
            }

            match stmt {
                Stmt::Decl(decl) => {
                    self.walk_with(shadowed.clone(), |v| visit::walk_stmt(v, stmt));
                    for spec in &decl.specs {
                        match spec {
                            Spec::Value(value) => {
                                for name in &value.names {
                                    self.shadow_ident(&mut shadowed, &name.name);
                                }
                            }
                            Spec::Type(ty) => self.shadow_ident(&mut shadowed, &ty.name.name),
                            Spec::Import(_) => {}
                        }
                    }
                }
                Stmt::Assign(assign) => {
                    self.walk_with(shadowed.clone(), |v| visit::walk_stmt(v, stmt));
                    self.shadow_exprs(&mut shadowed, &assign.lhs);
                }
                Stmt::If(s) => {
                    let mut inner = shadowed.clone();
                    self.stmt_bindings(&mut inner, s.init.as_deref());
                    self.walk_with(inner, |v| visit::walk_stmt(v, stmt));
                }
                Stmt::Switch(s) => {
                    let mut inner = shadowed.clone();
                    self.stmt_bindings(&mut inner, s.init.as_deref());
                    self.walk_with(inner, |v| visit::walk_stmt(v, stmt));
                }
                Stmt::TypeSwitch(s) => {
                    let mut inner = shadowed.clone();
                    self.stmt_bindings(&mut inner, s.init.as_deref());
                    self.stmt_bindings(&mut inner, Some(&s.assign));
                    self.walk_with(inner, |v| visit::walk_stmt(v, stmt));
                }
                Stmt::For(s) => {
                    let mut inner = shadowed.clone();
                    self.stmt_bindings(&mut inner, s.init.as_deref());
                    self.walk_with(inner, |v| visit::walk_stmt(v, stmt));
                }
                Stmt::Comm(c) => {
                    let mut inner = shadowed.clone();
                    self.stmt_bindings(&mut inner, c.comm.as_deref());
                    self.walk_with(inner, |v| visit::walk_stmt(v, stmt));
                }
                Stmt::Range(r) => {
                    let mut inner = shadowed.clone();
                    self.shadow_exprs(&mut inner, r.key.iter().chain(r.value.iter()));
                    self.walk_with(inner, |v| visit::walk_stmt(v, stmt));
                }
                _ => self.walk_with(shadowed.clone(), |v| visit::walk_stmt(v, stmt)),
            }
        }
    }
}

impl<'ast> Visit<'ast> for Classifier {
    fn visit_func_decl(&mut self, func: &'ast FuncDecl) {
        let mut outer = self.shadowed.clone();
        self.shadow_fields(&mut outer, func.recv.as_ref());

        let (found, inside) = self.check_func_type(&outer, &func.ty);
        self.record(func.span, found.as_ref());

        if let Some(body) = &func.body {
            self.walk_body(inside, found.as_ref(), |v| v.visit_block(body));
        }
    }

    fn visit_func_lit(&mut self, func: &'ast FuncLit) {
        let (found, inside) = self.check_func_type(&self.shadowed, &func.ty);
        self.record(func.span, found.as_ref());
        self.walk_body(inside, found.as_ref(), |v| v.visit_block(&func.body));
    }

    fn visit_stmt_list(&mut self, list: &'ast [Stmt]) {
        self.analyze_stmts(list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn template_funcs(src: &str) -> Vec<String> {
        let file = tgo_parser::parse(src).unwrap();
        check(&file)
            .iter()
            .map(|f| {
                let start = f.span.start as usize;
                let head = &src[start..];
                let line = head.lines().next().unwrap_or_default();
                line.trim().to_string()
            })
            .collect()
    }

    #[test]
    fn test_shadow_set_overflow() {
        let mut set = ShadowSet::new();
        set.set(3);
        set.set(62);
        set.set(63);
        set.set(200);
        assert!(set.is_set(3) && set.is_set(62) && set.is_set(63) && set.is_set(200));
        assert!(!set.is_set(4) && !set.is_set(64));

        let mut other = ShadowSet::new();
        other.set(4);
        other.set(100);
        set.union_with(&other);
        assert!(set.is_set(4) && set.is_set(100));
    }

    #[test]
    fn test_runtime_aliases() {
        let file = tgo_parser::parse(
            "package a\nimport (\n\t\"github.com/mateusz834/tgo\"\n\tt \"github.com/mateusz834/tgo\"\n\t_ \"github.com/mateusz834/tgo\"\n\t\"fmt\"\n)\n",
        )
        .unwrap();
        assert_eq!(runtime_aliases(&file), vec!["tgo", "t"]);
    }

    #[test]
    #[should_panic(expected = "dot import")]
    fn test_dot_import_panics() {
        let file = tgo_parser::parse("package a\nimport . \"github.com/mateusz834/tgo\"\n").unwrap();
        runtime_aliases(&file);
    }

    #[test]
    fn test_signature_shapes() {
        let src = r#"package a

import "github.com/mateusz834/tgo"

func a(ctx tgo.Ctx) error { return nil }
func b(tgo.Ctx) error { return nil }
func c(ctx (tgo.Ctx), s string) (error) { return nil }
func d(ctx tgo.Ctx) {}
func e(ctx tgo.Ctx) (err, err2 error) { return nil, nil }
func f(s string, ctx tgo.Ctx) error { return nil }
func g(ctx tgo.Context) error { return nil }
func h() error { return nil }
"#;
        assert_eq!(
            template_funcs(src),
            vec![
                "func a(ctx tgo.Ctx) error { return nil }",
                "func b(tgo.Ctx) error { return nil }",
                "func c(ctx (tgo.Ctx), s string) (error) { return nil }",
            ]
        );
    }

    #[test]
    fn test_without_runtime_import() {
        let src = "package a\n\nfunc a(ctx tgo.Ctx) error { return nil }\n";
        assert!(template_funcs(src).is_empty());
    }

    #[test]
    fn test_ctx_param_name() {
        let src = r#"package a

import t "github.com/mateusz834/tgo"

func a(c t.Ctx) error { return nil }
func b(_ t.Ctx) error { return nil }
"#;
        let file = tgo_parser::parse(src).unwrap();
        let funcs = check(&file);
        let names: Vec<_> = funcs.iter().map(|f| (f.alias.as_str(), f.ctx_name())).collect();
        assert_eq!(names, vec![("t", Some("c")), ("t", None)]);
    }

    #[test]
    fn test_param_shadows_body_not_signature() {
        let src = r#"package a

import "github.com/mateusz834/tgo"

func a(tgo tgo.Ctx) error {
	_ = func(ctx tgo.Ctx) error { return nil }
	return nil
}
"#;
        assert_eq!(template_funcs(src), vec!["func a(tgo tgo.Ctx) error {"]);
    }

    #[test]
    fn test_type_params_and_receivers_shadow() {
        let src = r#"package a

import "github.com/mateusz834/tgo"

func a[tgo any](ctx tgo.Ctx) error { return nil }

type T struct{}

func (tgo T) m(ctx tgo.Ctx) error { return nil }
func (t T) n(ctx tgo.Ctx) error { return nil }
"#;
        assert_eq!(
            template_funcs(src),
            vec!["func (t T) n(ctx tgo.Ctx) error { return nil }"]
        );
    }

    #[test]
    fn test_sequential_shadowing() {
        let src = r#"package a

import "github.com/mateusz834/tgo"

func outer() {
	_ = func(ctx tgo.Ctx) error { return nil }
	tgo := 1
	_ = func(ctx tgo.Ctx) error { return nil }
	_ = tgo
}

func scoped() {
	if tgo := 1; tgo > 0 {
		_ = func(ctx tgo.Ctx) error { return nil }
	}
	_ = func(ctx tgo.Ctx) error { return nil }
	for tgo := range 3 {
		_ = func(ctx tgo.Ctx) error { return nil }
	}
	{
		var tgo int
		_ = tgo
	}
	_ = func(ctx tgo.Ctx) error { return nil }
}
"#;
        let file = tgo_parser::parse(src).unwrap();
        let found: Vec<u32> = check(&file)
            .iter()
            .map(|f| src[..f.span.start as usize].matches('\n').count() as u32 + 1)
            .collect();
        assert_eq!(found, vec![6, 16, 24]);
    }

    #[test]
    fn test_second_alias_still_visible() {
        let src = r#"package a

import (
	"github.com/mateusz834/tgo"
	t "github.com/mateusz834/tgo"
)

func f() {
	tgo := 1
	_ = tgo
	_ = func(ctx tgo.Ctx) error { return nil }
	_ = func(ctx t.Ctx) error { return nil }
}
"#;
        let file = tgo_parser::parse(src).unwrap();
        let funcs = check(&file);
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs.iter().next().unwrap().alias, "t");
    }

    fn write_scopes(src: &str) -> Vec<(u32, Option<String>, bool)> {
        let file = tgo_parser::parse(src).unwrap();
        let funcs = check(&file);
        let mut scopes: Vec<_> = funcs
            .writes
            .iter()
            .map(|(span, scope)| {
                let line = src[..span.start as usize].matches('\n').count() as u32 + 1;
                (line, scope.runtime.as_ref().map(|r| r.to_string()), scope.ctx_shadowed)
            })
            .collect();
        scopes.sort();
        scopes
    }

    #[test]
    fn test_write_scope_tracks_shadowing() {
        let src = r#"package a

import "github.com/mateusz834/tgo"

func f(ctx tgo.Ctx, items []string) error {
	"a"
	for _, tgo := range items {
		<li>"\{tgo}"</li>
	}
	{
		ctx := "b"
		"\{ctx}"
	}
	return nil
}
"#;
        assert_eq!(
            write_scopes(src),
            vec![
                (6, Some("tgo".to_string()), false),
                (8, None, false),
                (8, None, false),
                (8, None, false),
                (12, Some("tgo".to_string()), true),
            ]
        );
    }

    #[test]
    fn test_write_scope_falls_back_to_visible_alias() {
        let src = r#"package a

import (
	"github.com/mateusz834/tgo"
	t "github.com/mateusz834/tgo"
)

func f(ctx tgo.Ctx) error {
	if tgo := 1; tgo > 0 {
		"\{tgo}"
	}
	return nil
}
"#;
        assert_eq!(write_scopes(src), vec![(10, Some("t".to_string()), false)]);
    }

    #[test]
    fn test_write_scope_ctx_param_named_like_alias() {
        let src = r#"package a

import "github.com/mateusz834/tgo"

func f(tgo tgo.Ctx) error {
	"a"
	return nil
}

func g(_ tgo.Ctx) error {
	_ = func() {
		"b"
	}
	return nil
}
"#;
        // The parameter hides the alias in the body; content in a plain
        // closure has no write scope.
        assert_eq!(write_scopes(src), vec![(6, None, false)]);
    }

    #[test]
    fn test_check_is_idempotent() {
        let src = r#"package a

import (
	"github.com/mateusz834/tgo"
	t "github.com/mateusz834/tgo"
)

func a(ctx tgo.Ctx) error {
	tgo := 1
	_ = func(c t.Ctx) error { "\{tgo}"; return nil }
	return nil
}

func b(ctx t.Ctx) error { <p></p>; return nil }
"#;
        let file = tgo_parser::parse(src).unwrap();
        let first = check(&file);
        let second = check(&file);

        assert_eq!(first.aliases(), second.aliases());
        let spans = |funcs: &TgoFuncs| funcs.iter().map(|f| (f.span, f.alias.clone())).collect::<Vec<_>>();
        assert_eq!(spans(&first), spans(&second));
        assert_eq!(first.len(), 3);
        assert_eq!(first.writes, second.writes);
    }
}
