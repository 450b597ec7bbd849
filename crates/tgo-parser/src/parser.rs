//! Recursive descent parser for tgo files.

use crate::ast::*;
use crate::error::{ErrorCode, ParseError, ParseResult};
use crate::lexer::{tokenize, Token, TokenKind};
use smol_str::SmolStr;
use source_map::Span;

/// Parse a tgo file from source code.
pub fn parse_source(source: &str) -> ParseResult<File> {
    let scanned = tokenize(source)?;
    let mut parser = Parser::new(source, scanned.tokens);
    let mut file = parser.parse_file()?;
    file.comments = scanned.comments;
    Ok(file)
}

/// Where a simple statement appears.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SimpleMode {
    Basic,
    LabelOk,
    RangeOk,
}

enum Simple {
    Stmt(Stmt),
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        op: Option<AssignOp>,
        x: Expr,
    },
}

enum ParamEntry {
    Named(Ident, Expr),
    Unnamed(Expr),
}

/// Saved nesting state, see [`Parser::enter_nested`].
#[derive(Clone, Copy)]
struct Nesting {
    expr_lev: i32,
    in_tag_header: bool,
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// End of the last consumed token that is not an inserted semicolon.
    prev_end: u32,
    /// Negative inside control clauses, where `{` opens the body and not a
    /// composite literal.
    expr_lev: i32,
    /// Inside an open tag header, where `>` closes the tag.
    in_tag_header: bool,
    imports: Vec<ImportSpec>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            prev_end: 0,
            expr_lev: 0,
            in_tag_header: false,
            imports: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Token helpers
    // -----------------------------------------------------------------------

    fn tok(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.tok().kind
    }

    fn peek(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn start(&self) -> u32 {
        self.tok().span.start
    }

    fn text(&self, tok: Token) -> &'a str {
        &self.source[tok.span.to_range()]
    }

    fn next(&mut self) -> Token {
        let tok = self.tok();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        if !tok.is_auto_semicolon() {
            self.prev_end = tok.span.end;
        }
        tok
    }

    fn got(&mut self, kind: TokenKind) -> bool {
        if self.kind() == kind {
            self.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.kind() == kind {
            Ok(self.next())
        } else {
            Err(self.error_expected(kind.describe()))
        }
    }

    fn found(&self) -> String {
        let tok = self.tok();
        if tok.is_auto_semicolon() {
            return "newline".to_string();
        }
        match tok.kind {
            TokenKind::Ident => self.text(tok).to_string(),
            kind => kind.describe().to_string(),
        }
    }

    fn error_expected(&self, what: &str) -> ParseError {
        ParseError::unexpected_token(what, &self.found(), self.tok().span)
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    /// Whether the current token begins a tag or an attribute.
    fn at_tgo_start(&self) -> bool {
        match self.kind() {
            TokenKind::Lss => matches!(self.peek(1), TokenKind::Ident | TokenKind::Quo),
            TokenKind::At => true,
            _ => false,
        }
    }

    fn expect_semi(&mut self) -> ParseResult<()> {
        match self.kind() {
            TokenKind::Semicolon => {
                self.next();
                Ok(())
            }
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => Ok(()),
            TokenKind::Gtr if self.in_tag_header => Ok(()),
            _ if self.at_tgo_start() => Ok(()),
            _ => Err(self.error_expected("';'")),
        }
    }

    /// Enter parentheses, brackets or a body: composite literals are
    /// allowed again and `>` is an operator again.
    fn enter_nested(&mut self) -> Nesting {
        let saved = Nesting {
            expr_lev: self.expr_lev,
            in_tag_header: self.in_tag_header,
        };
        self.expr_lev = 0;
        self.in_tag_header = false;
        saved
    }

    fn leave_nested(&mut self, saved: Nesting) {
        self.expr_lev = saved.expr_lev;
        self.in_tag_header = saved.in_tag_header;
    }

    fn parse_ident(&mut self) -> ParseResult<Ident> {
        let tok = self.expect(TokenKind::Ident)?;
        Ok(Ident {
            name: SmolStr::new(self.text(tok)),
            span: tok.span,
        })
    }

    /// Identifier that may contain dashes, as in `data-id`.
    fn parse_dashed_name(&mut self) -> ParseResult<Ident> {
        let first = self.expect(TokenKind::Ident)?;
        let mut end = first.span.end;
        while self.kind() == TokenKind::Sub
            && self.tok().span.start == end
            && self.peek(1) == TokenKind::Ident
            && self.tokens[self.pos + 1].span.start == end + 1
        {
            self.next();
            end = self.next().span.end;
        }
        let span = Span::new(first.span.start, end);
        Ok(Ident {
            name: SmolStr::new(&self.source[span.to_range()]),
            span,
        })
    }

    // -----------------------------------------------------------------------
    // Declarations
    // -----------------------------------------------------------------------

    fn parse_file(&mut self) -> ParseResult<File> {
        self.expect(TokenKind::Package)?;
        let package = self.parse_ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        while self.kind() == TokenKind::Import {
            decls.push(Decl::Gen(self.parse_gen_decl()?));
            self.expect_semi()?;
        }

        while self.kind() != TokenKind::Eof {
            let decl = match self.kind() {
                TokenKind::Const | TokenKind::Var | TokenKind::Type => {
                    Decl::Gen(self.parse_gen_decl()?)
                }
                TokenKind::Func => Decl::Func(self.parse_func_decl()?),
                TokenKind::Import => {
                    return Err(ParseError::new(
                        "imports must appear before other declarations",
                        self.tok().span,
                        ErrorCode::SyntaxError,
                    ))
                }
                _ => return Err(self.error_expected("declaration")),
            };
            decls.push(decl);
            self.expect_semi()?;
        }

        Ok(File {
            package,
            imports: std::mem::take(&mut self.imports),
            decls,
            comments: Vec::new(),
            span: Span::new(0, self.source.len() as u32),
        })
    }

    fn parse_gen_decl(&mut self) -> ParseResult<GenDecl> {
        let start = self.start();
        let kind = match self.next().kind {
            TokenKind::Import => GenKind::Import,
            TokenKind::Const => GenKind::Const,
            TokenKind::Type => GenKind::Type,
            TokenKind::Var => GenKind::Var,
            other => unreachable!("gen decl started with {other:?}"),
        };

        let mut specs = Vec::new();
        if self.got(TokenKind::LParen) {
            while !matches!(self.kind(), TokenKind::RParen | TokenKind::Eof) {
                specs.push(self.parse_spec(kind)?);
                self.expect_semi()?;
            }
            self.expect(TokenKind::RParen)?;
        } else {
            specs.push(self.parse_spec(kind)?);
        }

        Ok(GenDecl {
            kind,
            specs,
            span: self.span_from(start),
        })
    }

    fn parse_spec(&mut self, kind: GenKind) -> ParseResult<Spec> {
        let start = self.start();
        match kind {
            GenKind::Import => {
                let name = match self.kind() {
                    TokenKind::Ident => Some(self.parse_ident()?),
                    TokenKind::Period => {
                        let tok = self.next();
                        Some(Ident {
                            name: SmolStr::new_inline("."),
                            span: tok.span,
                        })
                    }
                    _ => None,
                };
                let tok = self.expect(TokenKind::String)?;
                let spec = ImportSpec {
                    name,
                    path: BasicLit {
                        kind: LitKind::String,
                        value: self.text(tok).to_string(),
                        span: tok.span,
                    },
                    span: self.span_from(start),
                };
                self.imports.push(spec.clone());
                Ok(Spec::Import(spec))
            }
            GenKind::Const | GenKind::Var => {
                let names = self.parse_ident_list()?;
                let ty = if !matches!(
                    self.kind(),
                    TokenKind::Assign | TokenKind::Semicolon | TokenKind::RParen
                ) {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                let values = if self.got(TokenKind::Assign) {
                    self.parse_expr_list()?
                } else {
                    Vec::new()
                };
                Ok(Spec::Value(ValueSpec {
                    names,
                    ty,
                    values,
                    span: self.span_from(start),
                }))
            }
            GenKind::Type => {
                let name = self.parse_ident()?;
                let type_params = if self.kind() == TokenKind::LBrack && self.at_type_params() {
                    Some(self.parse_parameters(TokenKind::RBrack, true)?)
                } else {
                    None
                };
                let assign = self.got(TokenKind::Assign);
                let ty = self.parse_type()?;
                Ok(Spec::Type(TypeSpec {
                    name,
                    type_params,
                    assign,
                    ty,
                    span: self.span_from(start),
                }))
            }
        }
    }

    /// After `type Name`, tell `[T any]` apart from an array length.
    fn at_type_params(&self) -> bool {
        self.peek(1) == TokenKind::Ident
            && matches!(
                self.peek(2),
                TokenKind::Ident
                    | TokenKind::Comma
                    | TokenKind::Interface
                    | TokenKind::Func
                    | TokenKind::Map
                    | TokenKind::Chan
                    | TokenKind::Struct
                    | TokenKind::Tilde
            )
    }

    fn parse_ident_list(&mut self) -> ParseResult<Vec<Ident>> {
        let mut names = vec![self.parse_ident()?];
        while self.got(TokenKind::Comma) {
            names.push(self.parse_ident()?);
        }
        Ok(names)
    }

    fn parse_func_decl(&mut self) -> ParseResult<FuncDecl> {
        let start = self.expect(TokenKind::Func)?.span.start;
        let recv = if self.kind() == TokenKind::LParen {
            Some(self.parse_parameters(TokenKind::RParen, false)?)
        } else {
            None
        };
        let name = self.parse_ident()?;
        let type_params = if self.kind() == TokenKind::LBrack {
            Some(self.parse_parameters(TokenKind::RBrack, true)?)
        } else {
            None
        };
        let mut ty = self.parse_signature(start)?;
        ty.type_params = type_params;

        let body = if self.kind() == TokenKind::LBrace {
            Some(self.parse_func_body()?)
        } else {
            None
        };

        Ok(FuncDecl {
            recv,
            name,
            ty,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_func_body(&mut self) -> ParseResult<BlockStmt> {
        let saved = self.enter_nested();
        let body = self.parse_block();
        self.leave_nested(saved);
        body
    }

    fn parse_signature(&mut self, start: u32) -> ParseResult<FuncType> {
        let params = if self.kind() == TokenKind::LParen {
            self.parse_parameters(TokenKind::RParen, false)?
        } else {
            return Err(self.error_expected("'('"));
        };

        let results = if self.kind() == TokenKind::LParen {
            Some(self.parse_parameters(TokenKind::RParen, false)?)
        } else if starts_type(self.kind()) {
            let ty = self.parse_type()?;
            let span = ty.span();
            Some(FieldList {
                fields: vec![Field {
                    names: Vec::new(),
                    ty,
                    tag: None,
                    span,
                }],
                span,
            })
        } else {
            None
        };

        Ok(FuncType {
            type_params: None,
            params,
            results,
            span: self.span_from(start),
        })
    }

    /// Parse `( ... )` parameters or `[ ... ]` type parameters.
    fn parse_parameters(&mut self, close: TokenKind, type_params: bool) -> ParseResult<FieldList> {
        let open = self.next();
        let saved = self.enter_nested();
        let mut entries = Vec::new();
        while self.kind() != close && self.kind() != TokenKind::Eof {
            entries.push(self.parse_param_entry(type_params)?);
            if !self.got(TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(close)?;
        self.leave_nested(saved);

        Ok(FieldList {
            fields: group_params(entries)?,
            span: Span::new(open.span.start, close.span.end),
        })
    }

    fn parse_param_entry(&mut self, type_params: bool) -> ParseResult<ParamEntry> {
        if self.kind() == TokenKind::Ident && starts_param_type(self.peek(1)) {
            let name = self.parse_ident()?;
            let ty = self.parse_param_type(type_params)?;
            return Ok(ParamEntry::Named(name, ty));
        }
        Ok(ParamEntry::Unnamed(self.parse_param_type(type_params)?))
    }

    fn parse_param_type(&mut self, type_params: bool) -> ParseResult<Expr> {
        if type_params {
            return self.parse_constraint();
        }
        if self.kind() == TokenKind::Ellipsis {
            let start = self.next().span.start;
            let elt = self.parse_type()?;
            return Ok(Expr::Ellipsis(EllipsisExpr {
                elt: Some(Box::new(elt)),
                span: self.span_from(start),
            }));
        }
        self.parse_type()
    }

    /// A type constraint: `T`, `~T` or a `|` union of those.
    fn parse_constraint(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let mut x = self.parse_constraint_term()?;
        while self.got(TokenKind::Or) {
            let y = self.parse_constraint_term()?;
            x = Expr::Binary(BinaryExpr {
                x: Box::new(x),
                op: BinaryOp::Or,
                y: Box::new(y),
                span: self.span_from(start),
            });
        }
        Ok(x)
    }

    fn parse_constraint_term(&mut self) -> ParseResult<Expr> {
        if self.kind() == TokenKind::Tilde {
            let start = self.next().span.start;
            let x = self.parse_type()?;
            return Ok(Expr::Unary(UnaryExpr {
                op: UnaryOp::Tilde,
                x: Box::new(x),
                span: self.span_from(start),
            }));
        }
        self.parse_type()
    }

    // -----------------------------------------------------------------------
    // Types
    // -----------------------------------------------------------------------

    fn parse_type(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        match self.kind() {
            TokenKind::Ident => self.parse_type_name(),
            TokenKind::Mul => {
                self.next();
                let x = self.parse_type()?;
                Ok(Expr::Star(StarExpr {
                    x: Box::new(x),
                    span: self.span_from(start),
                }))
            }
            TokenKind::LBrack => self.parse_array_type(),
            TokenKind::LParen => {
                self.next();
                let saved = self.enter_nested();
                let x = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                self.leave_nested(saved);
                Ok(Expr::Paren(ParenExpr {
                    x: Box::new(x),
                    span: self.span_from(start),
                }))
            }
            TokenKind::Func => {
                self.next();
                Ok(Expr::FuncType(self.parse_signature(start)?))
            }
            TokenKind::Map => {
                self.next();
                self.expect(TokenKind::LBrack)?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBrack)?;
                let value = self.parse_type()?;
                Ok(Expr::MapType(MapType {
                    key: Box::new(key),
                    value: Box::new(value),
                    span: self.span_from(start),
                }))
            }
            TokenKind::Chan | TokenKind::Arrow => self.parse_chan_type(),
            TokenKind::Struct => self.parse_struct_type(),
            TokenKind::Interface => self.parse_interface_type(),
            _ => Err(self.error_expected("type")),
        }
    }

    fn parse_type_name(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let mut x = Expr::Ident(self.parse_ident()?);
        if self.got(TokenKind::Period) {
            let sel = self.parse_ident()?;
            x = Expr::Selector(SelectorExpr {
                x: Box::new(x),
                sel,
                span: self.span_from(start),
            });
        }
        if self.kind() == TokenKind::LBrack {
            self.next();
            let saved = self.enter_nested();
            let mut indices = vec![self.parse_type()?];
            while self.got(TokenKind::Comma) {
                if self.kind() == TokenKind::RBrack {
                    break;
                }
                indices.push(self.parse_type()?);
            }
            self.expect(TokenKind::RBrack)?;
            self.leave_nested(saved);
            x = Expr::Index(IndexExpr {
                x: Box::new(x),
                indices,
                span: self.span_from(start),
            });
        }
        Ok(x)
    }

    fn parse_array_type(&mut self) -> ParseResult<Expr> {
        let start = self.expect(TokenKind::LBrack)?.span.start;
        let saved = self.enter_nested();
        let len = match self.kind() {
            TokenKind::RBrack => None,
            TokenKind::Ellipsis if self.peek(1) == TokenKind::RBrack => {
                let tok = self.next();
                Some(Box::new(Expr::Ellipsis(EllipsisExpr {
                    elt: None,
                    span: tok.span,
                })))
            }
            _ => Some(Box::new(self.parse_expr()?)),
        };
        self.expect(TokenKind::RBrack)?;
        self.leave_nested(saved);
        let elt = self.parse_type()?;
        Ok(Expr::ArrayType(ArrayType {
            len,
            elt: Box::new(elt),
            span: self.span_from(start),
        }))
    }

    fn parse_chan_type(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let dir = if self.got(TokenKind::Arrow) {
            self.expect(TokenKind::Chan)?;
            ChanDir::Recv
        } else {
            self.expect(TokenKind::Chan)?;
            if self.got(TokenKind::Arrow) {
                ChanDir::Send
            } else {
                ChanDir::Both
            }
        };
        let value = self.parse_type()?;
        Ok(Expr::ChanType(ChanType {
            dir,
            value: Box::new(value),
            span: self.span_from(start),
        }))
    }

    fn parse_struct_type(&mut self) -> ParseResult<Expr> {
        let start = self.expect(TokenKind::Struct)?.span.start;
        let lbrace = self.expect(TokenKind::LBrace)?.span.start;
        let saved = self.enter_nested();
        let mut fields = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Semicolon => {
                    self.next();
                }
                TokenKind::RBrace | TokenKind::Eof => break,
                _ => {
                    fields.push(self.parse_struct_field()?);
                    self.expect_semi()?;
                }
            }
        }
        let rbrace = self.expect(TokenKind::RBrace)?.span.end;
        self.leave_nested(saved);
        Ok(Expr::StructType(StructType {
            fields: FieldList {
                fields,
                span: Span::new(lbrace, rbrace),
            },
            span: self.span_from(start),
        }))
    }

    fn parse_struct_field(&mut self) -> ParseResult<Field> {
        let start = self.start();
        let embedded = match self.kind() {
            TokenKind::Mul => true,
            TokenKind::Ident => matches!(
                self.peek(1),
                TokenKind::Period | TokenKind::String | TokenKind::Semicolon | TokenKind::RBrace
            ),
            _ => false,
        };
        let (names, ty) = if embedded {
            (Vec::new(), self.parse_type()?)
        } else {
            let names = self.parse_ident_list()?;
            (names, self.parse_type()?)
        };
        let tag = if self.kind() == TokenKind::String {
            let tok = self.next();
            Some(BasicLit {
                kind: LitKind::String,
                value: self.text(tok).to_string(),
                span: tok.span,
            })
        } else {
            None
        };
        Ok(Field {
            names,
            ty,
            tag,
            span: self.span_from(start),
        })
    }

    fn parse_interface_type(&mut self) -> ParseResult<Expr> {
        let start = self.expect(TokenKind::Interface)?.span.start;
        let lbrace = self.expect(TokenKind::LBrace)?.span.start;
        let saved = self.enter_nested();
        let mut methods = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Semicolon => {
                    self.next();
                }
                TokenKind::RBrace | TokenKind::Eof => break,
                _ => {
                    let field_start = self.start();
                    let field = if self.kind() == TokenKind::Ident
                        && self.peek(1) == TokenKind::LParen
                    {
                        let name = self.parse_ident()?;
                        let sig = self.parse_signature(field_start)?;
                        Field {
                            names: vec![name],
                            ty: Expr::FuncType(sig),
                            tag: None,
                            span: self.span_from(field_start),
                        }
                    } else {
                        let ty = self.parse_constraint()?;
                        Field {
                            names: Vec::new(),
                            ty,
                            tag: None,
                            span: self.span_from(field_start),
                        }
                    };
                    methods.push(field);
                    self.expect_semi()?;
                }
            }
        }
        let rbrace = self.expect(TokenKind::RBrace)?.span.end;
        self.leave_nested(saved);
        Ok(Expr::InterfaceType(InterfaceType {
            methods: FieldList {
                fields: methods,
                span: Span::new(lbrace, rbrace),
            },
            span: self.span_from(start),
        }))
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    fn parse_block(&mut self) -> ParseResult<BlockStmt> {
        let lbrace = self.expect(TokenKind::LBrace)?.span.start;
        let saved = self.enter_nested();
        let stmts = self.parse_stmt_list()?;
        self.leave_nested(saved);
        let rbrace = self.expect(TokenKind::RBrace)?.span.start;
        Ok(BlockStmt {
            lbrace,
            stmts,
            rbrace,
        })
    }

    fn parse_stmt_list(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    self.next();
                }
                _ => stmts.push(self.parse_stmt()?),
            }
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        let stmt = match self.kind() {
            TokenKind::Lss if self.peek(1) == TokenKind::Ident => {
                return self.parse_open_tag().map(Stmt::OpenTag);
            }
            TokenKind::Lss if self.peek(1) == TokenKind::Quo => {
                return self.parse_end_tag().map(Stmt::EndTag);
            }
            TokenKind::At => return self.parse_attribute().map(Stmt::Attribute),
            TokenKind::Semicolon => {
                let semi = self.next();
                return Ok(Stmt::Empty(EmptyStmt {
                    span: semi.span,
                    implicit: semi.is_auto_semicolon(),
                }));
            }
            TokenKind::RBrace | TokenKind::Case | TokenKind::Default => {
                return Ok(Stmt::Empty(EmptyStmt {
                    span: Span::new(start, start),
                    implicit: true,
                }));
            }
            TokenKind::Const | TokenKind::Var | TokenKind::Type => {
                Stmt::Decl(self.parse_gen_decl()?)
            }
            kind if starts_expr(kind) => match self.parse_simple_stmt(SimpleMode::LabelOk)? {
                Simple::Stmt(s @ Stmt::Labeled(_)) => return Ok(s),
                Simple::Stmt(s) => s,
                Simple::Range { .. } => unreachable!("range clause outside of for"),
            },
            TokenKind::Go | TokenKind::Defer => {
                let go = self.next().kind == TokenKind::Go;
                let call = self.parse_expr()?;
                let span = self.span_from(start);
                if go {
                    Stmt::Go(GoStmt { call, span })
                } else {
                    Stmt::Defer(DeferStmt { call, span })
                }
            }
            TokenKind::Return => {
                self.next();
                let results = if matches!(self.kind(), TokenKind::Semicolon | TokenKind::RBrace)
                    || self.at_tgo_start()
                {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                Stmt::Return(ReturnStmt {
                    results,
                    span: self.span_from(start),
                })
            }
            TokenKind::Break | TokenKind::Continue | TokenKind::Goto | TokenKind::Fallthrough => {
                let kind = match self.next().kind {
                    TokenKind::Break => BranchKind::Break,
                    TokenKind::Continue => BranchKind::Continue,
                    TokenKind::Goto => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                };
                let label = if kind != BranchKind::Fallthrough && self.kind() == TokenKind::Ident {
                    Some(self.parse_ident()?)
                } else {
                    None
                };
                Stmt::Branch(BranchStmt {
                    kind,
                    label,
                    span: self.span_from(start),
                })
            }
            TokenKind::LBrace => Stmt::Block(self.parse_block()?),
            TokenKind::If => self.parse_if()?,
            TokenKind::Switch => self.parse_switch()?,
            TokenKind::Select => self.parse_select()?,
            TokenKind::For => self.parse_for()?,
            _ => return Err(self.error_expected("statement")),
        };
        self.expect_semi()?;
        Ok(stmt)
    }

    fn parse_simple_stmt(&mut self, mode: SimpleMode) -> ParseResult<Simple> {
        let start = self.start();
        if mode == SimpleMode::RangeOk && self.kind() == TokenKind::Range {
            self.next();
            let x = self.parse_expr()?;
            return Ok(Simple::Range {
                key: None,
                value: None,
                op: None,
                x,
            });
        }

        let lhs = self.parse_expr_list()?;

        if let Some(op) = assign_op(self.kind()) {
            self.next();
            if mode == SimpleMode::RangeOk
                && self.kind() == TokenKind::Range
                && matches!(op, AssignOp::Assign | AssignOp::Define)
            {
                self.next();
                let x = self.parse_expr()?;
                let mut lhs = lhs.into_iter();
                return Ok(Simple::Range {
                    key: lhs.next(),
                    value: lhs.next(),
                    op: Some(op),
                    x,
                });
            }
            let rhs = self.parse_expr_list()?;
            return Ok(Simple::Stmt(Stmt::Assign(AssignStmt {
                lhs,
                op,
                rhs,
                span: self.span_from(start),
            })));
        }

        let mut lhs = lhs;
        if lhs.len() > 1 {
            return Err(self.error_expected("':=' or '=' or ','"));
        }
        let x = lhs.remove(0);

        match self.kind() {
            TokenKind::Colon if mode == SimpleMode::LabelOk && matches!(x, Expr::Ident(_)) => {
                self.next();
                let Expr::Ident(label) = x else {
                    unreachable!()
                };
                let stmt = self.parse_stmt()?;
                Ok(Simple::Stmt(Stmt::Labeled(LabeledStmt {
                    label,
                    stmt: Box::new(stmt),
                    span: self.span_from(start),
                })))
            }
            TokenKind::Arrow => {
                self.next();
                let value = self.parse_expr()?;
                Ok(Simple::Stmt(Stmt::Send(SendStmt {
                    chan: x,
                    value,
                    span: self.span_from(start),
                })))
            }
            TokenKind::Inc | TokenKind::Dec => {
                let inc = self.next().kind == TokenKind::Inc;
                Ok(Simple::Stmt(Stmt::IncDec(IncDecStmt {
                    x,
                    inc,
                    span: self.span_from(start),
                })))
            }
            _ => Ok(Simple::Stmt(Stmt::Expr(ExprStmt { x }))),
        }
    }

    fn parse_simple_only(&mut self) -> ParseResult<Stmt> {
        match self.parse_simple_stmt(SimpleMode::Basic)? {
            Simple::Stmt(s) => Ok(s),
            Simple::Range { .. } => unreachable!("range clause outside of for"),
        }
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(TokenKind::If)?.span.start;
        let prev = self.expr_lev;
        self.expr_lev = -1;

        if self.kind() == TokenKind::LBrace {
            return Err(ParseError::new(
                "missing condition in if statement",
                self.tok().span,
                ErrorCode::SyntaxError,
            ));
        }

        let mut init = None;
        let mut stmt = None;
        if self.kind() != TokenKind::Semicolon {
            stmt = Some(self.parse_simple_only()?);
        }
        let cond = if self.got(TokenKind::Semicolon) {
            init = stmt.take().map(Box::new);
            self.parse_expr()?
        } else {
            match stmt {
                Some(Stmt::Expr(e)) => e.x,
                _ => {
                    return Err(ParseError::new(
                        "expected condition in if statement",
                        self.span_from(start),
                        ErrorCode::SyntaxError,
                    ))
                }
            }
        };
        self.expr_lev = prev;

        let body = self.parse_block()?;
        let else_branch = if self.got(TokenKind::Else) {
            match self.kind() {
                TokenKind::If => Some(Box::new(self.parse_if()?)),
                TokenKind::LBrace => Some(Box::new(Stmt::Block(self.parse_block()?))),
                _ => return Err(self.error_expected("if statement or block")),
            }
        } else {
            None
        };

        Ok(Stmt::If(IfStmt {
            init,
            cond,
            body,
            else_branch,
            span: self.span_from(start),
        }))
    }

    fn parse_switch(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(TokenKind::Switch)?.span.start;
        let prev = self.expr_lev;
        self.expr_lev = -1;

        let mut init = None;
        let mut tag = None;
        if self.kind() != TokenKind::LBrace {
            if self.kind() != TokenKind::Semicolon {
                tag = Some(self.parse_simple_only()?);
            }
            if self.got(TokenKind::Semicolon) {
                init = tag.take().map(Box::new);
                if self.kind() != TokenKind::LBrace {
                    tag = Some(self.parse_simple_only()?);
                }
            }
        }
        self.expr_lev = prev;

        let is_type_switch = match &tag {
            Some(Stmt::Assign(a)) => {
                a.op == AssignOp::Define && a.rhs.len() == 1 && is_type_switch_guard(&a.rhs[0])
            }
            Some(Stmt::Expr(e)) => is_type_switch_guard(&e.x),
            _ => false,
        };

        let body = self.parse_clause_block(false)?;

        if is_type_switch {
            let Some(assign) = tag else {
                unreachable!("type switch without guard")
            };
            return Ok(Stmt::TypeSwitch(TypeSwitchStmt {
                init,
                assign: Box::new(assign),
                body,
                span: self.span_from(start),
            }));
        }

        let tag = match tag {
            None => None,
            Some(Stmt::Expr(e)) => Some(e.x),
            Some(other) => {
                return Err(ParseError::new(
                    "switch expression must be an expression",
                    other.span(),
                    ErrorCode::SyntaxError,
                ))
            }
        };
        Ok(Stmt::Switch(SwitchStmt {
            init,
            tag,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_select(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(TokenKind::Select)?.span.start;
        let body = self.parse_clause_block(true)?;
        Ok(Stmt::Select(SelectStmt {
            body,
            span: self.span_from(start),
        }))
    }

    /// `{ case ...: ... default: ... }` of a switch or select.
    fn parse_clause_block(&mut self, comm: bool) -> ParseResult<BlockStmt> {
        let lbrace = self.expect(TokenKind::LBrace)?.span.start;
        let saved = self.enter_nested();
        let mut stmts = Vec::new();
        while matches!(self.kind(), TokenKind::Case | TokenKind::Default) {
            stmts.push(if comm {
                self.parse_comm_clause()?
            } else {
                self.parse_case_clause()?
            });
        }
        self.leave_nested(saved);
        let rbrace = self.expect(TokenKind::RBrace)?.span.start;
        Ok(BlockStmt {
            lbrace,
            stmts,
            rbrace,
        })
    }

    fn parse_case_clause(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        let list = if self.next().kind == TokenKind::Case {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        let colon = self.expect(TokenKind::Colon)?.span.start;
        let body = self.parse_stmt_list()?;
        Ok(Stmt::Case(CaseClause {
            list,
            colon,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_comm_clause(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        let comm = if self.next().kind == TokenKind::Case {
            Some(Box::new(self.parse_simple_only()?))
        } else {
            None
        };
        let colon = self.expect(TokenKind::Colon)?.span.start;
        let body = self.parse_stmt_list()?;
        Ok(Stmt::Comm(CommClause {
            comm,
            colon,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(TokenKind::For)?.span.start;
        let prev = self.expr_lev;
        self.expr_lev = -1;

        let mut init = None;
        let mut cond = None;
        let mut post = None;
        let mut range = None;

        if self.kind() != TokenKind::LBrace {
            let mut first = None;
            if self.kind() != TokenKind::Semicolon {
                match self.parse_simple_stmt(SimpleMode::RangeOk)? {
                    Simple::Stmt(s) => first = Some(s),
                    r @ Simple::Range { .. } => range = Some(r),
                }
            }
            if range.is_none() && self.kind() == TokenKind::Semicolon {
                self.next();
                init = first.take().map(Box::new);
                if self.kind() != TokenKind::Semicolon {
                    cond = Some(self.parse_expr()?);
                }
                self.expect(TokenKind::Semicolon)?;
                if self.kind() != TokenKind::LBrace {
                    post = Some(Box::new(self.parse_simple_only()?));
                }
            } else if let Some(s) = first {
                match s {
                    Stmt::Expr(e) => cond = Some(e.x),
                    other => {
                        return Err(ParseError::new(
                            "expected for loop condition",
                            other.span(),
                            ErrorCode::SyntaxError,
                        ))
                    }
                }
            }
        }
        self.expr_lev = prev;

        let body = self.parse_block()?;
        if let Some(Simple::Range { key, value, op, x }) = range {
            return Ok(Stmt::Range(RangeStmt {
                key,
                value,
                op,
                x,
                body,
                span: self.span_from(start),
            }));
        }
        Ok(Stmt::For(ForStmt {
            init,
            cond,
            post,
            body,
            span: self.span_from(start),
        }))
    }

    // -----------------------------------------------------------------------
    // Tags and attributes
    // -----------------------------------------------------------------------

    fn parse_open_tag(&mut self) -> ParseResult<OpenTagStmt> {
        let open_pos = self.expect(TokenKind::Lss)?.span.start;
        let name = self.parse_dashed_name()?;

        let saved = self.enter_nested();
        self.in_tag_header = true;
        let mut body = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Semicolon => {
                    self.next();
                }
                TokenKind::Gtr => break,
                TokenKind::Eof => return Err(self.error_expected("'>'")),
                _ => body.push(self.parse_stmt()?),
            }
        }
        let close_pos = self.expect(TokenKind::Gtr)?.span.start;
        self.leave_nested(saved);
        self.got(TokenKind::Semicolon);

        Ok(OpenTagStmt {
            open_pos,
            name,
            body,
            close_pos,
        })
    }

    fn parse_end_tag(&mut self) -> ParseResult<EndTagStmt> {
        let open_pos = self.expect(TokenKind::Lss)?.span.start;
        self.expect(TokenKind::Quo)?;
        let name = self.parse_dashed_name()?;
        let close_pos = self.expect(TokenKind::Gtr)?.span.start;
        self.got(TokenKind::Semicolon);
        Ok(EndTagStmt {
            open_pos,
            name,
            close_pos,
        })
    }

    fn parse_attribute(&mut self) -> ParseResult<AttributeStmt> {
        let start = self.expect(TokenKind::At)?.span.start;
        let name = self.parse_dashed_name()?;
        let value = if self.got(TokenKind::Assign) {
            match self.kind() {
                TokenKind::String => {
                    let tok = self.next();
                    Some(Expr::BasicLit(BasicLit {
                        kind: LitKind::String,
                        value: self.text(tok).to_string(),
                        span: tok.span,
                    }))
                }
                TokenKind::TemplateHead => {
                    Some(Expr::TemplateLiteral(self.parse_template_literal()?))
                }
                _ => return Err(self.error_expected("string literal")),
            }
        } else {
            None
        };
        let span = self.span_from(start);
        self.got(TokenKind::Semicolon);
        Ok(AttributeStmt { name, value, span })
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    fn parse_expr_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut list = vec![self.parse_expr()?];
        while self.got(TokenKind::Comma) {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary_expr(1)
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let start = self.start();
        let mut x = self.parse_unary_expr()?;
        loop {
            let Some(op) = binary_op(self.kind()) else {
                break;
            };
            if op.precedence() < min_prec || self.ends_expr(&x) {
                break;
            }
            self.next();
            let y = self.parse_binary_expr(op.precedence() + 1)?;
            x = Expr::Binary(BinaryExpr {
                x: Box::new(x),
                op,
                y: Box::new(y),
                span: self.span_from(start),
            });
        }
        Ok(x)
    }

    /// Whether the operator token at the cursor belongs to a tag instead.
    fn ends_expr(&self, x: &Expr) -> bool {
        match self.kind() {
            TokenKind::Gtr => self.in_tag_header,
            TokenKind::Lss => match self.peek(1) {
                TokenKind::Quo => true,
                TokenKind::Ident => matches!(
                    x,
                    Expr::TemplateLiteral(_)
                        | Expr::BasicLit(BasicLit {
                            kind: LitKind::String,
                            ..
                        })
                ),
                _ => false,
            },
            _ => false,
        }
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let op = match self.kind() {
            TokenKind::Add => UnaryOp::Add,
            TokenKind::Sub => UnaryOp::Sub,
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Xor => UnaryOp::Xor,
            TokenKind::And => UnaryOp::And,
            TokenKind::Tilde => UnaryOp::Tilde,
            TokenKind::Arrow => {
                if self.peek(1) == TokenKind::Chan {
                    let ty = self.parse_chan_type()?;
                    return self.parse_primary_suffix(start, ty);
                }
                UnaryOp::Recv
            }
            TokenKind::Mul => {
                self.next();
                let x = self.parse_unary_expr()?;
                return Ok(Expr::Star(StarExpr {
                    x: Box::new(x),
                    span: self.span_from(start),
                }));
            }
            _ => return self.parse_primary_expr(),
        };
        self.next();
        let x = self.parse_unary_expr()?;
        Ok(Expr::Unary(UnaryExpr {
            op,
            x: Box::new(x),
            span: self.span_from(start),
        }))
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let x = self.parse_operand()?;
        self.parse_primary_suffix(start, x)
    }

    fn parse_primary_suffix(&mut self, start: u32, mut x: Expr) -> ParseResult<Expr> {
        loop {
            match self.kind() {
                TokenKind::Period => {
                    self.next();
                    match self.kind() {
                        TokenKind::Ident => {
                            let sel = self.parse_ident()?;
                            x = Expr::Selector(SelectorExpr {
                                x: Box::new(x),
                                sel,
                                span: self.span_from(start),
                            });
                        }
                        TokenKind::LParen => {
                            self.next();
                            let saved = self.enter_nested();
                            let ty = if self.got(TokenKind::Type) {
                                None
                            } else {
                                Some(Box::new(self.parse_type()?))
                            };
                            self.expect(TokenKind::RParen)?;
                            self.leave_nested(saved);
                            x = Expr::TypeAssert(TypeAssertExpr {
                                x: Box::new(x),
                                ty,
                                span: self.span_from(start),
                            });
                        }
                        _ => return Err(self.error_expected("selector or type assertion")),
                    }
                }
                TokenKind::LBrack => x = self.parse_index_or_slice(start, x)?,
                TokenKind::LParen => x = self.parse_call(start, x)?,
                TokenKind::LBrace
                    if is_literal_type(&x) && (self.expr_lev >= 0 || !is_type_name(&x)) =>
                {
                    x = self.parse_composite_lit(start, Some(x))?;
                }
                _ => break,
            }
        }
        Ok(x)
    }

    fn parse_index_or_slice(&mut self, start: u32, x: Expr) -> ParseResult<Expr> {
        self.expect(TokenKind::LBrack)?;
        let saved = self.enter_nested();

        let mut index: [Option<Box<Expr>>; 3] = [None, None, None];
        let mut colons = 0;
        if self.kind() != TokenKind::Colon {
            index[0] = Some(Box::new(self.parse_expr()?));
        }

        if self.kind() == TokenKind::Comma {
            let mut indices: Vec<Expr> = index[0].take().map(|e| *e).into_iter().collect();
            while self.got(TokenKind::Comma) {
                if self.kind() == TokenKind::RBrack {
                    break;
                }
                indices.push(self.parse_type()?);
            }
            self.expect(TokenKind::RBrack)?;
            self.leave_nested(saved);
            return Ok(Expr::Index(IndexExpr {
                x: Box::new(x),
                indices,
                span: self.span_from(start),
            }));
        }

        while self.kind() == TokenKind::Colon && colons < 2 {
            self.next();
            colons += 1;
            if !matches!(self.kind(), TokenKind::Colon | TokenKind::RBrack) {
                index[colons] = Some(Box::new(self.parse_expr()?));
            }
        }
        self.expect(TokenKind::RBrack)?;
        self.leave_nested(saved);

        if colons > 0 {
            let [low, high, max] = index;
            return Ok(Expr::Slice(SliceExpr {
                x: Box::new(x),
                low,
                high,
                max,
                span: self.span_from(start),
            }));
        }

        let [first, _, _] = index;
        let Some(first) = first else {
            return Err(ParseError::new(
                "expected operand",
                self.span_from(start),
                ErrorCode::SyntaxError,
            ));
        };
        Ok(Expr::Index(IndexExpr {
            x: Box::new(x),
            indices: vec![*first],
            span: self.span_from(start),
        }))
    }

    fn parse_call(&mut self, start: u32, fun: Expr) -> ParseResult<Expr> {
        self.expect(TokenKind::LParen)?;
        let saved = self.enter_nested();
        let mut args = Vec::new();
        let mut ellipsis = false;
        while !matches!(self.kind(), TokenKind::RParen | TokenKind::Eof) {
            args.push(self.parse_expr()?);
            if self.got(TokenKind::Ellipsis) {
                ellipsis = true;
            }
            if !self.got(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        self.leave_nested(saved);
        Ok(Expr::Call(CallExpr {
            fun: Box::new(fun),
            args,
            ellipsis,
            span: self.span_from(start),
        }))
    }

    fn parse_composite_lit(&mut self, start: u32, ty: Option<Expr>) -> ParseResult<Expr> {
        self.expect(TokenKind::LBrace)?;
        let saved = self.enter_nested();
        let mut elts = Vec::new();
        while !matches!(self.kind(), TokenKind::RBrace | TokenKind::Eof) {
            let elt_start = self.start();
            let key = self.parse_element()?;
            let elt = if self.got(TokenKind::Colon) {
                let value = self.parse_element()?;
                Expr::KeyValue(KeyValueExpr {
                    key: Box::new(key),
                    value: Box::new(value),
                    span: self.span_from(elt_start),
                })
            } else {
                key
            };
            elts.push(elt);
            if !self.got(TokenKind::Comma) {
                break;
            }
        }
        self.leave_nested(saved);
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::CompositeLit(CompositeLit {
            ty: ty.map(Box::new),
            elts,
            span: self.span_from(start),
        }))
    }

    fn parse_element(&mut self) -> ParseResult<Expr> {
        if self.kind() == TokenKind::LBrace {
            let start = self.start();
            return self.parse_composite_lit(start, None);
        }
        self.parse_expr()
    }

    fn parse_operand(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        match self.kind() {
            TokenKind::Ident => Ok(Expr::Ident(self.parse_ident()?)),
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imag
            | TokenKind::Char
            | TokenKind::String => {
                let tok = self.next();
                let kind = match tok.kind {
                    TokenKind::Int => LitKind::Int,
                    TokenKind::Float => LitKind::Float,
                    TokenKind::Imag => LitKind::Imag,
                    TokenKind::Char => LitKind::Char,
                    _ => LitKind::String,
                };
                Ok(Expr::BasicLit(BasicLit {
                    kind,
                    value: self.text(tok).to_string(),
                    span: tok.span,
                }))
            }
            TokenKind::TemplateHead => Ok(Expr::TemplateLiteral(self.parse_template_literal()?)),
            TokenKind::LParen => {
                self.next();
                let saved = self.enter_nested();
                let x = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                self.leave_nested(saved);
                Ok(Expr::Paren(ParenExpr {
                    x: Box::new(x),
                    span: self.span_from(start),
                }))
            }
            TokenKind::Func => {
                self.next();
                let ty = self.parse_signature(start)?;
                if self.kind() == TokenKind::LBrace {
                    let body = self.parse_func_body()?;
                    Ok(Expr::FuncLit(FuncLit {
                        ty,
                        body,
                        span: self.span_from(start),
                    }))
                } else {
                    Ok(Expr::FuncType(ty))
                }
            }
            TokenKind::LBrack
            | TokenKind::Struct
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Interface => self.parse_type(),
            _ => Err(self.error_expected("expression")),
        }
    }

    fn parse_template_literal(&mut self) -> ParseResult<TemplateLiteral> {
        let head = self.expect(TokenKind::TemplateHead)?;
        let text = self.text(head);
        let mut strings = vec![text.strip_suffix("\\{").unwrap_or(text).to_string()];
        let mut parts = Vec::new();

        let saved = self.enter_nested();
        loop {
            parts.push(self.parse_expr()?);
            let tok = self.tok();
            let text = self.text(tok);
            let text = text.strip_prefix('}').unwrap_or(text);
            match tok.kind {
                TokenKind::TemplateMiddle => {
                    self.next();
                    strings.push(text.strip_suffix("\\{").unwrap_or(text).to_string());
                }
                TokenKind::TemplateTail => {
                    self.next();
                    strings.push(text.to_string());
                    break;
                }
                _ => return Err(self.error_expected("'}'")),
            }
        }
        self.leave_nested(saved);

        Ok(TemplateLiteral {
            strings,
            parts,
            span: self.span_from(head.span.start),
        })
    }
}

fn group_params(entries: Vec<ParamEntry>) -> ParseResult<Vec<Field>> {
    let named = entries.iter().any(|e| matches!(e, ParamEntry::Named(..)));
    if !named {
        return Ok(entries
            .into_iter()
            .map(|e| {
                let (ParamEntry::Unnamed(ty) | ParamEntry::Named(_, ty)) = e;
                let span = ty.span();
                Field {
                    names: Vec::new(),
                    ty,
                    tag: None,
                    span,
                }
            })
            .collect());
    }

    let mut fields = Vec::new();
    let mut pending: Vec<Ident> = Vec::new();
    for entry in entries {
        match entry {
            ParamEntry::Unnamed(Expr::Ident(name)) => pending.push(name),
            ParamEntry::Unnamed(other) => return Err(mixed_params(other.span())),
            ParamEntry::Named(name, ty) => {
                pending.push(name);
                let span = Span::new(pending[0].span.start, ty.span().end);
                fields.push(Field {
                    names: std::mem::take(&mut pending),
                    ty,
                    tag: None,
                    span,
                });
            }
        }
    }
    if let Some(first) = pending.first() {
        return Err(mixed_params(first.span));
    }
    Ok(fields)
}

fn mixed_params(span: Span) -> ParseError {
    ParseError::new(
        "mixed named and unnamed parameters",
        span,
        ErrorCode::SyntaxError,
    )
}

fn starts_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::Mul
            | TokenKind::LBrack
            | TokenKind::LParen
            | TokenKind::Func
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Arrow
            | TokenKind::Struct
            | TokenKind::Interface
    )
}

fn starts_param_type(kind: TokenKind) -> bool {
    starts_type(kind) || matches!(kind, TokenKind::Ellipsis | TokenKind::Tilde)
}

fn starts_expr(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imag
            | TokenKind::Char
            | TokenKind::String
            | TokenKind::TemplateHead
            | TokenKind::Func
            | TokenKind::LParen
            | TokenKind::LBrack
            | TokenKind::Struct
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Interface
            | TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Mul
            | TokenKind::And
            | TokenKind::Xor
            | TokenKind::Arrow
            | TokenKind::Not
            | TokenKind::Tilde
    )
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Assign => AssignOp::Assign,
        TokenKind::Define => AssignOp::Define,
        TokenKind::AddAssign => AssignOp::Compound(BinaryOp::Add),
        TokenKind::SubAssign => AssignOp::Compound(BinaryOp::Sub),
        TokenKind::MulAssign => AssignOp::Compound(BinaryOp::Mul),
        TokenKind::QuoAssign => AssignOp::Compound(BinaryOp::Quo),
        TokenKind::RemAssign => AssignOp::Compound(BinaryOp::Rem),
        TokenKind::AndAssign => AssignOp::Compound(BinaryOp::And),
        TokenKind::OrAssign => AssignOp::Compound(BinaryOp::Or),
        TokenKind::XorAssign => AssignOp::Compound(BinaryOp::Xor),
        TokenKind::ShlAssign => AssignOp::Compound(BinaryOp::Shl),
        TokenKind::ShrAssign => AssignOp::Compound(BinaryOp::Shr),
        TokenKind::AndNotAssign => AssignOp::Compound(BinaryOp::AndNot),
        _ => return None,
    })
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::LOr => BinaryOp::LOr,
        TokenKind::LAnd => BinaryOp::LAnd,
        TokenKind::Eql => BinaryOp::Eql,
        TokenKind::Neq => BinaryOp::Neq,
        TokenKind::Lss => BinaryOp::Lss,
        TokenKind::Leq => BinaryOp::Leq,
        TokenKind::Gtr => BinaryOp::Gtr,
        TokenKind::Geq => BinaryOp::Geq,
        TokenKind::Add => BinaryOp::Add,
        TokenKind::Sub => BinaryOp::Sub,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::Xor => BinaryOp::Xor,
        TokenKind::Mul => BinaryOp::Mul,
        TokenKind::Quo => BinaryOp::Quo,
        TokenKind::Rem => BinaryOp::Rem,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::And => BinaryOp::And,
        TokenKind::AndNot => BinaryOp::AndNot,
        _ => return None,
    })
}

fn is_type_switch_guard(x: &Expr) -> bool {
    matches!(x, Expr::TypeAssert(TypeAssertExpr { ty: None, .. }))
}

fn is_type_name(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) => true,
        Expr::Selector(s) => matches!(*s.x, Expr::Ident(_)),
        _ => false,
    }
}

fn is_literal_type(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) | Expr::ArrayType(_) | Expr::StructType(_) | Expr::MapType(_) => true,
        Expr::Selector(s) => matches!(*s.x, Expr::Ident(_)),
        Expr::Index(i) => is_type_name(&i.x),
        _ => false,
    }
}
