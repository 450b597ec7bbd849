//! Scanner for tgo source text.
//!
//! Produces the full token stream of a file up front, including the
//! semicolons Go inserts automatically at line ends. Comments are collected
//! on the side.

use crate::ast::Comment;
use crate::error::{ParseError, ParseResult};
use source_map::Span;

/// Kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,

    Ident,
    Int,
    Float,
    Imag,
    Char,
    String,
    /// `"text \{`
    TemplateHead,
    /// `} text \{`
    TemplateMiddle,
    /// `} text"`
    TemplateTail,

    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
    AddAssign,
    SubAssign,
    MulAssign,
    QuoAssign,
    RemAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    LAnd,
    LOr,
    Arrow,
    Inc,
    Dec,
    Eql,
    Lss,
    Gtr,
    Assign,
    Not,
    Neq,
    Leq,
    Geq,
    Define,
    Ellipsis,
    LParen,
    LBrack,
    LBrace,
    Comma,
    Period,
    RParen,
    RBrack,
    RBrace,
    Semicolon,
    Colon,
    Tilde,
    At,

    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

impl TokenKind {
    /// Look up a keyword.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        Some(match ident {
            "break" => TokenKind::Break,
            "case" => TokenKind::Case,
            "chan" => TokenKind::Chan,
            "const" => TokenKind::Const,
            "continue" => TokenKind::Continue,
            "default" => TokenKind::Default,
            "defer" => TokenKind::Defer,
            "else" => TokenKind::Else,
            "fallthrough" => TokenKind::Fallthrough,
            "for" => TokenKind::For,
            "func" => TokenKind::Func,
            "go" => TokenKind::Go,
            "goto" => TokenKind::Goto,
            "if" => TokenKind::If,
            "import" => TokenKind::Import,
            "interface" => TokenKind::Interface,
            "map" => TokenKind::Map,
            "package" => TokenKind::Package,
            "range" => TokenKind::Range,
            "return" => TokenKind::Return,
            "select" => TokenKind::Select,
            "struct" => TokenKind::Struct,
            "switch" => TokenKind::Switch,
            "type" => TokenKind::Type,
            "var" => TokenKind::Var,
            _ => return None,
        })
    }

    /// Whether a newline directly after this token ends the statement.
    fn inserts_semicolon(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Imag
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::TemplateTail
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Fallthrough
                | TokenKind::Return
                | TokenKind::Inc
                | TokenKind::Dec
                | TokenKind::RParen
                | TokenKind::RBrack
                | TokenKind::RBrace
        )
    }

    /// Human readable description used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "identifier",
            TokenKind::Int | TokenKind::Float | TokenKind::Imag | TokenKind::Char => "literal",
            TokenKind::String => "string literal",
            TokenKind::TemplateHead | TokenKind::TemplateMiddle | TokenKind::TemplateTail => {
                "template literal"
            }
            TokenKind::Add => "'+'",
            TokenKind::Sub => "'-'",
            TokenKind::Mul => "'*'",
            TokenKind::Quo => "'/'",
            TokenKind::Rem => "'%'",
            TokenKind::And => "'&'",
            TokenKind::Or => "'|'",
            TokenKind::Xor => "'^'",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::AndNot => "'&^'",
            TokenKind::AddAssign => "'+='",
            TokenKind::SubAssign => "'-='",
            TokenKind::MulAssign => "'*='",
            TokenKind::QuoAssign => "'/='",
            TokenKind::RemAssign => "'%='",
            TokenKind::AndAssign => "'&='",
            TokenKind::OrAssign => "'|='",
            TokenKind::XorAssign => "'^='",
            TokenKind::ShlAssign => "'<<='",
            TokenKind::ShrAssign => "'>>='",
            TokenKind::AndNotAssign => "'&^='",
            TokenKind::LAnd => "'&&'",
            TokenKind::LOr => "'||'",
            TokenKind::Arrow => "'<-'",
            TokenKind::Inc => "'++'",
            TokenKind::Dec => "'--'",
            TokenKind::Eql => "'=='",
            TokenKind::Lss => "'<'",
            TokenKind::Gtr => "'>'",
            TokenKind::Assign => "'='",
            TokenKind::Not => "'!'",
            TokenKind::Neq => "'!='",
            TokenKind::Leq => "'<='",
            TokenKind::Geq => "'>='",
            TokenKind::Define => "':='",
            TokenKind::Ellipsis => "'...'",
            TokenKind::LParen => "'('",
            TokenKind::LBrack => "'['",
            TokenKind::LBrace => "'{'",
            TokenKind::Comma => "','",
            TokenKind::Period => "'.'",
            TokenKind::RParen => "')'",
            TokenKind::RBrack => "']'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Tilde => "'~'",
            TokenKind::At => "'@'",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Chan => "chan",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Default => "default",
            TokenKind::Defer => "defer",
            TokenKind::Else => "else",
            TokenKind::Fallthrough => "fallthrough",
            TokenKind::For => "for",
            TokenKind::Func => "func",
            TokenKind::Go => "go",
            TokenKind::Goto => "goto",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::Interface => "interface",
            TokenKind::Map => "map",
            TokenKind::Package => "package",
            TokenKind::Range => "range",
            TokenKind::Return => "return",
            TokenKind::Select => "select",
            TokenKind::Struct => "struct",
            TokenKind::Switch => "switch",
            TokenKind::Type => "type",
            TokenKind::Var => "var",
        }
    }
}

/// A token with its source range. Automatically inserted semicolons have
/// an empty span placed at the newline that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Whether this semicolon was inserted at a line end.
    pub fn is_auto_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon && self.span.is_empty()
    }
}

/// Output of [`Scanner::scan`].
#[derive(Debug, Clone, Default)]
pub struct Scanned {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}

enum StringEnd {
    Quote,
    Interpolation,
}

/// A scanner over tgo source.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    insert_semi: bool,
    /// Brace nesting inside each template literal interpolation being
    /// scanned, innermost last.
    templates: Vec<u32>,
    out: Scanned,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            insert_semi: false,
            templates: Vec::new(),
            out: Scanned::default(),
        }
    }

    fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    fn consume_while<F>(&mut self, pred: F)
    where
        F: Fn(char) -> bool,
    {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.out.tokens.push(Token {
            kind,
            span: self.span_from(start),
        });
        self.insert_semi = kind.inserts_semicolon();
    }

    fn push_auto_semicolon(&mut self, at: usize) {
        self.out.tokens.push(Token {
            kind: TokenKind::Semicolon,
            span: Span::empty(at as u32),
        });
        self.insert_semi = false;
    }

    /// Scan the whole source.
    pub fn scan(mut self) -> ParseResult<Scanned> {
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(c) = self.peek_char() else {
                if !self.templates.is_empty() {
                    return Err(ParseError::unterminated(
                        "template literal",
                        Span::empty(start as u32),
                    ));
                }
                if self.insert_semi {
                    self.push_auto_semicolon(start);
                }
                self.push(TokenKind::Eof, start);
                return Ok(self.out);
            };

            if self.starts_with("//") || self.starts_with("/*") {
                self.scan_comment()?;
                continue;
            }

            if is_ident_start(c) {
                self.consume_while(is_ident_continue);
                let text = &self.source[start..self.pos];
                let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Ident);
                self.push(kind, start);
                continue;
            }

            if c.is_ascii_digit() || (c == '.' && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())) {
                let kind = self.scan_number();
                self.push(kind, start);
                continue;
            }

            match c {
                '"' => {
                    self.pos += 1;
                    let kind = match self.scan_string_body(start)? {
                        StringEnd::Quote => TokenKind::String,
                        StringEnd::Interpolation => {
                            self.templates.push(0);
                            TokenKind::TemplateHead
                        }
                    };
                    self.push(kind, start);
                }
                '`' => {
                    self.pos += 1;
                    match self.remaining().find('`') {
                        Some(n) => self.pos += n + 1,
                        None => {
                            return Err(ParseError::unterminated(
                                "raw string literal",
                                self.span_from(start),
                            ))
                        }
                    }
                    self.push(TokenKind::String, start);
                }
                '\'' => {
                    self.scan_rune(start)?;
                    self.push(TokenKind::Char, start);
                }
                '{' => {
                    if let Some(depth) = self.templates.last_mut() {
                        *depth += 1;
                    }
                    self.pos += 1;
                    self.push(TokenKind::LBrace, start);
                }
                '}' => {
                    self.pos += 1;
                    match self.templates.last_mut() {
                        Some(0) => {
                            self.templates.pop();
                            let kind = match self.scan_string_body(start)? {
                                StringEnd::Quote => TokenKind::TemplateTail,
                                StringEnd::Interpolation => {
                                    self.templates.push(0);
                                    TokenKind::TemplateMiddle
                                }
                            };
                            self.push(kind, start);
                        }
                        Some(depth) => {
                            *depth -= 1;
                            self.push(TokenKind::RBrace, start);
                        }
                        None => self.push(TokenKind::RBrace, start),
                    }
                }
                ';' => {
                    self.pos += 1;
                    self.push(TokenKind::Semicolon, start);
                }
                _ => {
                    let kind = self.scan_operator(c)?;
                    self.push(kind, start);
                }
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            match c {
                ' ' | '\t' | '\r' => self.pos += 1,
                '\n' => {
                    if self.insert_semi {
                        self.push_auto_semicolon(self.pos);
                    }
                    self.pos += 1;
                }
                _ => break,
            }
        }
    }

    fn scan_comment(&mut self) -> ParseResult<()> {
        let start = self.pos;
        let multiline = if self.starts_with("//") {
            self.consume_while(|c| c != '\n');
            false
        } else {
            match self.remaining()[2..].find("*/") {
                Some(n) => self.pos += 2 + n + 2,
                None => {
                    return Err(ParseError::unterminated(
                        "comment",
                        Span::new(start as u32, self.source.len() as u32),
                    ))
                }
            }
            self.source[start..self.pos].contains('\n')
        };

        // A comment running to the end of the line ends the statement just
        // like the newline would.
        let line_comment = self.source[start..].starts_with("//");
        if self.insert_semi && (line_comment || multiline) {
            self.push_auto_semicolon(start);
        }

        self.out.comments.push(Comment {
            text: self.source[start..self.pos].to_string(),
            span: self.span_from(start),
        });
        Ok(())
    }

    fn scan_number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Int;
        let prefix = if self.starts_with("0x") || self.starts_with("0X") {
            16
        } else if self.starts_with("0b") || self.starts_with("0B") {
            2
        } else if self.starts_with("0o") || self.starts_with("0O") {
            8
        } else {
            10
        };

        if prefix != 10 {
            self.pos += 2;
        }
        let digits = |c: char| c == '_' || c.is_ascii_hexdigit();
        let decimal = |c: char| c == '_' || c.is_ascii_digit();

        if prefix == 16 {
            self.consume_while(digits);
            if self.peek_char() == Some('.') {
                kind = TokenKind::Float;
                self.pos += 1;
                self.consume_while(digits);
            }
            if matches!(self.peek_char(), Some('p' | 'P')) {
                kind = TokenKind::Float;
                self.scan_exponent();
            }
        } else if prefix != 10 {
            self.consume_while(decimal);
        } else {
            self.consume_while(decimal);
            if self.peek_char() == Some('.') && self.peek_nth(1) != Some('.') {
                kind = TokenKind::Float;
                self.pos += 1;
                self.consume_while(decimal);
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                kind = TokenKind::Float;
                self.scan_exponent();
            }
        }

        if self.peek_char() == Some('i') {
            self.pos += 1;
            kind = TokenKind::Imag;
        }
        kind
    }

    fn scan_exponent(&mut self) {
        self.pos += 1;
        if matches!(self.peek_char(), Some('+' | '-')) {
            self.pos += 1;
        }
        self.consume_while(|c| c == '_' || c.is_ascii_digit());
    }

    /// Scan an interpreted string up to its closing quote or the next
    /// `\{`, both consumed.
    fn scan_string_body(&mut self, start: usize) -> ParseResult<StringEnd> {
        loop {
            match self.next_char() {
                Some('"') => return Ok(StringEnd::Quote),
                Some('\\') => {
                    if self.peek_char() == Some('{') {
                        self.pos += 1;
                        return Ok(StringEnd::Interpolation);
                    }
                    self.scan_escape('"')?;
                }
                Some('\n') | None => {
                    return Err(ParseError::unterminated(
                        "string literal",
                        self.span_from(start),
                    ))
                }
                Some(_) => {}
            }
        }
    }

    fn scan_rune(&mut self, start: usize) -> ParseResult<()> {
        self.pos += 1;
        let mut n = 0;
        loop {
            match self.next_char() {
                Some('\'') => break,
                Some('\\') => {
                    self.scan_escape('\'')?;
                    n += 1;
                }
                Some('\n') | None => {
                    return Err(ParseError::unterminated(
                        "rune literal",
                        self.span_from(start),
                    ))
                }
                Some(_) => n += 1,
            }
        }
        if n != 1 {
            return Err(ParseError::new(
                "illegal rune literal",
                self.span_from(start),
                crate::error::ErrorCode::SyntaxError,
            ));
        }
        Ok(())
    }

    /// Validate an escape sequence, the backslash already consumed.
    fn scan_escape(&mut self, quote: char) -> ParseResult<()> {
        let start = self.pos - 1;
        let (count, radix) = match self.next_char() {
            Some('a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\') => return Ok(()),
            Some(c) if c == quote => return Ok(()),
            Some('0'..='7') => (2, 8),
            Some('x') => (2, 16),
            Some('u') => (4, 16),
            Some('U') => (8, 16),
            _ => return Err(ParseError::invalid_escape(self.span_from(start))),
        };
        for _ in 0..count {
            match self.peek_char() {
                Some(c) if c.is_digit(radix) => self.pos += 1,
                _ => return Err(ParseError::invalid_escape(self.span_from(start))),
            }
        }
        Ok(())
    }

    fn scan_operator(&mut self, c: char) -> ParseResult<TokenKind> {
        const OPERATORS: &[(&str, TokenKind)] = &[
            ("...", TokenKind::Ellipsis),
            ("<<=", TokenKind::ShlAssign),
            (">>=", TokenKind::ShrAssign),
            ("&^=", TokenKind::AndNotAssign),
            ("&&", TokenKind::LAnd),
            ("||", TokenKind::LOr),
            ("<-", TokenKind::Arrow),
            ("++", TokenKind::Inc),
            ("--", TokenKind::Dec),
            ("==", TokenKind::Eql),
            ("!=", TokenKind::Neq),
            ("<=", TokenKind::Leq),
            (">=", TokenKind::Geq),
            (":=", TokenKind::Define),
            ("<<", TokenKind::Shl),
            (">>", TokenKind::Shr),
            ("&^", TokenKind::AndNot),
            ("+=", TokenKind::AddAssign),
            ("-=", TokenKind::SubAssign),
            ("*=", TokenKind::MulAssign),
            ("/=", TokenKind::QuoAssign),
            ("%=", TokenKind::RemAssign),
            ("&=", TokenKind::AndAssign),
            ("|=", TokenKind::OrAssign),
            ("^=", TokenKind::XorAssign),
            ("+", TokenKind::Add),
            ("-", TokenKind::Sub),
            ("*", TokenKind::Mul),
            ("/", TokenKind::Quo),
            ("%", TokenKind::Rem),
            ("&", TokenKind::And),
            ("|", TokenKind::Or),
            ("^", TokenKind::Xor),
            ("<", TokenKind::Lss),
            (">", TokenKind::Gtr),
            ("=", TokenKind::Assign),
            ("!", TokenKind::Not),
            ("(", TokenKind::LParen),
            ("[", TokenKind::LBrack),
            (",", TokenKind::Comma),
            (".", TokenKind::Period),
            (")", TokenKind::RParen),
            ("]", TokenKind::RBrack),
            (":", TokenKind::Colon),
            ("~", TokenKind::Tilde),
            ("@", TokenKind::At),
        ];

        for (text, kind) in OPERATORS {
            if self.starts_with(text) {
                self.pos += text.len();
                return Ok(*kind);
            }
        }
        let start = self.pos;
        self.pos += c.len_utf8();
        Err(ParseError::invalid_character(c, self.span_from(start)))
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Tokenize `source`.
pub fn tokenize(source: &str) -> ParseResult<Scanned> {
    Scanner::new(source).scan()
}

/// Decode a string literal as written in source, interpreted or raw.
pub fn unquote(lit: &str) -> Option<String> {
    if let Some(raw) = lit.strip_prefix('`') {
        return Some(raw.strip_suffix('`')?.replace('\r', ""));
    }
    unescape(lit.strip_prefix('"')?.strip_suffix('"')?)
}

/// Decode the body of an interpreted string literal, quotes excluded.
///
/// Returns `None` for malformed escapes, for `\{` and when the decoded
/// bytes are not valid UTF-8.
pub fn unescape(body: &str) -> Option<String> {
    if !body.contains('\\') {
        return Some(body.to_string());
    }

    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let simple = match chars.next()? {
            'a' => 0x07,
            'b' => 0x08,
            'f' => 0x0c,
            'n' => b'\n',
            'r' => b'\r',
            't' => b'\t',
            'v' => 0x0b,
            '\\' => b'\\',
            '"' => b'"',
            '\'' => b'\'',
            d @ '0'..='7' => {
                let mut v = d.to_digit(8)?;
                for _ in 0..2 {
                    v = v * 8 + chars.next()?.to_digit(8)?;
                }
                u8::try_from(v).ok()?
            }
            'x' => {
                let mut v = 0;
                for _ in 0..2 {
                    v = v * 16 + chars.next()?.to_digit(16)?;
                }
                v as u8
            }
            e @ ('u' | 'U') => {
                let n = if e == 'u' { 4 } else { 8 };
                let mut v = 0u32;
                for _ in 0..n {
                    v = v * 16 + chars.next()?.to_digit(16)?;
                }
                let mut buf = [0u8; 4];
                out.extend_from_slice(char::from_u32(v)?.encode_utf8(&mut buf).as_bytes());
                continue;
            }
            _ => return None,
        };
        out.push(simple);
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .tokens
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_semicolon_insertion() {
        use TokenKind::*;
        assert_eq!(
            kinds("a := b\nreturn\n"),
            vec![Ident, Define, Ident, Semicolon, Return, Semicolon, Eof]
        );
        assert_eq!(kinds("a +\nb"), vec![Ident, Add, Ident, Semicolon, Eof]);
    }

    #[test]
    fn test_auto_semicolon_span() {
        let scanned = tokenize("x\ny").unwrap();
        assert!(scanned.tokens[1].is_auto_semicolon());
        assert_eq!(scanned.tokens[1].span, Span::empty(1));
    }

    #[test]
    fn test_tags_and_attributes() {
        use TokenKind::*;
        assert_eq!(
            kinds(r#"<div @class="a">"hi"</div>"#),
            vec![Lss, Ident, At, Ident, Assign, String, Gtr, String, Lss, Quo, Ident, Gtr, Eof]
        );
    }

    #[test]
    fn test_template_literal_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds(r#""a \{x} b \{f(map[string]int{})} c""#),
            vec![
                TemplateHead,
                Ident,
                TemplateMiddle,
                Ident,
                LParen,
                Map,
                LBrack,
                Ident,
                RBrack,
                Ident,
                LBrace,
                RBrace,
                RParen,
                TemplateTail,
                Semicolon,
                Eof
            ]
        );
    }

    #[test]
    fn test_nested_template_literal() {
        use TokenKind::*;
        assert_eq!(
            kinds(r#""\{"\{a}"}""#),
            vec![TemplateHead, TemplateHead, Ident, TemplateTail, TemplateTail, Semicolon, Eof]
        );
    }

    #[test]
    fn test_comments_collected() {
        let scanned = tokenize("a // one\n/* two */ b").unwrap();
        let texts: Vec<_> = scanned.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["// one", "/* two */"]);
        assert_eq!(scanned.comments[1].span, Span::new(9, 18));
        // The line comment ends the statement.
        assert_eq!(scanned.tokens[1].kind, TokenKind::Semicolon);
        assert_eq!(scanned.tokens[1].span, Span::empty(2));
    }

    #[test]
    fn test_numbers() {
        use TokenKind::*;
        assert_eq!(
            kinds("1 1.5 .5 1e9 0x1F 0b1_0 0o7 2i 0x1p-2"),
            vec![Int, Float, Float, Float, Int, Int, Int, Imag, Float, Semicolon, Eof]
        );
    }

    #[test]
    fn test_errors() {
        let err = tokenize("\"abc").unwrap_err();
        assert_eq!(err.message, "string literal not terminated");
        let err = tokenize("/* abc").unwrap_err();
        assert_eq!(err.message, "comment not terminated");
        let err = tokenize(r#""\q""#).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidEscape);
        let err = tokenize("a $ b").unwrap_err();
        assert_eq!(err.message, "invalid character '$'");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""a\tb\"c""#).as_deref(), Some("a\tb\"c"));
        assert_eq!(unquote("`raw\\n`").as_deref(), Some("raw\\n"));
        assert_eq!(unquote(r#""é\x41\101""#).as_deref(), Some("éAA"));
        assert_eq!(unescape(r"\{"), None);
        assert_eq!(unescape(r"\xff"), None);
    }
}
