//! Fixture parser for integration tests
//!
//! Covers a small Rust-like surface: functions with parameters, an optional
//! return type, blocks with `let` and expression statements, binary
//! arithmetic, calls, parentheses and literals. The parser never fails:
//! anything unexpected is wrapped in an `Error` node, so every input
//! round-trips through `text()`.

#![allow(dead_code)]

use cst_algo::{GreenNode, SyntaxKind, SyntaxNode, TreeBuilder};

pub fn parse(text: &str) -> GreenNode {
    let mut parser = Parser {
        tokens: lex(text),
        pos: 0,
        builder: TreeBuilder::new(),
    };
    parser.source_file();
    parser
        .builder
        .finish()
        .expect("fixture parser keeps the builder balanced")
}

pub fn parse_root(text: &str) -> SyntaxNode {
    SyntaxNode::new_root(parse(text))
}

pub fn lex(text: &str) -> Vec<(SyntaxKind, &str)> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        let (kind, len) = if c.is_whitespace() {
            let len = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
            (SyntaxKind::Whitespace, len)
        } else if rest.starts_with("//") {
            (SyntaxKind::Comment, rest.find('\n').unwrap_or(rest.len()))
        } else if c.is_alphabetic() || c == '_' {
            let len = rest
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            let kind = SyntaxKind::from_keyword(&rest[..len]).unwrap_or(SyntaxKind::Ident);
            (kind, len)
        } else if c.is_ascii_digit() {
            let len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            (SyntaxKind::IntNumber, len)
        } else if c == '"' {
            match rest[1..].find('"') {
                Some(end) => (SyntaxKind::String, end + 2),
                None => (SyntaxKind::Error, rest.len()),
            }
        } else if rest.starts_with("->") {
            (SyntaxKind::Arrow, 2)
        } else {
            let kind = match c {
                '(' => SyntaxKind::LParen,
                ')' => SyntaxKind::RParen,
                '{' => SyntaxKind::LBrace,
                '}' => SyntaxKind::RBrace,
                ',' => SyntaxKind::Comma,
                ':' => SyntaxKind::Colon,
                ';' => SyntaxKind::Semicolon,
                '=' => SyntaxKind::Eq,
                '+' => SyntaxKind::Plus,
                '-' => SyntaxKind::Minus,
                '*' => SyntaxKind::Star,
                '/' => SyntaxKind::Slash,
                _ => SyntaxKind::Error,
            };
            (kind, c.len_utf8())
        };
        tokens.push((kind, &rest[..len]));
        rest = &rest[len..];
    }
    tokens
}

struct Parser<'t> {
    tokens: Vec<(SyntaxKind, &'t str)>,
    pos: usize,
    builder: TreeBuilder,
}

impl Parser<'_> {
    /// Next non-trivia kind
    fn current(&self) -> Option<SyntaxKind> {
        self.tokens[self.pos..]
            .iter()
            .map(|&(kind, _)| kind)
            .find(|kind| !kind.is_trivia())
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == Some(kind)
    }

    /// Pending trivia goes into the node that is open right now
    fn flush_trivia(&mut self) {
        while let Some(&(kind, text)) = self.tokens.get(self.pos) {
            if !kind.is_trivia() {
                break;
            }
            self.builder.token(kind, text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.flush_trivia();
        if let Some(&(kind, text)) = self.tokens.get(self.pos) {
            self.builder.token(kind, text);
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn start(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind);
    }

    fn finish(&mut self) {
        self.builder.finish_node();
    }

    fn error_token(&mut self) {
        self.start(SyntaxKind::Error);
        self.bump();
        self.finish();
    }

    fn source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SourceFile);
        while let Some(kind) = self.current() {
            if kind == SyntaxKind::FnKw {
                self.fn_def();
            } else {
                self.error_token();
            }
        }
        self.flush_trivia();
        self.finish();
    }

    fn fn_def(&mut self) {
        self.start(SyntaxKind::FnDef);
        self.bump();
        if self.at(SyntaxKind::Ident) {
            self.name();
        }
        if self.at(SyntaxKind::LParen) {
            self.param_list();
        }
        if self.at(SyntaxKind::Arrow) {
            self.start(SyntaxKind::RetType);
            self.bump();
            if self.at(SyntaxKind::Ident) {
                self.path_expr();
            }
            self.finish();
        }
        if self.at(SyntaxKind::LBrace) {
            self.block();
        }
        self.finish();
    }

    fn name(&mut self) {
        self.start(SyntaxKind::Name);
        self.bump();
        self.finish();
    }

    fn param_list(&mut self) {
        self.start(SyntaxKind::ParamList);
        self.bump();
        loop {
            match self.current() {
                None
                | Some(SyntaxKind::RParen)
                | Some(SyntaxKind::LBrace)
                | Some(SyntaxKind::FnKw) => break,
                Some(SyntaxKind::Ident) => self.param(),
                Some(SyntaxKind::Comma) => self.bump(),
                Some(_) => self.error_token(),
            }
        }
        self.expect(SyntaxKind::RParen);
        self.finish();
    }

    fn param(&mut self) {
        self.start(SyntaxKind::Param);
        self.name();
        if self.expect(SyntaxKind::Colon) && self.at(SyntaxKind::Ident) {
            self.path_expr();
        }
        self.finish();
    }

    fn block(&mut self) {
        self.start(SyntaxKind::BlockExpr);
        self.bump();
        loop {
            match self.current() {
                None | Some(SyntaxKind::RBrace) => break,
                Some(SyntaxKind::LetKw) => self.let_stmt(),
                Some(kind) if starts_expr(kind) => {
                    self.flush_trivia();
                    let checkpoint = self.builder.checkpoint();
                    self.expr();
                    if self.at(SyntaxKind::Semicolon) {
                        self.builder.start_node_at(checkpoint, SyntaxKind::ExprStmt);
                        self.bump();
                        self.finish();
                    }
                }
                Some(_) => self.error_token(),
            }
        }
        self.expect(SyntaxKind::RBrace);
        self.finish();
    }

    fn let_stmt(&mut self) {
        self.start(SyntaxKind::LetStmt);
        self.bump();
        if self.at(SyntaxKind::Ident) {
            self.name();
        }
        if self.expect(SyntaxKind::Eq) && self.current().is_some_and(starts_expr) {
            self.expr();
        }
        self.expect(SyntaxKind::Semicolon);
        self.finish();
    }

    fn expr(&mut self) {
        self.expr_bp(1);
    }

    fn expr_bp(&mut self, min_bp: u8) {
        self.flush_trivia();
        let checkpoint = self.builder.checkpoint();
        if !self.primary() {
            return;
        }
        while let Some(op) = self.current() {
            let bp = match op {
                SyntaxKind::Plus | SyntaxKind::Minus => 1,
                SyntaxKind::Star | SyntaxKind::Slash => 2,
                _ => break,
            };
            if bp < min_bp {
                break;
            }
            self.builder.start_node_at(checkpoint, SyntaxKind::BinExpr);
            self.bump();
            self.expr_bp(bp + 1);
            self.finish();
        }
    }

    fn primary(&mut self) -> bool {
        match self.current() {
            Some(
                SyntaxKind::IntNumber
                | SyntaxKind::String
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw,
            ) => {
                self.start(SyntaxKind::Literal);
                self.bump();
                self.finish();
            }
            Some(SyntaxKind::Ident) => {
                self.flush_trivia();
                let checkpoint = self.builder.checkpoint();
                self.path_expr();
                if self.at(SyntaxKind::LParen) {
                    self.builder.start_node_at(checkpoint, SyntaxKind::CallExpr);
                    self.arg_list();
                    self.finish();
                }
            }
            Some(SyntaxKind::LParen) => {
                self.start(SyntaxKind::ParenExpr);
                self.bump();
                if self.current().is_some_and(starts_expr) {
                    self.expr();
                }
                self.expect(SyntaxKind::RParen);
                self.finish();
            }
            Some(SyntaxKind::LBrace) => self.block(),
            _ => return false,
        }
        true
    }

    fn path_expr(&mut self) {
        self.start(SyntaxKind::PathExpr);
        self.bump();
        self.finish();
    }

    fn arg_list(&mut self) {
        self.start(SyntaxKind::ArgList);
        self.bump();
        loop {
            match self.current() {
                None
                | Some(SyntaxKind::RParen)
                | Some(SyntaxKind::RBrace)
                | Some(SyntaxKind::Semicolon) => break,
                Some(SyntaxKind::Comma) => self.bump(),
                Some(kind) if starts_expr(kind) => self.expr(),
                Some(_) => self.error_token(),
            }
        }
        self.expect(SyntaxKind::RParen);
        self.finish();
    }
}

fn starts_expr(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IntNumber
            | SyntaxKind::String
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw
            | SyntaxKind::Ident
            | SyntaxKind::LParen
            | SyntaxKind::LBrace
    )
}
