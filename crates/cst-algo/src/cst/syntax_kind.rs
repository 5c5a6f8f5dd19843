//! Syntax kind enumeration for the CST
//!
//! Every token and node carries one of these tags. The set covers a small
//! Rust-like surface (functions, blocks, `let` statements, calls and binary
//! expressions) which is enough for lookup, diff and edit to be exercised on
//! realistic trees.

use std::fmt;

/// Syntax kind for tree elements
///
/// Values are grouped by range:
/// - Trivia (0-9)
/// - Keywords (10-99)
/// - Punctuation (100-149)
/// - Literals and identifiers (150-199)
/// - Structural nodes (200-399)
/// - Special kinds (400+)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // ==================
    // Trivia (0-9)
    // ==================
    /// Spaces, tabs and newlines
    Whitespace = 0,
    /// Line comment starting with //
    Comment = 1,

    // ==================
    // Keywords (10-99)
    // ==================
    FnKw = 10,
    LetKw = 11,
    ReturnKw = 12,
    TrueKw = 13,
    FalseKw = 14,

    // ==================
    // Punctuation (100-149)
    // ==================
    LParen = 100,
    RParen = 101,
    LBrace = 102,
    RBrace = 103,
    Comma = 104,
    Colon = 105,
    Semicolon = 106,
    Eq = 107,
    Plus = 108,
    Minus = 109,
    Star = 110,
    Slash = 111,
    Arrow = 112,

    // ==================
    // Literals & Identifiers (150-199)
    // ==================
    Ident = 150,
    IntNumber = 151,
    String = 152,

    // ==================
    // Structure nodes (200-399)
    // ==================
    SourceFile = 200,
    FnDef = 201,
    Name = 210,
    NameRef = 211,
    ParamList = 220,
    Param = 221,
    RetType = 222,
    BlockExpr = 230,
    LetStmt = 231,
    ExprStmt = 232,
    BinExpr = 240,
    Literal = 241,
    PathExpr = 242,
    CallExpr = 243,
    ArgList = 244,
    ParenExpr = 245,

    // ==================
    // Special kinds (400+)
    // ==================
    /// Node wrapping input the parser could not make sense of
    Error = 400,
}

impl SyntaxKind {
    /// Check if this is a trivia kind (whitespace, comments)
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    /// Check if this is a keyword
    pub const fn is_keyword(self) -> bool {
        (self as u16) >= 10 && (self as u16) < 100
    }

    /// Check if this is punctuation
    pub const fn is_punct(self) -> bool {
        (self as u16) >= 100 && (self as u16) < 150
    }

    /// Check if this is a literal
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::IntNumber | Self::String | Self::TrueKw | Self::FalseKw
        )
    }

    /// Check if this is a structural node
    pub const fn is_node(self) -> bool {
        ((self as u16) >= 200 && (self as u16) < 400) || matches!(self, Self::Error)
    }

    /// Check if this is a token kind
    pub const fn is_token(self) -> bool {
        !self.is_node()
    }

    /// Get the fixed text of keyword and punctuation tokens
    pub const fn static_text(self) -> Option<&'static str> {
        match self {
            Self::FnKw => Some("fn"),
            Self::LetKw => Some("let"),
            Self::ReturnKw => Some("return"),
            Self::TrueKw => Some("true"),
            Self::FalseKw => Some("false"),
            Self::LParen => Some("("),
            Self::RParen => Some(")"),
            Self::LBrace => Some("{"),
            Self::RBrace => Some("}"),
            Self::Comma => Some(","),
            Self::Colon => Some(":"),
            Self::Semicolon => Some(";"),
            Self::Eq => Some("="),
            Self::Plus => Some("+"),
            Self::Minus => Some("-"),
            Self::Star => Some("*"),
            Self::Slash => Some("/"),
            Self::Arrow => Some("->"),
            _ => None,
        }
    }

    /// Look up the keyword spelled by `text`
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "fn" => Self::FnKw,
            "let" => Self::LetKw,
            "return" => Self::ReturnKw,
            "true" => Self::TrueKw,
            "false" => Self::FalseKw,
            _ => return None,
        };
        Some(kind)
    }

    /// Convert to the raw numeric tag
    pub const fn to_raw(self) -> u16 {
        self as u16
    }

    /// Convert from the raw numeric tag
    pub fn from_raw(raw: u16) -> Option<SyntaxKind> {
        let kind = match raw {
            // Trivia
            0 => Self::Whitespace,
            1 => Self::Comment,

            // Keywords
            10 => Self::FnKw,
            11 => Self::LetKw,
            12 => Self::ReturnKw,
            13 => Self::TrueKw,
            14 => Self::FalseKw,

            // Punctuation
            100 => Self::LParen,
            101 => Self::RParen,
            102 => Self::LBrace,
            103 => Self::RBrace,
            104 => Self::Comma,
            105 => Self::Colon,
            106 => Self::Semicolon,
            107 => Self::Eq,
            108 => Self::Plus,
            109 => Self::Minus,
            110 => Self::Star,
            111 => Self::Slash,
            112 => Self::Arrow,

            // Literals & identifiers
            150 => Self::Ident,
            151 => Self::IntNumber,
            152 => Self::String,

            // Structure nodes
            200 => Self::SourceFile,
            201 => Self::FnDef,
            210 => Self::Name,
            211 => Self::NameRef,
            220 => Self::ParamList,
            221 => Self::Param,
            222 => Self::RetType,
            230 => Self::BlockExpr,
            231 => Self::LetStmt,
            232 => Self::ExprStmt,
            240 => Self::BinExpr,
            241 => Self::Literal,
            242 => Self::PathExpr,
            243 => Self::CallExpr,
            244 => Self::ArgList,
            245 => Self::ParenExpr,

            // Special
            400 => Self::Error,

            _ => return None,
        };
        Some(kind)
    }

    /// Check whether `text` lexes as exactly one token of this kind
    ///
    /// Only kinds whose extent is decided by their own characters answer
    /// `true` for anything; the rest depend on surrounding context.
    pub fn accepts_text(self, text: &str) -> bool {
        match self {
            Self::Whitespace => !text.is_empty() && text.chars().all(char::is_whitespace),
            Self::Comment => text.starts_with("//") && !text.contains('\n'),
            Self::Ident => {
                let mut chars = text.chars();
                let starts_well = chars
                    .next()
                    .is_some_and(|c| c == '_' || c.is_alphabetic());
                starts_well
                    && chars.all(|c| c == '_' || c.is_alphanumeric())
                    && Self::from_keyword(text).is_none()
            }
            Self::IntNumber => !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()),
            Self::String => {
                text.len() >= 2
                    && text.starts_with('"')
                    && text.ends_with('"')
                    && !text[1..text.len() - 1].contains('"')
            }
            _ => false,
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
