// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Double(f64),
    String(String),
    Bool(bool),

    // Identifier
    Ident(String),

    /// A `///` line, with the marker and one following space removed.
    DocComment(String),

    // Keywords
    Namespace,
    Open,
    As,
    Function,
    Operation,
    Newtype,
    Adjoint,
    Controlled,
    Let,
    Mutable,
    Set,
    Return,
    If,
    Else,
    For,
    In,
    And,
    Or,
    Not,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    At,
    Dot,

    // Delimiters
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Colon,
    Semi,
    Comma,

    Eof,
}

impl TokenKind {
    /// Human-readable name used in error messages.
    pub fn display_name(&self) -> String {
        match self {
            TokenKind::Int(v) => format!("number `{}`", v),
            TokenKind::Double(v) => format!("number `{}`", v),
            TokenKind::String(_) => "string".to_string(),
            TokenKind::Bool(b) => format!("`{}`", b),
            TokenKind::Ident(name) => format!("`{}`", name),
            TokenKind::DocComment(_) => "doc comment".to_string(),
            TokenKind::Namespace => "`namespace`".to_string(),
            TokenKind::Open => "`open`".to_string(),
            TokenKind::As => "`as`".to_string(),
            TokenKind::Function => "`function`".to_string(),
            TokenKind::Operation => "`operation`".to_string(),
            TokenKind::Newtype => "`newtype`".to_string(),
            TokenKind::Adjoint => "`adjoint`".to_string(),
            TokenKind::Controlled => "`controlled`".to_string(),
            TokenKind::Let => "`let`".to_string(),
            TokenKind::Mutable => "`mutable`".to_string(),
            TokenKind::Set => "`set`".to_string(),
            TokenKind::Return => "`return`".to_string(),
            TokenKind::If => "`if`".to_string(),
            TokenKind::Else => "`else`".to_string(),
            TokenKind::For => "`for`".to_string(),
            TokenKind::In => "`in`".to_string(),
            TokenKind::And => "`and`".to_string(),
            TokenKind::Or => "`or`".to_string(),
            TokenKind::Not => "`not`".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Percent => "'%'".to_string(),
            TokenKind::Eq => "'='".to_string(),
            TokenKind::EqEq => "'=='".to_string(),
            TokenKind::BangEq => "'!='".to_string(),
            TokenKind::Lt => "'<'".to_string(),
            TokenKind::Gt => "'>'".to_string(),
            TokenKind::LtEq => "'<='".to_string(),
            TokenKind::GtEq => "'>='".to_string(),
            TokenKind::At => "'@'".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Semi => "';'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}
