// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use logos::Logos;
use thiserror::Error;
use vela_ast::token::{Token, TokenKind};
use vela_ast::Span;

/// Token shapes recognized by logos; values and keywords are resolved afterwards.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Shape {
    #[regex(r"==|!=|<=|>=|[-+*/%=<>@.{}()\[\]:;,]")]
    Punct,

    #[regex(r"///[^\n]*", priority = 5)]
    DocComment,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    // Listed before Int so `1.5` stays one token
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    Double,

    #[regex(r"[0-9][0-9_]*")]
    Int,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,
}

/// Stop collecting after this many errors.
const MAX_ERRORS: usize = 20;

/// The lexer for Vela source code.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Tokenize the whole source. Bad input is recorded and skipped so
    /// later errors are still found.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut shapes = Shape::lexer(self.source);

        while let Some(shape) = shapes.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }
            let range = shapes.span();
            let span = Span::new(range.start, range.end);

            let resolved = match shape {
                Ok(shape) => resolve(shape, shapes.slice(), span),
                Err(()) => {
                    let ch = self.source[range.start..].chars().next().unwrap_or('?');
                    Err(LexError::unexpected_char(ch, range.start))
                }
            };
            match resolved {
                Ok(kind) => tokens.push(Token { kind, span }),
                Err(error) => self.errors.push(error),
            }
        }

        let end = self.source.len();
        tokens.push(Token { kind: TokenKind::Eof, span: Span::new(end, end) });

        LexResult { tokens, errors: std::mem::take(&mut self.errors) }
    }
}

fn resolve(shape: Shape, slice: &str, span: Span) -> Result<TokenKind, LexError> {
    match shape {
        Shape::Punct => punctuation(slice).ok_or_else(|| LexError::unexpected_char('?', span.start)),
        Shape::Word => Ok(keyword(slice).unwrap_or_else(|| TokenKind::Ident(slice.to_string()))),
        Shape::DocComment => {
            let body = slice[3..].trim_end_matches('\r');
            Ok(TokenKind::DocComment(body.strip_prefix(' ').unwrap_or(body).to_string()))
        }
        Shape::Int => digits(slice)
            .parse()
            .map(TokenKind::Int)
            .map_err(|_| LexError::invalid_number(span)),
        Shape::Double => digits(slice)
            .parse()
            .map(TokenKind::Double)
            .map_err(|_| LexError::invalid_number(span)),
        Shape::String => parse_string(&slice[1..slice.len() - 1], span.start).map(TokenKind::String),
        Shape::LineComment => unreachable!("comments are skipped"),
    }
}

fn digits(slice: &str) -> String {
    slice.replace('_', "")
}

fn keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "namespace" => TokenKind::Namespace,
        "open" => TokenKind::Open,
        "as" => TokenKind::As,
        "function" => TokenKind::Function,
        "operation" => TokenKind::Operation,
        "newtype" => TokenKind::Newtype,
        "adjoint" => TokenKind::Adjoint,
        "controlled" => TokenKind::Controlled,
        "let" => TokenKind::Let,
        "mutable" => TokenKind::Mutable,
        "set" => TokenKind::Set,
        "return" => TokenKind::Return,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "true" => TokenKind::Bool(true),
        "false" => TokenKind::Bool(false),
        _ => return None,
    })
}

fn punctuation(text: &str) -> Option<TokenKind> {
    Some(match text {
        "==" => TokenKind::EqEq,
        "!=" => TokenKind::BangEq,
        "<=" => TokenKind::LtEq,
        ">=" => TokenKind::GtEq,
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Star,
        "/" => TokenKind::Slash,
        "%" => TokenKind::Percent,
        "=" => TokenKind::Eq,
        "<" => TokenKind::Lt,
        ">" => TokenKind::Gt,
        "@" => TokenKind::At,
        "." => TokenKind::Dot,
        "{" => TokenKind::LBrace,
        "}" => TokenKind::RBrace,
        "(" => TokenKind::LParen,
        ")" => TokenKind::RParen,
        "[" => TokenKind::LBracket,
        "]" => TokenKind::RBracket,
        ":" => TokenKind::Colon,
        ";" => TokenKind::Semi,
        "," => TokenKind::Comma,
        _ => return None,
    })
}

/// Unescape the body of a string literal.
fn parse_string(body: &str, pos: usize) -> Result<String, LexError> {
    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        text.push(match chars.next() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('0') => '\0',
            Some(c @ ('\\' | '"')) => c,
            _ => return Err(LexError::invalid_escape(pos)),
        });
    }

    Ok(text)
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("Unexpected character '{}'", ch),
            hint: if ch == '"' { Some("Add a closing '\"'".to_string()) } else { None },
        }
    }

    fn invalid_escape(pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + 1),
            message: "Invalid escape sequence".to_string(),
            hint: Some("Valid: \\n \\r \\t \\\\ \\0 \\\"".to_string()),
        }
    }

    fn invalid_number(span: Span) -> Self {
        Self {
            span,
            message: "Invalid number".to_string(),
            hint: None,
        }
    }
}
