// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.

use vela_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on context.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        ("':'", TokenKind::Eq) => Some("use ':' for types, '=' for values"),
        ("':'", TokenKind::LBrace) => Some("callables declare a return type: `function F() : Unit { ... }`"),
        ("':'", _) => Some("syntax: name : Type"),

        ("'{'", _) => Some("blocks start with '{'"),
        ("'{' or ';'", _) => Some("write a body in '{ }' or end a header with ';'"),
        ("'}'", TokenKind::Eof) => Some("every '{' needs a matching '}'"),
        ("'}'", _) => None,

        ("'('", _) => Some("attributes and callables need parentheses, even when empty"),
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", TokenKind::Semi) => Some("add ')' before ';'"),
        ("')'", _) => None,

        ("']'", TokenKind::Eof) => Some("add ']' to close the bracket"),
        ("']'", _) => None,

        ("';'", TokenKind::RBrace) => Some("statements end with ';'"),
        ("';'", _) => Some("end statements and headers with ';'"),

        ("'='", TokenKind::Colon) => Some("bindings are written `let name = value;`"),

        ("expression", TokenKind::Semi) => Some("statement is incomplete"),
        ("expression", TokenKind::Eq) => Some("put the value after '='"),
        ("expression", _) => Some("try a value, variable, or call"),

        ("a name", TokenKind::Int(_)) => Some("names can't start with a number"),
        ("a name", _) => Some("names start with a letter or '_'"),

        ("a string", _) => Some("expected a quoted string like \"Simulator\""),

        ("type", _) => Some("try a type like 'Int', 'Bool', '(Int, Double)' or 'Int[]'"),

        ("declaration", TokenKind::Let | TokenKind::Mutable | TokenKind::Set) => {
            Some("statements belong inside a callable body")
        }
        ("declaration", _) => Some("start with 'function', 'operation', 'newtype', 'open' or '@'"),

        _ => None,
    }
}
