// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from front-end error types to `Diagnostic`.
//!
//! Engine-level errors implement `ToDiagnostic` in their own crate.

use vela_ast::Span;

use crate::{Diagnostic, ToDiagnostic};

fn front_end(code: &str, message: &str, span: Span, label: &str, hint: Option<&str>) -> Diagnostic {
    let diag = Diagnostic::error(message).with_code(code).with_primary(span, label);
    match hint {
        Some(hint) => diag.with_help(hint),
        None => diag,
    }
}

impl ToDiagnostic for vela_lexer::LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        front_end("E0001", &self.message, self.span, "not valid here", self.hint.as_deref())
    }
}

impl ToDiagnostic for vela_parser::ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        front_end("E0100", &self.message, self.span, "here", self.hint.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ast::SourceId;

    #[test]
    fn lex_error_becomes_e0001() {
        let result = vela_lexer::Lexer::new("let x = #;").tokenize();
        let diag = result.errors[0].to_diagnostic();
        assert_eq!(diag.code_str(), Some("E0001"));
        assert!(diag.is_error());
        assert!(diag.primary_span().is_some());
    }

    #[test]
    fn parse_error_keeps_hint() {
        let tokens = vela_lexer::Lexer::new("namespace A { function F() : Unit { F(; } }").tokenize().tokens;
        let result = vela_parser::Parser::new(tokens, SourceId::primary("a.vl")).parse();
        let diag = result.errors[0].to_diagnostic();
        assert_eq!(diag.code_str(), Some("E0100"));
        assert!(diag.help.is_some());
    }
}
