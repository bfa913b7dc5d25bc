// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Recursive-descent parser for Vela files; expressions use binding powers.

use std::fmt;

use vela_ast::expr::{BinOp, Expr, ExprKind, UnaryOp};
use vela_ast::file::{NamespaceBlock, OpenDirective};
use vela_ast::stmt::{Stmt, StmtKind};
use vela_ast::token::{Token, TokenKind};
use vela_ast::ty::TypeExpr;
use vela_ast::{
    Attribute, CallableDecl, CallableKind, Declaration, DocBlock, Param, QualifiedName, Signature,
    SourceId, Span, SpecializationDecl, SpecializationKind, TypeDecl,
};

/// Parsing gives up after this many errors.
const MAX_ERRORS: usize = 20;

/// Binding power of prefix `-` and `not`.
const PREFIX_BP: u8 = 13;
/// Binding power of calls and indexing.
const POSTFIX_BP: u8 = 15;

/// The parser for Vela source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Unit every parsed declaration is attributed to
    source: SourceId,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>, source: SourceId) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token { kind: TokenKind::Eof, span: Span::new(end, end) });
        }
        Self { tokens, pos: 0, source, errors: Vec::new() }
    }

    /// Keep `error`; false once the error budget is spent.
    fn record_error(&mut self, error: ParseError) -> bool {
        if self.errors.len() >= MAX_ERRORS {
            return false;
        }
        self.errors.push(error);
        self.errors.len() < MAX_ERRORS
    }

    /// Skip to the next item after an error.
    ///
    /// Always moves past `from`, the position where the failed item started.
    fn synchronize(&mut self, from: usize) {
        let mut brace_depth = 0usize;

        while !self.at_end() {
            match self.peek() {
                TokenKind::LBrace => {
                    brace_depth += 1;
                    self.advance();
                }
                TokenKind::RBrace => {
                    if brace_depth == 0 {
                        break;
                    }
                    brace_depth -= 1;
                    self.advance();
                    if brace_depth == 0 {
                        break;
                    }
                }
                TokenKind::Namespace
                | TokenKind::Open
                | TokenKind::Function
                | TokenKind::Operation
                | TokenKind::Newtype
                | TokenKind::Adjoint
                | TokenKind::Controlled
                | TokenKind::At
                | TokenKind::DocComment(_)
                    if brace_depth == 0 && self.pos > from =>
                {
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }

        if self.pos == from {
            self.advance();
        }
    }

    /// Skip to the next statement inside a block.
    fn synchronize_in_block(&mut self, from: usize) {
        while !self.at_end() {
            match self.peek() {
                TokenKind::RBrace => break,
                TokenKind::Semi => {
                    self.advance();
                    return;
                }
                TokenKind::Let
                | TokenKind::Mutable
                | TokenKind::Set
                | TokenKind::Return
                | TokenKind::If
                | TokenKind::For
                    if self.pos > from =>
                {
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn span(&self) -> Span {
        self.current().span
    }

    /// Start offset of the next token.
    fn offset(&self) -> usize {
        self.span().start
    }

    fn at_end(&self) -> bool {
        *self.peek() == TokenKind::Eof
    }

    /// Consume the current token. `Eof` is never consumed.
    fn advance(&mut self) -> &Token {
        let here = self.pos.min(self.tokens.len() - 1);
        if here + 1 < self.tokens.len() {
            self.pos = here + 1;
        }
        &self.tokens[here]
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        self.pos.checked_sub(1).map_or_else(|| self.offset(), |i| self.tokens[i].span.end)
    }

    /// Same variant as `kind`, ignoring any payload.
    fn at(&self, kind: TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(&kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        let found = self.at(kind);
        if found {
            self.advance();
        }
        found
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token, ParseError> {
        if !self.at(kind.clone()) {
            let wanted = kind.display_name().replace('`', "'");
            return Err(ParseError::expected(&wanted, self.peek(), self.span()));
        }
        Ok(self.advance())
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = self.peek() {
            let name = name.clone();
            self.advance();
            return Ok(name);
        }
        Err(ParseError::expected("a name", self.peek(), self.span()))
    }

    /// `A.B.C` as a single dotted string.
    fn expect_qualified(&mut self) -> Result<String, ParseError> {
        let mut path = self.expect_ident()?;
        while self.at(TokenKind::Dot) {
            self.advance();
            path.push('.');
            path.push_str(&self.expect_ident()?);
        }
        Ok(path)
    }

    fn parse_docs(&mut self) -> DocBlock {
        let mut lines = Vec::new();
        while let TokenKind::DocComment(text) = self.peek() {
            lines.push(text.clone());
            self.advance();
        }
        DocBlock::new(lines)
    }


    /// Parse a whole file into namespace blocks.
    ///
    /// Items outside any `namespace` go into a leading block with an empty
    /// name, which is only kept when it has content.
    pub fn parse(&mut self) -> ParseResult {
        let mut global = NamespaceBlock::new("", Span::new(0, 0));
        let mut blocks = Vec::new();

        while !self.at_end() {
            let from = self.pos;
            let doc = self.parse_docs();
            if self.at_end() {
                break;
            }

            let result = if self.at(TokenKind::Namespace) {
                self.parse_namespace(doc).map(|block| blocks.push(block))
            } else {
                self.parse_item(&mut global, doc)
            };

            if let Err(e) = result {
                if !self.record_error(e) {
                    break;
                }
                self.synchronize(from);
            }
        }

        if !global.is_empty() {
            global.span = Span::new(0, self.span().end);
            blocks.insert(0, global);
        }

        ParseResult {
            blocks,
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn parse_namespace(&mut self, doc: DocBlock) -> Result<NamespaceBlock, ParseError> {
        let start = self.offset();
        self.expect(TokenKind::Namespace)?;
        let name = self.expect_qualified()?;
        self.expect(TokenKind::LBrace)?;

        let mut block = NamespaceBlock::new(name, Span::new(start, start));
        block.doc = doc;

        while !self.at(TokenKind::RBrace) && !self.at_end() {
            let from = self.pos;
            let doc = self.parse_docs();
            if self.at(TokenKind::RBrace) || self.at_end() {
                break;
            }
            if let Err(e) = self.parse_item(&mut block, doc) {
                if !self.record_error(e) {
                    return Ok(block);
                }
                self.synchronize(from);
            }
        }

        self.expect(TokenKind::RBrace)
            .map_err(|e| e.with_hint(format!("namespace `{}` is never closed", block.name)))?;
        block.span = Span::new(start, self.prev_end());
        Ok(block)
    }

    fn parse_item(&mut self, block: &mut NamespaceBlock, doc: DocBlock) -> Result<(), ParseError> {
        match self.peek() {
            TokenKind::Open => {
                let open = self.parse_open()?;
                block.opens.push(open);
                Ok(())
            }
            TokenKind::Namespace => Err(ParseError {
                span: self.span(),
                message: "Namespaces cannot be nested".to_string(),
                hint: Some("close the enclosing namespace first".to_string()),
            }),
            TokenKind::Adjoint | TokenKind::Controlled => {
                let decl = self.parse_specialization(&block.name, doc)?;
                block.declarations.push(Declaration::Specialization(decl));
                Ok(())
            }
            TokenKind::At | TokenKind::Newtype | TokenKind::Function | TokenKind::Operation => {
                let mut doc = doc;
                let mut attributes = Vec::new();
                while self.at(TokenKind::At) {
                    attributes.push(self.parse_attribute()?);
                    // Docs written between attributes still describe the item
                    doc.lines.extend(self.parse_docs().lines);
                }

                let decl = match self.peek() {
                    TokenKind::Newtype => Declaration::Type(self.parse_newtype(&block.name, doc, attributes)?),
                    TokenKind::Function | TokenKind::Operation => {
                        Declaration::Callable(self.parse_callable(&block.name, doc, attributes)?)
                    }
                    _ => {
                        return Err(ParseError::expected("declaration", self.peek(), self.span())
                            .with_hint("attributes must be followed by a declaration"))
                    }
                };
                block.declarations.push(decl);
                Ok(())
            }
            _ => Err(ParseError::expected("declaration", self.peek(), self.span())),
        }
    }

    fn parse_open(&mut self) -> Result<OpenDirective, ParseError> {
        let start = self.offset();
        self.expect(TokenKind::Open)?;
        let namespace = self.expect_qualified()?;
        let alias = if self.eat(TokenKind::As) {
            Some(self.expect_qualified()?)
        } else {
            None
        };
        self.expect(TokenKind::Semi)?;
        Ok(OpenDirective { namespace, alias, span: Span::new(start, self.prev_end()) })
    }

    fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        let start = self.offset();
        self.expect(TokenKind::At)?;
        let name = self.expect_qualified()?;
        self.expect(TokenKind::LParen)?;
        let argument = match self.peek().clone() {
            TokenKind::String(s) => {
                self.advance();
                Some(s)
            }
            TokenKind::RParen => None,
            _ => return Err(ParseError::expected("a string", self.peek(), self.span())),
        };
        self.expect(TokenKind::RParen)?;
        Ok(Attribute {
            name: QualifiedName::from_path(&name),
            argument,
            span: Span::new(start, self.prev_end()),
        })
    }

    fn parse_newtype(
        &mut self,
        namespace: &str,
        doc: DocBlock,
        attributes: Vec<Attribute>,
    ) -> Result<TypeDecl, ParseError> {
        let start = self.offset();
        self.expect(TokenKind::Newtype)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Eq)?;
        let underlying = self.parse_type()?;
        self.expect(TokenKind::Semi)?;
        Ok(TypeDecl {
            name: QualifiedName::new(namespace, name),
            underlying,
            attributes,
            doc,
            source: self.source.clone(),
            span: Span::new(start, self.prev_end()),
        })
    }

    fn parse_callable(
        &mut self,
        namespace: &str,
        doc: DocBlock,
        attributes: Vec<Attribute>,
    ) -> Result<CallableDecl, ParseError> {
        let start = self.offset();
        let kind = match self.advance().kind {
            TokenKind::Operation => CallableKind::Operation,
            _ => CallableKind::Function,
        };
        let name = self.expect_ident()?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.at(TokenKind::RParen) && !self.at_end() {
            let param_start = self.offset();
            let param_name = self.expect_ident()?;
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            params.push(Param { name: param_name, ty, span: Span::new(param_start, self.prev_end()) });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Colon)?;
        let ret = self.parse_type()?;

        let body = self.parse_body_or_header()?;
        Ok(CallableDecl {
            name: QualifiedName::new(namespace, name),
            kind,
            signature: Signature { params, ret },
            attributes,
            body,
            doc,
            source: self.source.clone(),
            span: Span::new(start, self.prev_end()),
        })
    }

    fn parse_specialization(&mut self, namespace: &str, doc: DocBlock) -> Result<SpecializationDecl, ParseError> {
        let start = self.offset();
        let kind = match self.advance().kind {
            TokenKind::Adjoint => SpecializationKind::Adjoint,
            _ => SpecializationKind::Controlled,
        };
        let target = self.expect_qualified()?;
        let parent = if target.contains('.') {
            QualifiedName::from_path(&target)
        } else {
            QualifiedName::new(namespace, target)
        };
        let body = self.parse_body_or_header()?;
        Ok(SpecializationDecl {
            parent,
            kind,
            body,
            doc,
            source: self.source.clone(),
            span: Span::new(start, self.prev_end()),
        })
    }

    /// `{ ... }` or `;` for a body-less header.
    fn parse_body_or_header(&mut self) -> Result<Option<Vec<Stmt>>, ParseError> {
        if self.eat(TokenKind::Semi) {
            return Ok(None);
        }
        if !self.at(TokenKind::LBrace) {
            return Err(ParseError::expected("'{' or ';'", self.peek(), self.span()));
        }
        Ok(Some(self.parse_block()?))
    }


    fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let mut ty = match self.peek() {
            TokenKind::Ident(_) => {
                let name = self.expect_qualified()?;
                TypeExpr::builtin(&name).unwrap_or(TypeExpr::Named(name))
            }
            TokenKind::LParen => {
                self.advance();
                let mut items = Vec::new();
                while !self.at(TokenKind::RParen) && !self.at_end() {
                    items.push(self.parse_type()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RParen)?;
                match items.len() {
                    0 => TypeExpr::Unit,
                    1 => items.remove(0),
                    _ => TypeExpr::Tuple(items),
                }
            }
            _ => return Err(ParseError::expected("type", self.peek(), self.span())),
        };

        while self.at(TokenKind::LBracket) {
            self.advance();
            self.expect(TokenKind::RBracket)?;
            ty = TypeExpr::Array(Box::new(ty));
        }
        Ok(ty)
    }


    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();

        loop {
            // Doc comments inside bodies are plain comments
            while matches!(self.peek(), TokenKind::DocComment(_)) {
                self.advance();
            }
            if self.at(TokenKind::RBrace) || self.at_end() {
                break;
            }

            let from = self.pos;
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    if !self.record_error(e) {
                        self.pos = self.tokens.len() - 1;
                        return Ok(stmts);
                    }
                    self.synchronize_in_block(from);
                }
            }
        }

        self.expect(TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.offset();

        let kind = match self.peek() {
            TokenKind::Let | TokenKind::Mutable => {
                let mutable = matches!(self.advance().kind, TokenKind::Mutable);
                let name = self.expect_ident()?;
                self.expect(TokenKind::Eq)?;
                let init = self.parse_expr()?;
                self.expect(TokenKind::Semi)?;
                StmtKind::Let { name, mutable, init }
            }
            TokenKind::Set => {
                self.advance();
                let name = self.expect_ident()?;
                self.expect(TokenKind::Eq)?;
                let value = self.parse_expr()?;
                self.expect(TokenKind::Semi)?;
                StmtKind::Set { name, value }
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.at(TokenKind::Semi) { None } else { Some(self.parse_expr()?) };
                self.expect(TokenKind::Semi)?;
                StmtKind::Return(value)
            }
            TokenKind::If => return self.parse_if(),
            TokenKind::For => {
                self.advance();
                let binding = self.expect_ident()?;
                self.expect(TokenKind::In)?;
                let iter = self.parse_expr()?;
                let body = self.parse_block()?;
                StmtKind::For { binding, iter, body }
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semi)?;
                StmtKind::Expr(expr)
            }
        };

        Ok(Stmt { kind, span: Span::new(start, self.prev_end()) })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let start = self.offset();
        self.expect(TokenKind::If)?;
        let cond = self.parse_expr()?;
        let then_branch = self.parse_block()?;
        let else_branch = if self.eat(TokenKind::Else) {
            if self.at(TokenKind::If) {
                Some(vec![self.parse_if()?])
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        Ok(Stmt {
            kind: StmtKind::If { cond, then_branch, else_branch },
            span: Span::new(start, self.prev_end()),
        })
    }


    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let start = self.offset();
        let mut lhs = self.parse_prefix()?;

        loop {
            if matches!(self.peek(), TokenKind::LParen | TokenKind::LBracket) {
                if POSTFIX_BP < min_bp {
                    break;
                }
                lhs = self.parse_postfix(lhs, start)?;
                continue;
            }

            let Some((op, l_bp, r_bp)) = self.infix_bp() else { break };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr_bp(r_bp)?;
            let end = rhs.span.end;
            lhs = Expr {
                kind: ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) },
                span: Span::new(start, end),
            };
        }

        Ok(lhs)
    }

    fn infix_bp(&self) -> Option<(BinOp, u8, u8)> {
        Some(match self.peek() {
            TokenKind::Or => (BinOp::Or, 1, 2),
            TokenKind::And => (BinOp::And, 3, 4),
            TokenKind::EqEq => (BinOp::Eq, 5, 6),
            TokenKind::BangEq => (BinOp::Ne, 5, 6),
            TokenKind::Lt => (BinOp::Lt, 7, 8),
            TokenKind::LtEq => (BinOp::Le, 7, 8),
            TokenKind::Gt => (BinOp::Gt, 7, 8),
            TokenKind::GtEq => (BinOp::Ge, 7, 8),
            TokenKind::Plus => (BinOp::Add, 9, 10),
            TokenKind::Minus => (BinOp::Sub, 9, 10),
            TokenKind::Star => (BinOp::Mul, 11, 12),
            TokenKind::Slash => (BinOp::Div, 11, 12),
            TokenKind::Percent => (BinOp::Mod, 11, 12),
            _ => return None,
        })
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let start = self.offset();

        let kind = match self.peek().clone() {
            TokenKind::Int(v) => {
                self.advance();
                ExprKind::Int(v)
            }
            TokenKind::Double(v) => {
                self.advance();
                ExprKind::Double(v)
            }
            TokenKind::String(s) => {
                self.advance();
                ExprKind::String(s)
            }
            TokenKind::Bool(b) => {
                self.advance();
                ExprKind::Bool(b)
            }
            TokenKind::Ident(_) => ExprKind::Path(self.expect_qualified()?),
            TokenKind::Minus | TokenKind::Not => {
                let op = if matches!(self.advance().kind, TokenKind::Minus) { UnaryOp::Neg } else { UnaryOp::Not };
                let operand = self.parse_expr_bp(PREFIX_BP)?;
                ExprKind::Unary { op, operand: Box::new(operand) }
            }
            TokenKind::LParen => {
                self.advance();
                if self.eat(TokenKind::RParen) {
                    ExprKind::Tuple(Vec::new())
                } else {
                    let first = self.parse_expr()?;
                    if self.at(TokenKind::Comma) {
                        let mut items = vec![first];
                        while self.eat(TokenKind::Comma) {
                            if self.at(TokenKind::RParen) {
                                break;
                            }
                            items.push(self.parse_expr()?);
                        }
                        self.expect(TokenKind::RParen)?;
                        ExprKind::Tuple(items)
                    } else {
                        self.expect(TokenKind::RParen)?;
                        return Ok(Expr { kind: first.kind, span: Span::new(start, self.prev_end()) });
                    }
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let items = self.parse_expr_list(TokenKind::RBracket)?;
                self.expect(TokenKind::RBracket)?;
                ExprKind::Array(items)
            }
            _ => return Err(ParseError::expected("expression", self.peek(), self.span())),
        };

        Ok(Expr { kind, span: Span::new(start, self.prev_end()) })
    }

    fn parse_postfix(&mut self, lhs: Expr, start: usize) -> Result<Expr, ParseError> {
        let kind = if self.eat(TokenKind::LParen) {
            let args = self.parse_expr_list(TokenKind::RParen)?;
            self.expect(TokenKind::RParen)?;
            ExprKind::Call { callee: Box::new(lhs), args }
        } else {
            self.expect(TokenKind::LBracket)?;
            let index = self.parse_expr()?;
            self.expect(TokenKind::RBracket)?;
            ExprKind::Index { target: Box::new(lhs), index: Box::new(index) }
        };
        Ok(Expr { kind, span: Span::new(start, self.prev_end()) })
    }

    /// Comma-separated expressions up to (not including) `close`.
    fn parse_expr_list(&mut self, close: TokenKind) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        while !self.at(close.clone()) && !self.at_end() {
            items.push(self.parse_expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(items)
    }
}

/// Result of parsing: namespace blocks plus any errors.
#[derive(Debug)]
pub struct ParseResult {
    pub blocks: Vec<NamespaceBlock>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { span, message, hint }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        if self.hint.is_none() {
            self.hint = Some(hint.into());
        }
        self
    }
}

/// "Expected X, found Y", or an unclosed-delimiter message at end of input.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    let found_name = found.display_name();
    let at_eof = matches!(found, TokenKind::Eof);
    let opener = match expected {
        "'}'" => Some('{'),
        "')'" => Some('('),
        "']'" => Some('['),
        _ => None,
    };

    match (expected, opener) {
        (_, Some(open)) if at_eof => format!("Unclosed '{}' - missing {}", open, expected),
        ("'{'", _) => format!("Expected '{{' to start block, found {}", found_name),
        ("'}'", _) => format!("Expected '}}' to close block, found {}", found_name),
        ("a name", _) => format!("Expected name, found {}", found_name),
        _ => format!("Expected {}, found {}", expected, found_name),
    }
}
