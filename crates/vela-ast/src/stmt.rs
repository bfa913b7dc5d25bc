// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement AST nodes.

use crate::expr::Expr;
use crate::Span;

/// A statement in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Expression statement
    Expr(Expr),
    /// `let x = e;` or `mutable x = e;`
    Let {
        name: String,
        mutable: bool,
        init: Expr,
    },
    /// `set x = e;`
    Set {
        name: String,
        value: Expr,
    },
    /// Return statement
    Return(Option<Expr>),
    /// `if cond { .. } else { .. }`; `else if` nests as a single-statement else branch
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    /// For-in loop
    For {
        binding: String,
        iter: Expr,
        body: Vec<Stmt>,
    },
}
