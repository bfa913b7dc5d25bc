// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parsed namespace blocks, before they are assembled into a program.

use crate::program::{Declaration, DocBlock};
use crate::Span;

/// `open Std.Core;` or `open Std.Core as Core;`
#[derive(Debug, Clone, PartialEq)]
pub struct OpenDirective {
    pub namespace: String,
    pub alias: Option<String>,
    pub span: Span,
}

/// One `namespace X { ... }` block as written in a single source unit.
///
/// Several blocks, possibly in different units, may contribute to the same
/// namespace; `open` directives only apply to the block that contains them.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceBlock {
    pub name: String,
    pub doc: DocBlock,
    pub opens: Vec<OpenDirective>,
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

impl NamespaceBlock {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            doc: DocBlock::default(),
            opens: Vec::new(),
            declarations: Vec::new(),
            span,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.opens.is_empty() && self.declarations.is_empty()
    }
}
