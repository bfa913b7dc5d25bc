// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Name visibility: what a namespace block can see, and local bindings
//! inside callable bodies.

use std::collections::HashMap;

use vela_ast::file::NamespaceBlock;
use vela_ast::{Declaration, Program, QualifiedName, Span};

/// Visible in every block without an `open`.
pub const CORE_NAMESPACE: &str = "Std.Core";

/// Global names a namespace block can refer to.
///
/// Undotted names are looked up in the block's namespace, then in opened
/// namespaces, then `Std.Core`, then the global namespace. Dotted names use
/// an `open` alias or a full namespace name as prefix.
pub struct BlockScope<'p, 'b> {
    program: &'p Program,
    namespace: &'b str,
    opens: Vec<(&'b str, Option<&'b str>)>,
}

impl<'p, 'b> BlockScope<'p, 'b> {
    /// Opens of namespaces missing from `program` are ignored.
    pub fn new(program: &'p Program, block: &'b NamespaceBlock) -> Self {
        let opens = block
            .opens
            .iter()
            .filter(|open| program.contains_namespace(&open.namespace))
            .map(|open| (open.namespace.as_str(), open.alias.as_deref()))
            .collect();
        Self { program, namespace: &block.name, opens }
    }

    pub fn resolve(&self, path: &str) -> Option<&'p Declaration> {
        let program = self.program;
        match path.rsplit_once('.') {
            None => {
                let opened = self.opens.iter().filter(|(_, alias)| alias.is_none()).map(|(ns, _)| *ns);
                std::iter::once(self.namespace)
                    .chain(opened)
                    .chain([CORE_NAMESPACE, ""])
                    .find_map(|ns| program.namespace(ns)?.find(path))
            }
            Some((prefix, name)) => self
                .opens
                .iter()
                .find(|(_, alias)| *alias == Some(prefix))
                .and_then(|(ns, _)| program.namespace(ns)?.find(name))
                .or_else(|| program.namespace(prefix)?.find(name)),
        }
    }

    /// Full name of the `newtype` an attribute refers to.
    pub fn resolve_attribute(&self, written: &QualifiedName) -> Option<&'p QualifiedName> {
        match self.resolve(&written.to_string())? {
            Declaration::Type(t) => Some(&t.name),
            _ => None,
        }
    }
}

/// A local name introduced by a parameter, `let`, `mutable` or `for`.
#[derive(Debug, Clone)]
pub struct Binding {
    pub mutable: bool,
    pub span: Span,
    pub used: bool,
    /// Only `let`/`mutable` bindings are reported when unused.
    pub report_unused: bool,
}

/// Stack of block scopes; lookups walk from the innermost outwards.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<HashMap<String, Binding>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: vec![HashMap::new()] }
    }

    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost scope and return the bindings nobody read.
    pub fn pop(&mut self) -> Vec<(String, Span)> {
        let Some(scope) = self.scopes.pop() else {
            return Vec::new();
        };
        let mut unused: Vec<(String, Span)> = scope
            .into_iter()
            .filter(|(name, b)| b.report_unused && !b.used && !name.starts_with('_'))
            .map(|(name, b)| (name, b.span))
            .collect();
        unused.sort_by_key(|(_, span)| span.start);
        unused
    }

    pub fn define(&mut self, name: impl Into<String>, binding: Binding) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), binding);
        }
    }

    /// Find a binding and mark it as read.
    pub fn use_binding(&mut self, name: &str) -> Option<&Binding> {
        let binding = self.scopes.iter_mut().rev().find_map(|s| s.get_mut(name))?;
        binding.used = true;
        Some(binding)
    }
}
