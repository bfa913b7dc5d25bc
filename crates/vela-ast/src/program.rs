// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The program model: namespaces of declarations.
//!
//! A [`Program`] is a value. Passes take `&Program` and return a new one;
//! nothing here mutates a program that someone else holds.

use std::fmt;

use crate::stmt::Stmt;
use crate::ty::TypeExpr;
use crate::{SourceId, Span};

/// A fully qualified declaration name.
///
/// The namespace is empty for declarations in the global namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub namespace: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), name: name.into() }
    }

    /// Split a dotted path at its last dot: `A.B.C` → (`A.B`, `C`).
    pub fn from_path(path: &str) -> Self {
        match path.rsplit_once('.') {
            Some((ns, name)) => Self::new(ns, name),
            None => Self::new("", path),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// Raw documentation lines attached to a declaration or namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocBlock {
    pub lines: Vec<String>,
}

impl DocBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DocBlock {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { lines: iter.into_iter().map(Into::into).collect() }
    }
}

/// `@Name("argument")` metadata on a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualifiedName,
    pub argument: Option<String>,
    pub span: Span,
}

impl Attribute {
    pub fn new(name: QualifiedName, argument: Option<String>) -> Self {
        Self { name, argument, span: Span::DUMMY }
    }

    /// Same attribute name and argument, regardless of where it was written.
    pub fn matches(&self, other: &Attribute) -> bool {
        self.name == other.name && self.argument == other.argument
    }
}

/// A callable parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
    pub span: Span,
}

/// Parameter list and return type of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<Param>,
    pub ret: TypeExpr,
}

impl Signature {
    /// True when the callable is invoked with the unit value, i.e. takes no input.
    pub fn takes_unit(&self) -> bool {
        self.params.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    Function,
    Operation,
}

impl fmt::Display for CallableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallableKind::Function => write!(f, "function"),
            CallableKind::Operation => write!(f, "operation"),
        }
    }
}

/// A function or operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableDecl {
    pub name: QualifiedName,
    pub kind: CallableKind,
    pub signature: Signature,
    pub attributes: Vec<Attribute>,
    /// `None` for body-less headers (intrinsics and reference projections).
    pub body: Option<Vec<Stmt>>,
    pub doc: DocBlock,
    pub source: SourceId,
    pub span: Span,
}

/// `newtype Name = Underlying;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: QualifiedName,
    pub underlying: TypeExpr,
    pub attributes: Vec<Attribute>,
    pub doc: DocBlock,
    pub source: SourceId,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecializationKind {
    Adjoint,
    Controlled,
}

impl fmt::Display for SpecializationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecializationKind::Adjoint => write!(f, "adjoint"),
            SpecializationKind::Controlled => write!(f, "controlled"),
        }
    }
}

/// An explicit `adjoint`/`controlled` implementation of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecializationDecl {
    /// The operation being specialized.
    pub parent: QualifiedName,
    pub kind: SpecializationKind,
    pub body: Option<Vec<Stmt>>,
    pub doc: DocBlock,
    pub source: SourceId,
    pub span: Span,
}

/// A namespace element.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Type(TypeDecl),
    Callable(CallableDecl),
    Specialization(SpecializationDecl),
}

impl Declaration {
    /// The declared name; for specializations, the name of the specialized operation.
    pub fn name(&self) -> &QualifiedName {
        match self {
            Declaration::Type(t) => &t.name,
            Declaration::Callable(c) => &c.name,
            Declaration::Specialization(s) => &s.parent,
        }
    }

    pub fn source(&self) -> &SourceId {
        match self {
            Declaration::Type(t) => &t.source,
            Declaration::Callable(c) => &c.source,
            Declaration::Specialization(s) => &s.source,
        }
    }

    pub fn doc(&self) -> &DocBlock {
        match self {
            Declaration::Type(t) => &t.doc,
            Declaration::Callable(c) => &c.doc,
            Declaration::Specialization(s) => &s.doc,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Declaration::Type(t) => t.span,
            Declaration::Callable(c) => c.span,
            Declaration::Specialization(s) => s.span,
        }
    }

    /// Specializations share their parent's name and never clash with it.
    pub fn defines_name(&self) -> bool {
        !matches!(self, Declaration::Specialization(_))
    }

    /// Attributes written on a type or callable; specializations have none.
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Declaration::Type(t) => &t.attributes,
            Declaration::Callable(c) => &c.attributes,
            Declaration::Specialization(_) => &[],
        }
    }

    pub fn attributes_mut(&mut self) -> &mut [Attribute] {
        match self {
            Declaration::Type(t) => &mut t.attributes,
            Declaration::Callable(c) => &mut c.attributes,
            Declaration::Specialization(_) => &mut [],
        }
    }

    pub fn as_callable(&self) -> Option<&CallableDecl> {
        match self {
            Declaration::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// The declaration without any implementation, tagged with `source`.
    pub fn into_header(self, source: SourceId) -> Declaration {
        match self {
            Declaration::Type(t) => Declaration::Type(TypeDecl { source, ..t }),
            Declaration::Callable(c) => Declaration::Callable(CallableDecl { source, body: None, ..c }),
            Declaration::Specialization(s) => {
                Declaration::Specialization(SpecializationDecl { source, body: None, ..s })
            }
        }
    }
}

/// A named collection of declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub name: String,
    pub declarations: Vec<Declaration>,
    pub doc: DocBlock,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), declarations: Vec::new(), doc: DocBlock::default() }
    }

    pub fn with_declarations(mut self, declarations: Vec<Declaration>) -> Self {
        self.declarations = declarations;
        self
    }

    /// The namespace holding declarations written outside any `namespace` block.
    pub fn is_global(&self) -> bool {
        self.name.is_empty()
    }

    /// Look up a type or callable by its short name.
    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|d| d.defines_name() && d.name().name == name)
    }

    pub fn callables(&self) -> impl Iterator<Item = &CallableDecl> {
        self.declarations.iter().filter_map(Declaration::as_callable)
    }
}

/// A compiled program: namespaces plus declared entry points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub namespaces: Vec<Namespace>,
    pub entry_points: Vec<QualifiedName>,
}

impl Program {
    pub fn new(namespaces: Vec<Namespace>, entry_points: Vec<QualifiedName>) -> Self {
        Self { namespaces, entry_points }
    }

    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    pub fn contains_namespace(&self, name: &str) -> bool {
        self.namespace(name).is_some()
    }

    /// Resolve a fully qualified name to its type or callable declaration.
    pub fn lookup(&self, name: &QualifiedName) -> Option<&Declaration> {
        self.namespace(&name.namespace)?.find(&name.name)
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.namespaces.iter().flat_map(|ns| ns.declarations.iter())
    }

    pub fn callables(&self) -> impl Iterator<Item = &CallableDecl> {
        self.namespaces.iter().flat_map(Namespace::callables)
    }
}
