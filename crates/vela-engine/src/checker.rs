// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Name resolution and semantic checks on compiled declarations.
//!
//! Reference headers are trusted: only declarations compiled from source
//! units are checked, but they may use anything the program contains.

use std::collections::HashMap;

use thiserror::Error;
use vela_ast::expr::{Expr, ExprKind};
use vela_ast::file::NamespaceBlock;
use vela_ast::stmt::{Stmt, StmtKind};
use vela_ast::ty::TypeExpr;
use vela_ast::{
    Attribute, CallableDecl, CallableKind, Declaration, Param, Program, SourceId, Span, SpecializationDecl,
    SpecializationKind,
};
use vela_diagnostics::{Diagnostic, ToDiagnostic};

use crate::scope::{Binding, BlockScope, ScopeStack};

/// A problem found while checking a compiled declaration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct CheckError {
    pub kind: CheckErrorKind,
    pub span: Span,
    /// The unit the span points into.
    pub unit: SourceId,
}

/// The kind of check failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckErrorKind {
    #[error("unresolved identifier `{name}`")]
    Unresolved { name: String },

    #[error("`{name}` is defined more than once in namespace `{namespace}`")]
    Duplicate {
        name: String,
        namespace: String,
        /// Earlier definition, when it lives in the same unit.
        previous: Option<Span>,
    },

    #[error("cannot specialize `{parent}`: no such operation")]
    UnknownSpecializationTarget { parent: String },

    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    #[error("unknown attribute `{name}`")]
    UnknownAttribute { name: String },

    #[error("unknown namespace `{namespace}`")]
    UnknownNamespace { namespace: String },

    #[error("`{callee}` expects {expected} argument{}, found {found}", if *expected == 1 { "" } else { "s" })]
    ArityMismatch { callee: String, expected: usize, found: usize },

    #[error("cannot assign to immutable binding `{name}`")]
    ImmutableAssignment { name: String, declared: Span },

    #[error("function `{name}` cannot have a `{kind}` specialization")]
    FunctionSpecialization { name: String, kind: SpecializationKind },

    #[error("unused binding `{name}`")]
    UnusedBinding { name: String },
}

impl CheckErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            CheckErrorKind::Unresolved { .. } => "E0200",
            CheckErrorKind::Duplicate { .. } => "E0201",
            CheckErrorKind::UnknownSpecializationTarget { .. } => "E0202",
            CheckErrorKind::UnknownType { .. } | CheckErrorKind::UnknownAttribute { .. } => "E0203",
            CheckErrorKind::UnknownNamespace { .. } => "E0207",
            CheckErrorKind::ArityMismatch { .. } => "E0300",
            CheckErrorKind::ImmutableAssignment { .. } => "E0301",
            CheckErrorKind::FunctionSpecialization { .. } => "E0302",
            CheckErrorKind::UnusedBinding { .. } => "W0001",
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, CheckErrorKind::UnusedBinding { .. })
    }
}

impl ToDiagnostic for CheckError {
    fn to_diagnostic(&self) -> Diagnostic {
        use CheckErrorKind::*;

        let message = self.kind.to_string();
        let diag = match &self.kind {
            Unresolved { name } => Diagnostic::error(message)
                .with_primary(self.span, "not found in this scope")
                .with_help(if name.contains('.') {
                    "check the namespace name or its `open ... as` alias"
                } else {
                    "check the spelling or add an `open` directive"
                }),

            Duplicate { previous, .. } => {
                let diag = Diagnostic::error(message).with_primary(self.span, "redefined here");
                match previous {
                    Some(prev) => diag.with_secondary(*prev, "previously defined here"),
                    None => diag.with_note("the earlier definition comes from another unit"),
                }
            }

            UnknownSpecializationTarget { .. } => Diagnostic::error(message)
                .with_primary(self.span, "specialization declared here")
                .with_help("declare the operation in this namespace or qualify its name"),

            UnknownType { .. } => Diagnostic::error(message)
                .with_primary(self.span, "type used here")
                .with_help("declare it with `newtype` or open the namespace that does"),

            UnknownAttribute { .. } => Diagnostic::error(message)
                .with_primary(self.span, "attribute used here")
                .with_help("attributes name a `newtype` such as `Std.Diagnostics.Test`; check the `open` directives"),

            UnknownNamespace { .. } => Diagnostic::error(message)
                .with_primary(self.span, "no such namespace in this program or its references"),

            ArityMismatch { expected, .. } => Diagnostic::error(message)
                .with_primary(self.span, format!("expected {}", expected)),

            ImmutableAssignment { declared, .. } => Diagnostic::error(message)
                .with_primary(self.span, "assigned here")
                .with_secondary(*declared, "bound with `let`")
                .with_help("declare it with `mutable` to allow `set`"),

            FunctionSpecialization { .. } => Diagnostic::error(message)
                .with_primary(self.span, "specialization declared here")
                .with_help("only operations have adjoint or controlled specializations"),

            UnusedBinding { name } => Diagnostic::warning(message)
                .with_primary(self.span, "never read")
                .with_help(format!("prefix it with an underscore: `_{}`", name)),
        };

        diag.with_code(self.kind.code()).with_source(self.unit.clone())
    }
}

/// Checks compiled blocks against an assembled program.
pub(crate) struct Checker<'a> {
    program: &'a Program,
    errors: Vec<CheckError>,
}

struct BlockContext<'p, 'b> {
    source: &'b SourceId,
    scope: BlockScope<'p, 'b>,
}

impl<'a> Checker<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self { program, errors: Vec::new() }
    }

    pub fn finish(self) -> Vec<CheckError> {
        self.errors
    }

    fn report(&mut self, source: &SourceId, kind: CheckErrorKind, span: Span) {
        self.errors.push(CheckError { kind, span, unit: source.clone() });
    }

    /// Names defined twice in one namespace, reported at each compiled redefinition.
    pub fn check_duplicates(&mut self) {
        for ns in &self.program.namespaces {
            let mut seen: HashMap<&str, &Declaration> = HashMap::new();
            for decl in ns.declarations.iter().filter(|d| d.defines_name()) {
                let name = decl.name().name.as_str();
                match seen.get(name) {
                    Some(prev) if !decl.source().is_reference() => {
                        let previous = (prev.source() == decl.source()).then(|| prev.span());
                        self.errors.push(CheckError {
                            kind: CheckErrorKind::Duplicate {
                                name: name.to_string(),
                                namespace: ns.name.clone(),
                                previous,
                            },
                            span: decl.span(),
                            unit: decl.source().clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(name, decl);
                    }
                }
            }
        }
    }

    pub fn check_block(&mut self, block: &NamespaceBlock, source: &SourceId) {
        let program = self.program;
        for open in block.opens.iter().filter(|o| !program.contains_namespace(&o.namespace)) {
            self.report(
                source,
                CheckErrorKind::UnknownNamespace { namespace: open.namespace.clone() },
                open.span,
            );
        }
        let ctx = BlockContext { source, scope: BlockScope::new(self.program, block) };

        for decl in &block.declarations {
            self.check_attributes(&ctx, decl.attributes());
            match decl {
                Declaration::Type(t) => self.check_type(&ctx, &t.underlying, t.span),
                Declaration::Callable(c) => self.check_callable(&ctx, c),
                Declaration::Specialization(s) => self.check_specialization(&ctx, s),
            }
        }
    }

    /// Attributes name a `newtype`, usually `Std.Diagnostics.Test` or `Std.Core.EntryPoint`.
    fn check_attributes(&mut self, ctx: &BlockContext<'_, '_>, attributes: &[Attribute]) {
        for attribute in attributes {
            if ctx.scope.resolve_attribute(&attribute.name).is_none() {
                self.report(
                    ctx.source,
                    CheckErrorKind::UnknownAttribute { name: attribute.name.to_string() },
                    attribute.span,
                );
            }
        }
    }

    fn check_type(&mut self, ctx: &BlockContext<'_, '_>, ty: &TypeExpr, span: Span) {
        for name in ty.named_types() {
            if !matches!(ctx.scope.resolve(name), Some(Declaration::Type(_))) {
                self.report(ctx.source, CheckErrorKind::UnknownType { name: name.to_string() }, span);
            }
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn check_callable(&mut self, ctx: &BlockContext<'_, '_>, callable: &CallableDecl) {
        for param in &callable.signature.params {
            self.check_type(ctx, &param.ty, param.span);
        }
        self.check_type(ctx, &callable.signature.ret, callable.span);

        if let Some(body) = &callable.body {
            self.check_body(ctx, &callable.signature.params, body);
        }
    }

    fn check_specialization(&mut self, ctx: &BlockContext<'_, '_>, spec: &SpecializationDecl) {
        let program = self.program;
        let parent = match program.lookup(&spec.parent) {
            Some(Declaration::Callable(parent)) => parent,
            _ => {
                self.report(
                    ctx.source,
                    CheckErrorKind::UnknownSpecializationTarget { parent: spec.parent.to_string() },
                    spec.span,
                );
                return;
            }
        };

        if parent.kind == CallableKind::Function {
            self.report(
                ctx.source,
                CheckErrorKind::FunctionSpecialization { name: parent.name.to_string(), kind: spec.kind },
                spec.span,
            );
            return;
        }

        if let Some(body) = &spec.body {
            self.check_body(ctx, &parent.signature.params, body);
        }
    }

    fn check_body(&mut self, ctx: &BlockContext<'_, '_>, params: &[Param], body: &[Stmt]) {
        let mut scopes = ScopeStack::new();
        for param in params {
            scopes.define(
                param.name.clone(),
                Binding { mutable: false, span: param.span, used: false, report_unused: false },
            );
        }
        self.check_scoped(ctx, &mut scopes, body);
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Check statements in a fresh scope, then report what it left unread.
    fn check_scoped(&mut self, ctx: &BlockContext<'_, '_>, scopes: &mut ScopeStack, stmts: &[Stmt]) {
        scopes.push();
        for stmt in stmts {
            self.check_stmt(ctx, scopes, stmt);
        }
        for (name, span) in scopes.pop() {
            self.report(ctx.source, CheckErrorKind::UnusedBinding { name }, span);
        }
    }

    fn check_stmt(&mut self, ctx: &BlockContext<'_, '_>, scopes: &mut ScopeStack, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.check_expr(ctx, scopes, expr),
            StmtKind::Let { name, mutable, init } => {
                self.check_expr(ctx, scopes, init);
                scopes.define(
                    name.clone(),
                    Binding { mutable: *mutable, span: stmt.span, used: false, report_unused: true },
                );
            }
            StmtKind::Set { name, value } => {
                self.check_expr(ctx, scopes, value);
                match scopes.use_binding(name) {
                    None => self.report(ctx.source, CheckErrorKind::Unresolved { name: name.clone() }, stmt.span),
                    Some(binding) if !binding.mutable => {
                        let declared = binding.span;
                        self.report(
                            ctx.source,
                            CheckErrorKind::ImmutableAssignment { name: name.clone(), declared },
                            stmt.span,
                        );
                    }
                    Some(_) => {}
                }
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.check_expr(ctx, scopes, value);
                }
            }
            StmtKind::If { cond, then_branch, else_branch } => {
                self.check_expr(ctx, scopes, cond);
                self.check_scoped(ctx, scopes, then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_scoped(ctx, scopes, else_branch);
                }
            }
            StmtKind::For { binding, iter, body } => {
                self.check_expr(ctx, scopes, iter);
                scopes.push();
                scopes.define(
                    binding.clone(),
                    Binding { mutable: false, span: stmt.span, used: false, report_unused: false },
                );
                self.check_scoped(ctx, scopes, body);
                scopes.pop();
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn check_expr(&mut self, ctx: &BlockContext<'_, '_>, scopes: &mut ScopeStack, expr: &Expr) {
        match &expr.kind {
            ExprKind::Int(_) | ExprKind::Double(_) | ExprKind::String(_) | ExprKind::Bool(_) => {}
            ExprKind::Path(path) => {
                let local = !path.contains('.') && scopes.use_binding(path).is_some();
                if !local && ctx.scope.resolve(path).is_none() {
                    self.report(ctx.source, CheckErrorKind::Unresolved { name: path.clone() }, expr.span);
                }
            }
            ExprKind::Call { callee, args } => {
                for arg in args {
                    self.check_expr(ctx, scopes, arg);
                }
                match &callee.kind {
                    ExprKind::Path(path) => self.check_call(ctx, scopes, path, callee.span, args.len(), expr.span),
                    _ => self.check_expr(ctx, scopes, callee),
                }
            }
            ExprKind::Binary { left, right, .. } => {
                self.check_expr(ctx, scopes, left);
                self.check_expr(ctx, scopes, right);
            }
            ExprKind::Unary { operand, .. } => self.check_expr(ctx, scopes, operand),
            ExprKind::Index { target, index } => {
                self.check_expr(ctx, scopes, target);
                self.check_expr(ctx, scopes, index);
            }
            ExprKind::Tuple(items) | ExprKind::Array(items) => {
                for item in items {
                    self.check_expr(ctx, scopes, item);
                }
            }
        }
    }

    fn check_call(
        &mut self,
        ctx: &BlockContext<'_, '_>,
        scopes: &mut ScopeStack,
        path: &str,
        callee_span: Span,
        found: usize,
        call_span: Span,
    ) {
        // Locals are not checked for arity
        if !path.contains('.') && scopes.use_binding(path).is_some() {
            return;
        }

        let expected = match ctx.scope.resolve(path) {
            Some(Declaration::Callable(c)) => c.signature.params.len(),
            // Constructor of a newtype
            Some(Declaration::Type(t)) => match &t.underlying {
                TypeExpr::Unit => 0,
                TypeExpr::Tuple(items) => items.len(),
                _ => 1,
            },
            Some(Declaration::Specialization(_)) => return,
            None => {
                self.report(ctx.source, CheckErrorKind::Unresolved { name: path.to_string() }, callee_span);
                return;
            }
        };

        if expected != found {
            self.report(
                ctx.source,
                CheckErrorKind::ArityMismatch { callee: path.to_string(), expected, found },
                call_span,
            );
        }
    }
}
