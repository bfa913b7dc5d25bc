// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax tree and program model for the Vela language.
//!
//! The front end produces [`file::NamespaceBlock`]s; the engine assembles them
//! into a [`program::Program`], the value every later pass consumes and
//! produces.

pub mod span;
pub mod source;
pub mod token;
pub mod ty;
pub mod expr;
pub mod stmt;
pub mod program;
pub mod file;

pub use span::{LineMap, Span};
pub use source::SourceId;
pub use program::{
    Attribute, CallableDecl, CallableKind, Declaration, DocBlock, Namespace, Param, Program,
    QualifiedName, Signature, SpecializationDecl, SpecializationKind, TypeDecl,
};
