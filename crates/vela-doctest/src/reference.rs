// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Project a program onto its declared API.

use vela_ast::{Namespace, Program, SourceId};
use vela_engine::ReferenceSet;

/// Reference id the projected host program is registered under.
pub const REFERENCE_UNIT: &str = "doctest-references.vlib";

pub fn reference_id() -> SourceId {
    SourceId::reference(REFERENCE_UNIT)
}

/// Every namespace of `program` with bodies removed and sources turned into references.
pub fn project(program: &Program) -> Vec<Namespace> {
    program
        .namespaces
        .iter()
        .map(|ns| Namespace {
            name: ns.name.clone(),
            doc: ns.doc.clone(),
            declarations: ns
                .declarations
                .iter()
                .map(|decl| {
                    let source = decl.source().as_reference();
                    decl.clone().into_header(source)
                })
                .collect(),
        })
        .collect()
}

/// The projection as the only entry of a reference set.
pub fn references(program: &Program) -> ReferenceSet {
    ReferenceSet::single(reference_id(), project(program))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ast::ty::TypeExpr;
    use vela_ast::{
        CallableDecl, CallableKind, Declaration, DocBlock, QualifiedName, Signature, SpecializationDecl,
        SpecializationKind, Span,
    };

    fn program() -> Program {
        let op = CallableDecl {
            name: QualifiedName::new("Demo", "Flip"),
            kind: CallableKind::Operation,
            signature: Signature { params: Vec::new(), ret: TypeExpr::Unit },
            attributes: Vec::new(),
            body: Some(Vec::new()),
            doc: DocBlock::new(vec!["Flips.".to_string()]),
            source: SourceId::primary("demo.vl"),
            span: Span::new(3, 40),
        };
        let adj = SpecializationDecl {
            parent: QualifiedName::new("Demo", "Flip"),
            kind: SpecializationKind::Adjoint,
            body: Some(Vec::new()),
            doc: DocBlock::default(),
            source: SourceId::synthetic("Demo.doctest.vl"),
            span: Span::DUMMY,
        };
        let ns = Namespace::new("Demo").with_declarations(vec![Declaration::Callable(op), Declaration::Specialization(adj)]);
        Program::new(vec![ns], vec![QualifiedName::new("Demo", "Flip")])
    }

    #[test]
    fn strips_bodies_and_retags_sources() {
        let projected = project(&program());
        assert_eq!(projected.len(), 1);
        for decl in &projected[0].declarations {
            assert!(decl.source().is_reference());
            match decl {
                Declaration::Callable(c) => {
                    assert!(c.body.is_none());
                    assert_eq!(c.doc.lines, vec!["Flips."]);
                    assert_eq!(c.span, Span::new(3, 40));
                }
                Declaration::Specialization(s) => assert!(s.body.is_none()),
                Declaration::Type(_) => unreachable!(),
            }
        }
        assert_eq!(projected[0].declarations[0].source(), &SourceId::reference("demo.vl"));
        assert_eq!(projected[0].declarations[1].source(), &SourceId::reference("Demo.doctest.vl"));
    }

    #[test]
    fn stored_under_fixed_id() {
        let set = references(&program());
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&reference_id()).unwrap().len(), 1);
    }
}
