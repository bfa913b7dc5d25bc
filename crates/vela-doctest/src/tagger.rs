// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Mark generated callables as backend tests.

use std::collections::BTreeSet;

use log::debug;
use vela_ast::{Attribute, CallableDecl, Declaration, Namespace, Program, QualifiedName, SourceId};

/// A program after tagging, with the names of the tagged callables.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub program: Program,
    pub tests: Vec<QualifiedName>,
}

/// A generated callable that takes no input can run as a test.
pub fn is_test_candidate(callable: &CallableDecl, synthetic: &BTreeSet<SourceId>) -> bool {
    synthetic.contains(&callable.source) && callable.signature.takes_unit()
}

/// Attach each attribute in `attributes` to every test candidate that lacks it.
pub fn tag(program: &Program, synthetic: &BTreeSet<SourceId>, attributes: &[Attribute]) -> Tagged {
    let mut tests = Vec::new();

    let namespaces = program
        .namespaces
        .iter()
        .map(|ns| Namespace {
            name: ns.name.clone(),
            doc: ns.doc.clone(),
            declarations: ns
                .declarations
                .iter()
                .map(|decl| match decl {
                    Declaration::Callable(c) if is_test_candidate(c, synthetic) => {
                        tests.push(c.name.clone());
                        Declaration::Callable(with_attributes(c, attributes))
                    }
                    other => other.clone(),
                })
                .collect(),
        })
        .collect();

    debug!(tests = tests.len(), backends = attributes.len(); "Tagged doc-test callables");
    Tagged { program: Program::new(namespaces, program.entry_points.clone()), tests }
}

fn with_attributes(callable: &CallableDecl, attributes: &[Attribute]) -> CallableDecl {
    let mut tagged = callable.clone();
    for attr in attributes {
        if !tagged.attributes.iter().any(|a| a.matches(attr)) {
            tagged.attributes.push(attr.clone());
        }
    }
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ast::ty::TypeExpr;
    use vela_ast::{CallableKind, DocBlock, Param, Signature, Span};

    fn callable(name: &str, params: usize, source: SourceId) -> CallableDecl {
        CallableDecl {
            name: QualifiedName::new("Demo", name),
            kind: CallableKind::Operation,
            signature: Signature {
                params: (0..params)
                    .map(|i| Param { name: format!("p{}", i), ty: TypeExpr::Int, span: Span::DUMMY })
                    .collect(),
                ret: TypeExpr::Unit,
            },
            attributes: Vec::new(),
            body: Some(Vec::new()),
            doc: DocBlock::default(),
            source,
            span: Span::DUMMY,
        }
    }

    fn test_attr(backend: &str) -> Attribute {
        Attribute::new(QualifiedName::new("Std.Diagnostics", "Test"), Some(backend.to_string()))
    }

    #[test]
    fn only_generated_unit_callables_are_tagged() {
        let generated = SourceId::synthetic("Demo.doctest.vl");
        let mut already = callable("Already", 0, generated.clone());
        already.attributes.push(test_attr("Simulator"));

        let ns = Namespace::new("Demo").with_declarations(vec![
            Declaration::Callable(callable("Original", 0, SourceId::primary("demo.vl"))),
            Declaration::Callable(callable("Example", 0, generated.clone())),
            Declaration::Callable(callable("Helper", 2, generated.clone())),
            Declaration::Callable(already),
        ]);
        let program = Program::new(vec![ns], Vec::new());
        let synthetic: BTreeSet<_> = [generated].into_iter().collect();
        let attributes = [test_attr("Simulator"), test_attr("ResourcesEstimator")];

        let tagged = tag(&program, &synthetic, &attributes);
        assert_eq!(
            tagged.tests,
            vec![QualifiedName::new("Demo", "Example"), QualifiedName::new("Demo", "Already")]
        );

        let attrs = |name: &str| {
            tagged
                .program
                .lookup(&QualifiedName::new("Demo", name))
                .and_then(Declaration::as_callable)
                .map(|c| c.attributes.len())
        };
        assert_eq!(attrs("Original"), Some(0));
        assert_eq!(attrs("Example"), Some(2));
        assert_eq!(attrs("Helper"), Some(0));
        // The existing Simulator attribute is not duplicated
        assert_eq!(attrs("Already"), Some(2));
    }

    #[test]
    fn body_and_signature_are_untouched() {
        let generated = SourceId::synthetic("Demo.doctest.vl");
        let original = callable("Example", 0, generated.clone());
        let program = Program::new(
            vec![Namespace::new("Demo").with_declarations(vec![Declaration::Callable(original.clone())])],
            Vec::new(),
        );

        let tagged = tag(&program, &[generated].into_iter().collect(), &[test_attr("Simulator")]);
        let c = tagged.program.callables().next().unwrap();
        assert_eq!(c.body, original.body);
        assert_eq!(c.signature, original.signature);
        assert_eq!(c.attributes, vec![test_attr("Simulator")]);
    }
}
