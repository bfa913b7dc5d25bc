// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Fold generated declarations into the host program.

use std::collections::BTreeSet;

use log::info;
use vela_ast::{Declaration, Namespace, Program, SourceId};

/// The host program plus every satellite declaration from a generated unit.
///
/// Generated declarations go after the existing ones of the namespace with
/// the same name, or into a new namespace appended at the end. Host order
/// and entry points are kept.
pub fn merge(host: &Program, satellite: &Program, synthetic: &BTreeSet<SourceId>) -> Program {
    let mut namespaces = host.namespaces.clone();
    let mut added = 0;

    for ns in &satellite.namespaces {
        let generated: Vec<Declaration> = ns
            .declarations
            .iter()
            .filter(|decl| synthetic.contains(decl.source()))
            .cloned()
            .collect();
        if generated.is_empty() {
            continue;
        }
        added += generated.len();

        match namespaces.iter_mut().find(|existing| existing.name == ns.name) {
            Some(existing) => existing.declarations.extend(generated),
            None => namespaces.push(Namespace::new(ns.name.clone()).with_declarations(generated)),
        }
    }

    info!(declarations = added, namespaces = namespaces.len(); "Merged doc-test declarations");
    Program::new(namespaces, host.entry_points.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ast::ty::TypeExpr;
    use vela_ast::{CallableDecl, CallableKind, DocBlock, QualifiedName, Signature, Span};

    fn callable(ns: &str, name: &str, source: SourceId) -> Declaration {
        Declaration::Callable(CallableDecl {
            name: QualifiedName::new(ns, name),
            kind: CallableKind::Operation,
            signature: Signature { params: Vec::new(), ret: TypeExpr::Unit },
            attributes: Vec::new(),
            body: Some(Vec::new()),
            doc: DocBlock::default(),
            source,
            span: Span::DUMMY,
        })
    }

    fn names(ns: &Namespace) -> Vec<&str> {
        ns.declarations.iter().map(|d| d.name().name.as_str()).collect()
    }

    #[test]
    fn appends_to_existing_and_adds_new_namespaces() {
        let main = SourceId::primary("main.vl");
        let demo_unit = SourceId::synthetic("Demo.doctest.vl");
        let new_unit = SourceId::synthetic("Vela.DocTests.doctest.vl");

        let host = Program::new(
            vec![
                Namespace::new("Demo").with_declarations(vec![callable("Demo", "Run", main.clone())]),
                Namespace::new("Other").with_declarations(vec![callable("Other", "Keep", main.clone())]),
            ],
            vec![QualifiedName::new("Demo", "Run")],
        );
        let satellite = Program::new(
            vec![
                Namespace::new("Demo").with_declarations(vec![
                    callable("Demo", "Run", SourceId::reference("main.vl")),
                    callable("Demo", "RunTest", demo_unit.clone()),
                ]),
                Namespace::new("Other").with_declarations(vec![callable(
                    "Other",
                    "Keep",
                    SourceId::reference("main.vl"),
                )]),
                Namespace::new("Vela.DocTests").with_declarations(vec![callable(
                    "Vela.DocTests",
                    "Global",
                    new_unit.clone(),
                )]),
            ],
            Vec::new(),
        );

        let synthetic: BTreeSet<_> = [demo_unit, new_unit].into_iter().collect();
        let merged = merge(&host, &satellite, &synthetic);

        assert_eq!(merged.namespaces.len(), 3);
        assert_eq!(names(&merged.namespaces[0]), vec!["Run", "RunTest"]);
        assert_eq!(merged.namespaces[1], host.namespaces[1]);
        assert_eq!(merged.namespaces[2].name, "Vela.DocTests");
        assert_eq!(names(&merged.namespaces[2]), vec!["Global"]);
        assert_eq!(merged.entry_points, host.entry_points);
    }

    #[test]
    fn nothing_to_contribute() {
        let host = Program::new(vec![Namespace::new("A")], Vec::new());
        let satellite = Program::new(
            vec![Namespace::new("B").with_declarations(vec![callable("B", "F", SourceId::reference("b.vl"))])],
            Vec::new(),
        );
        assert_eq!(merge(&host, &satellite, &BTreeSet::new()), host);
    }
}
