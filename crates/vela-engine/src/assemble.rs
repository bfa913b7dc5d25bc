// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Assembling namespace blocks into a program.

use vela_ast::file::NamespaceBlock;
use vela_ast::{Declaration, Namespace, Program, QualifiedName};

use crate::scope::{BlockScope, CORE_NAMESPACE};
use crate::unit::ReferenceSet;

/// Merge blocks into namespaces, keeping first-appearance order.
///
/// `open` directives are dropped; they only matter while checking.
pub fn namespaces_from_blocks<'a>(blocks: impl IntoIterator<Item = &'a NamespaceBlock>) -> Vec<Namespace> {
    let mut namespaces = Vec::new();
    for block in blocks {
        let ns = namespace_mut(&mut namespaces, &block.name);
        if ns.doc.is_empty() {
            ns.doc = block.doc.clone();
        }
        ns.declarations.extend(block.declarations.iter().cloned());
    }
    namespaces
}

/// Build the program: reference namespaces first, then compiled blocks.
///
/// Attribute names on compiled declarations are replaced by the full name
/// of the `newtype` they resolve to from their block, so `@Test(...)` under
/// `open Std.Diagnostics;` is stored as `Std.Diagnostics.Test`. Names that
/// do not resolve are kept as written; the checker reports them.
pub(crate) fn assemble<'a>(
    references: &ReferenceSet,
    compiled: impl IntoIterator<Item = &'a NamespaceBlock>,
) -> Program {
    let mut namespaces: Vec<Namespace> = Vec::new();

    for (_, reference) in references.iter() {
        for ns in reference {
            let target = namespace_mut(&mut namespaces, &ns.name);
            if target.doc.is_empty() {
                target.doc = ns.doc.clone();
            }
            target.declarations.extend(ns.declarations.iter().cloned());
        }
    }

    // Where each block's declarations start: (namespace index, declaration index)
    let mut placed = Vec::new();
    for block in compiled {
        let index = namespace_index(&mut namespaces, &block.name);
        let target = &mut namespaces[index];
        if target.doc.is_empty() {
            target.doc = block.doc.clone();
        }
        placed.push((block, index, target.declarations.len()));
        target.declarations.extend(block.declarations.iter().cloned());
    }

    let mut program = Program::new(namespaces, Vec::new());

    let mut renames = Vec::new();
    for &(block, ns, first) in &placed {
        let scope = BlockScope::new(&program, block);
        for (offset, decl) in block.declarations.iter().enumerate() {
            for (position, attribute) in decl.attributes().iter().enumerate() {
                match scope.resolve_attribute(&attribute.name) {
                    Some(name) if *name != attribute.name => {
                        renames.push((ns, first + offset, position, name.clone()));
                    }
                    _ => {}
                }
            }
        }
    }
    for (ns, decl, position, name) in renames {
        if let Some(attribute) = program.namespaces[ns].declarations[decl].attributes_mut().get_mut(position) {
            attribute.name = name;
        }
    }

    let marker = QualifiedName::new(CORE_NAMESPACE, "EntryPoint");
    program.entry_points = placed
        .iter()
        .flat_map(|&(block, ns, first)| &program.namespaces[ns].declarations[first..first + block.declarations.len()])
        .filter_map(Declaration::as_callable)
        .filter(|c| c.attributes.iter().any(|a| a.name == marker))
        .map(|c| c.name.clone())
        .collect();

    program
}

fn namespace_index(namespaces: &mut Vec<Namespace>, name: &str) -> usize {
    match namespaces.iter().position(|ns| ns.name == name) {
        Some(idx) => idx,
        None => {
            namespaces.push(Namespace::new(name));
            namespaces.len() - 1
        }
    }
}

fn namespace_mut<'a>(namespaces: &'a mut Vec<Namespace>, name: &str) -> &'a mut Namespace {
    let idx = namespace_index(namespaces, name);
    &mut namespaces[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib;
    use vela_ast::SourceId;

    fn blocks(src: &str, id: SourceId) -> Vec<NamespaceBlock> {
        let tokens = vela_lexer::Lexer::new(src).tokenize().tokens;
        vela_parser::Parser::new(tokens, id).parse().blocks
    }

    #[test]
    fn references_come_first_and_blocks_merge() {
        let reference = namespaces_from_blocks(&blocks(
            "namespace Demo { function Lib() : Unit; } namespace Std.Core { newtype EntryPoint = Unit; function Length(xs : Int[]) : Int; }",
            SourceId::reference("lib.vl"),
        ));
        let refs = ReferenceSet::single(SourceId::reference("lib.vl"), reference);

        let compiled = blocks(
            "namespace Demo { @EntryPoint() operation Main() : Unit {} } namespace Extra { }",
            SourceId::primary("main.vl"),
        );
        let program = assemble(&refs, &compiled);

        let names: Vec<_> = program.namespaces.iter().map(|ns| ns.name.as_str()).collect();
        assert_eq!(names, vec!["Demo", "Std.Core", "Extra"]);

        let demo = program.namespace("Demo").unwrap();
        assert_eq!(demo.declarations.len(), 2);
        assert_eq!(demo.declarations[1].attributes()[0].name, QualifiedName::new("Std.Core", "EntryPoint"));
        assert!(demo.declarations[0].source().is_reference());
        assert!(demo.declarations[1].source().is_primary());
        assert_eq!(program.entry_points, vec![QualifiedName::new("Demo", "Main")]);
    }

    #[test]
    fn attribute_names_are_stored_resolved() {
        let compiled = blocks(
            "namespace Demo {\n\
                 open Std.Diagnostics;\n\
                 open Std.Diagnostics as Diag;\n\
                 @Test(\"Simulator\") @Diag.Test(\"ResourcesEstimator\") @Missing()\n\
                 operation Check() : Unit {}\n\
                 @Std.Core.EntryPoint() operation Main() : Unit {}\n\
             }",
            SourceId::primary("main.vl"),
        );
        let program = assemble(&stdlib::references(), &compiled);

        let check = program.lookup(&QualifiedName::new("Demo", "Check")).unwrap();
        let names: Vec<String> = check.attributes().iter().map(|a| a.name.to_string()).collect();
        assert_eq!(names, vec!["Std.Diagnostics.Test", "Std.Diagnostics.Test", "Missing"]);
        assert_eq!(program.entry_points, vec![QualifiedName::new("Demo", "Main")]);

        // The parsed blocks themselves are left as written
        assert_eq!(compiled[0].declarations[0].attributes()[0].name.to_string(), "Test");
    }
}
