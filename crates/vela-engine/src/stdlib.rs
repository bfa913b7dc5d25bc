// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Standard library headers.
//!
//! The `Std.*` namespaces are body-less Vela headers embedded in the
//! binary. They are loaded as references, never compiled.

use log::warn;
use vela_ast::SourceId;
use vela_diagnostics::ToDiagnostic;

use crate::assemble::namespaces_from_blocks;
use crate::unit::ReferenceSet;

/// Embedded header sources, keyed by the name used in their reference id.
const STD_SOURCES: &[(&str, &str)] = &[
    ("std/core.vl", include_str!("../stdlib/core.vl")),
    ("std/intrinsic.vl", include_str!("../stdlib/intrinsic.vl")),
    ("std/diagnostics.vl", include_str!("../stdlib/diagnostics.vl")),
    ("std/canon.vl", include_str!("../stdlib/canon.vl")),
    ("std/arrays.vl", include_str!("../stdlib/arrays.vl")),
];

/// Names of the namespaces the headers declare.
pub const STD_NAMESPACES: &[&str] = &["Std.Core", "Std.Intrinsic", "Std.Diagnostics", "Std.Canon", "Std.Arrays"];

/// Reference ids and text of every header file.
pub fn sources() -> impl Iterator<Item = (SourceId, &'static str)> {
    STD_SOURCES.iter().map(|(name, text)| (SourceId::reference(*name), *text))
}

/// Parse the headers into a reference set, one entry per file.
pub fn references() -> ReferenceSet {
    let mut set = ReferenceSet::new();
    for (id, text) in sources() {
        let lex_result = vela_lexer::Lexer::new(text).tokenize();
        let parse_result = vela_parser::Parser::new(lex_result.tokens, id.clone()).parse();
        if !lex_result.errors.is_empty() || !parse_result.errors.is_empty() {
            let first = lex_result
                .errors
                .first()
                .map(ToDiagnostic::to_diagnostic)
                .or_else(|| parse_result.errors.first().map(ToDiagnostic::to_diagnostic));
            warn!(header = id.name(), error:? = first.map(|d| d.message); "Skipping malformed standard header");
            continue;
        }
        set.insert(id, namespaces_from_blocks(&parse_result.blocks));
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ast::{Declaration, QualifiedName};

    #[test]
    fn all_headers_load() {
        let set = references();
        assert_eq!(set.len(), STD_SOURCES.len());

        let names: Vec<&str> = set.iter().flat_map(|(_, nss)| nss.iter().map(|ns| ns.name.as_str())).collect();
        for expected in STD_NAMESPACES {
            assert!(names.contains(expected), "Missing namespace: {}", expected);
        }
    }

    #[test]
    fn headers_are_body_less_references() {
        let set = references();
        for (id, namespaces) in set.iter() {
            assert!(id.is_reference());
            for decl in namespaces.iter().flat_map(|ns| ns.declarations.iter()) {
                assert!(decl.source().is_reference());
                match decl {
                    Declaration::Callable(c) => assert!(c.body.is_none(), "{} has a body", c.name),
                    Declaration::Specialization(s) => assert!(s.body.is_none()),
                    Declaration::Type(_) => {}
                }
            }
        }
    }

    #[test]
    fn test_marker_is_declared() {
        let set = references();
        let diagnostics = set
            .get(&SourceId::reference("std/diagnostics.vl"))
            .unwrap();
        let test = diagnostics[0].find("Test").unwrap();
        assert_eq!(test.name(), &QualifiedName::new("Std.Diagnostics", "Test"));
    }
}
