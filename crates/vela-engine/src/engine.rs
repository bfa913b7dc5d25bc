// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The compilation engine: source units in, checked program out.

use log::{debug, info};
use vela_ast::file::NamespaceBlock;
use vela_ast::{Program, SourceId};
use vela_diagnostics::{Diagnostic, ToDiagnostic};

use crate::assemble::assemble;
use crate::checker::Checker;
use crate::error::EngineError;
use crate::unit::{ReferenceSet, SourceUnit};

/// What a build produces.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Reference headers followed by everything compiled from source units.
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildOutput {
    pub fn has_errors(&self) -> bool {
        vela_diagnostics::has_errors(&self.diagnostics)
    }
}

/// An incremental compiler the doc-test rewrite can drive.
pub trait CompilationEngine {
    /// Register units, replacing any unit with the same id.
    ///
    /// Unless `suppress_verification` is set, new or changed units are parsed
    /// right away instead of at the next build.
    fn add_or_update_sources(
        &mut self,
        units: Vec<SourceUnit>,
        suppress_verification: bool,
    ) -> Result<(), EngineError>;

    /// Replace the referenced libraries.
    fn update_references(&mut self, references: ReferenceSet) -> Result<(), EngineError>;

    fn build(&mut self) -> Result<BuildOutput, EngineError>;
}

/// A unit plus its cached parse.
#[derive(Debug)]
struct UnitState {
    unit: SourceUnit,
    parsed: Option<ParsedUnit>,
}

#[derive(Debug, Clone)]
struct ParsedUnit {
    blocks: Vec<NamespaceBlock>,
    /// Lex and parse errors, already tagged with the unit id.
    diagnostics: Vec<Diagnostic>,
}

impl ParsedUnit {
    fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The default engine: parses units on demand and caches the results.
#[derive(Debug, Default)]
pub struct CompilationUnitManager {
    units: Vec<UnitState>,
    references: ReferenceSet,
    parse_count: usize,
}

impl CompilationUnitManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered units in registration order.
    pub fn units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.units.iter().map(|s| &s.unit)
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    /// How many times a unit has been parsed since creation.
    pub fn parse_count(&self) -> usize {
        self.parse_count
    }

    fn collides_with_unit(&self, reference: &SourceId) -> bool {
        self.units.iter().any(|s| s.unit.id.name() == reference.name())
    }

    fn parse(&mut self, index: usize) {
        if self.units[index].parsed.is_some() {
            return;
        }
        let parsed = parse_unit(&self.units[index].unit);
        self.parse_count += 1;
        debug!(
            unit = self.units[index].unit.id.name(),
            blocks = parsed.blocks.len(),
            errors = parsed.diagnostics.len();
            "Parsed unit",
        );
        self.units[index].parsed = Some(parsed);
    }
}

impl CompilationEngine for CompilationUnitManager {
    fn add_or_update_sources(
        &mut self,
        units: Vec<SourceUnit>,
        suppress_verification: bool,
    ) -> Result<(), EngineError> {
        for unit in &units {
            if unit.id.is_reference() {
                return Err(EngineError::InvalidUnitId { id: unit.id.clone() });
            }
            if let Some(reference) = self.references.ids().find(|r| r.name() == unit.id.name()) {
                return Err(EngineError::DuplicateReference { id: reference.clone() });
            }
        }

        for unit in units {
            let index = match self.units.iter().position(|s| s.unit.id == unit.id) {
                Some(index) => {
                    let state = &mut self.units[index];
                    if state.unit.text != unit.text {
                        state.unit = unit;
                        state.parsed = None;
                    }
                    index
                }
                None => {
                    self.units.push(UnitState { unit, parsed: None });
                    self.units.len() - 1
                }
            };
            if !suppress_verification {
                self.parse(index);
            }
        }
        Ok(())
    }

    fn update_references(&mut self, references: ReferenceSet) -> Result<(), EngineError> {
        for id in references.ids() {
            if !id.is_reference() {
                return Err(EngineError::NotAReference { id: id.clone() });
            }
            if self.collides_with_unit(id) {
                return Err(EngineError::DuplicateReference { id: id.clone() });
            }
        }
        self.references = references;
        Ok(())
    }

    fn build(&mut self) -> Result<BuildOutput, EngineError> {
        for index in 0..self.units.len() {
            self.parse(index);
        }

        let parsed: Vec<(&SourceId, &ParsedUnit)> = self
            .units
            .iter()
            .filter_map(|s| s.parsed.as_ref().map(|p| (&s.unit.id, p)))
            .collect();

        let program = assemble(&self.references, parsed.iter().flat_map(|(_, p)| p.blocks.iter()));

        let mut diagnostics: Vec<Diagnostic> = parsed.iter().flat_map(|(_, p)| p.diagnostics.iter().cloned()).collect();

        // Units that failed to parse are not checked further
        let mut checker = Checker::new(&program);
        checker.check_duplicates();
        for (id, unit) in parsed.iter().filter(|(_, p)| p.is_clean()) {
            for block in &unit.blocks {
                checker.check_block(block, id);
            }
        }
        diagnostics.extend(checker.finish().iter().map(ToDiagnostic::to_diagnostic));

        info!(
            units = self.units.len(),
            references = self.references.len(),
            namespaces = program.namespaces.len(),
            errors = diagnostics.iter().filter(|d| d.is_error()).count();
            "Build finished",
        );

        Ok(BuildOutput { program, diagnostics })
    }
}

fn parse_unit(unit: &SourceUnit) -> ParsedUnit {
    let lex_result = vela_lexer::Lexer::new(&unit.text).tokenize();
    let mut diagnostics: Vec<Diagnostic> = lex_result
        .errors
        .iter()
        .map(|e| e.to_diagnostic().with_source(unit.id.clone()))
        .collect();

    let parse_result = vela_parser::Parser::new(lex_result.tokens, unit.id.clone()).parse();
    diagnostics.extend(
        parse_result
            .errors
            .iter()
            .map(|e| e.to_diagnostic().with_source(unit.id.clone())),
    );

    ParsedUnit { blocks: parse_result.blocks, diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib;

    fn unit(name: &str, text: &str) -> SourceUnit {
        SourceUnit::new(SourceId::primary(name), text)
    }

    #[test]
    fn builds_against_references() {
        let mut engine = CompilationUnitManager::new();
        engine.update_references(stdlib::references()).unwrap();
        engine
            .add_or_update_sources(
                vec![unit(
                    "main.vl",
                    "namespace Demo { open Std.Intrinsic; @EntryPoint() operation Main() : Unit { let q = Allocate(); H(q); Release(q); } }",
                )],
                false,
            )
            .unwrap();

        let output = engine.build().unwrap();
        assert!(!output.has_errors(), "{:?}", output.diagnostics);
        assert!(output.program.contains_namespace("Std.Core"));
        assert_eq!(output.program.namespaces.last().unwrap().name, "Demo");
        assert_eq!(output.program.entry_points.len(), 1);
    }

    #[test]
    fn eager_parse_unless_suppressed() {
        let mut engine = CompilationUnitManager::new();
        engine.add_or_update_sources(vec![unit("a.vl", "namespace A {}")], true).unwrap();
        assert_eq!(engine.parse_count(), 0);
        engine.add_or_update_sources(vec![unit("b.vl", "namespace B {}")], false).unwrap();
        assert_eq!(engine.parse_count(), 1);
        engine.build().unwrap();
        assert_eq!(engine.parse_count(), 2);
    }

    #[test]
    fn parse_cache_survives_identical_updates() {
        let mut engine = CompilationUnitManager::new();
        engine.add_or_update_sources(vec![unit("a.vl", "namespace A {}")], false).unwrap();
        engine.add_or_update_sources(vec![unit("a.vl", "namespace A {}")], false).unwrap();
        assert_eq!(engine.parse_count(), 1);

        engine.add_or_update_sources(vec![unit("a.vl", "namespace A { function F() : Unit {} }")], false).unwrap();
        assert_eq!(engine.parse_count(), 2);
        assert_eq!(engine.units().count(), 1);

        let output = engine.build().unwrap();
        assert_eq!(output.program.namespace("A").unwrap().declarations.len(), 1);
        assert_eq!(engine.parse_count(), 2);
    }

    #[test]
    fn syntax_errors_are_tagged_with_the_unit() {
        let mut engine = CompilationUnitManager::new();
        let id = SourceId::synthetic("A.doctest.vl");
        engine
            .add_or_update_sources(vec![SourceUnit::new(id.clone(), "namespace A { function F() : Unit { let y = (1; } }")], true)
            .unwrap();

        let output = engine.build().unwrap();
        assert!(output.has_errors());
        assert_eq!(output.diagnostics[0].code_str(), Some("E0100"));
        assert_eq!(output.diagnostics[0].source, Some(id));
    }

    #[test]
    fn rejects_reference_units() {
        let mut engine = CompilationUnitManager::new();
        let err = engine
            .add_or_update_sources(vec![SourceUnit::new(SourceId::reference("x.vl"), "")], true)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidUnitId { .. }));
    }

    #[test]
    fn rejects_colliding_references() {
        let mut engine = CompilationUnitManager::new();
        engine.add_or_update_sources(vec![unit("lib.vl", "namespace L {}")], true).unwrap();

        let refs = ReferenceSet::single(SourceId::reference("lib.vl"), Vec::new());
        assert_eq!(
            engine.update_references(refs),
            Err(EngineError::DuplicateReference { id: SourceId::reference("lib.vl") })
        );

        let not_reference = ReferenceSet::single(SourceId::primary("other.vl"), Vec::new());
        assert!(matches!(engine.update_references(not_reference), Err(EngineError::NotAReference { .. })));
    }
}
