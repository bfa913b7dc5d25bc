// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Compile generated units against the host program's headers.

use std::collections::BTreeSet;

use log::info;
use vela_ast::{Program, SourceId};
use vela_diagnostics::Diagnostic;
use vela_engine::{CompilationEngine, ReferenceSet, SourceUnit};

use crate::error::DocTestError;

/// Result of one satellite build.
#[derive(Debug, Clone)]
pub struct SatelliteBuild {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
    /// Ids of the generated units; their declarations are the ones to merge.
    pub synthetic_ids: BTreeSet<SourceId>,
}

impl SatelliteBuild {
    pub fn has_errors(&self) -> bool {
        vela_diagnostics::has_errors(&self.diagnostics)
    }
}

/// Register `units`, make `references` the only reference, build once.
pub fn compile<E: CompilationEngine>(
    engine: &mut E,
    units: Vec<SourceUnit>,
    references: ReferenceSet,
) -> Result<SatelliteBuild, DocTestError> {
    let synthetic_ids: BTreeSet<SourceId> = units.iter().map(|u| u.id.clone()).collect();

    engine.add_or_update_sources(units, true)?;
    engine.update_references(references)?;
    let output = engine.build()?;

    let build = SatelliteBuild { program: output.program, diagnostics: output.diagnostics, synthetic_ids };
    info!(
        units = build.synthetic_ids.len(),
        diagnostics = build.diagnostics.len(),
        failed = build.has_errors();
        "Compiled doc-test units",
    );
    Ok(build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_engine::{stdlib, BuildOutput, CompilationUnitManager, EngineError};

    #[test]
    fn builds_against_references() {
        let mut engine = CompilationUnitManager::new();
        let unit = SourceUnit::new(
            SourceId::synthetic("Demo.doctest.vl"),
            "namespace Demo {\nopen Std.Intrinsic;\noperation T() : Unit { let q = Allocate(); Release(q); }\n}",
        );

        let build = compile(&mut engine, vec![unit], stdlib::references()).unwrap();
        assert!(!build.has_errors(), "{:?}", build.diagnostics);
        assert!(build.synthetic_ids.contains(&SourceId::synthetic("Demo.doctest.vl")));
        assert!(build.program.namespace("Demo").is_some());
        // Parsing waited for the build
        assert_eq!(engine.parse_count(), 1);
    }

    #[test]
    fn errors_are_diagnostics_not_failures() {
        let mut engine = CompilationUnitManager::new();
        let unit = SourceUnit::new(SourceId::synthetic("A.doctest.vl"), "namespace A {\nfunction F() : Unit { Missing(); }\n}");

        let build = compile(&mut engine, vec![unit], ReferenceSet::new()).unwrap();
        assert!(build.has_errors());
        assert_eq!(build.diagnostics[0].code_str(), Some("E0200"));
    }

    struct Rejecting;

    impl CompilationEngine for Rejecting {
        fn add_or_update_sources(&mut self, units: Vec<SourceUnit>, _: bool) -> Result<(), EngineError> {
            Err(EngineError::InvalidUnitId { id: units[0].id.clone() })
        }

        fn update_references(&mut self, _: ReferenceSet) -> Result<(), EngineError> {
            Ok(())
        }

        fn build(&mut self) -> Result<BuildOutput, EngineError> {
            unreachable!("build after a rejected registration")
        }
    }

    #[test]
    fn engine_errors_propagate() {
        let unit = SourceUnit::new(SourceId::synthetic("A.doctest.vl"), "namespace A {}");
        let err = compile(&mut Rejecting, vec![unit], ReferenceSet::new()).unwrap_err();
        assert!(matches!(err, DocTestError::Engine(EngineError::InvalidUnitId { .. })));
    }
}
