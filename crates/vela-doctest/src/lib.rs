// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Documentation examples as tests.
//!
//! [`DocsToTests`] pulls the fenced code out of the `# Example` sections of
//! a program's doc comments, compiles it as a separate program against the
//! host's headers and, when that succeeds, adds the compiled callables to the
//! host, tagged as tests. Examples that stop compiling become build errors.
//!
//! ```text
//! host ─ extract ─ synth ─┐
//!    └── reference ───────┴ satellite ─ merge ─ tagger
//! ```

pub mod config;
pub mod docs;
pub mod error;
pub mod extract;
pub mod merge;
pub mod reference;
pub mod satellite;
pub mod synth;
pub mod tagger;

use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;
use vela_ast::{Program, QualifiedName};
use vela_diagnostics::{Diagnostic, ToDiagnostic};
use vela_engine::{CompilationEngine, CompilationUnitManager, SourceUnit};

pub use config::{DocTestConfig, FencePolicy};
pub use error::DocTestError;
pub use extract::{ExtractionAnomaly, Snippets};

/// How a transformation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// No example snippets; the engine never ran.
    NoExamples,
    /// Examples compiled and were merged.
    Merged,
    /// Examples did not compile; the program is unchanged.
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NoExamples => write!(f, "no examples"),
            Status::Merged => write!(f, "merged"),
            Status::Failed => write!(f, "failed"),
        }
    }
}

/// The output of [`DocsToTests::transform`].
#[derive(Debug, Clone)]
pub struct Transformation {
    pub program: Program,
    /// Warnings from extraction, then everything the satellite build reported.
    pub diagnostics: Vec<Diagnostic>,
    /// Generated units, for rendering diagnostics that point into them.
    pub units: Vec<SourceUnit>,
    /// Callables tagged as tests, in program order.
    pub tagged: Vec<QualifiedName>,
    pub status: Status,
}

impl Transformation {
    pub fn succeeded(&self) -> bool {
        self.status != Status::Failed
    }
}

/// The doc-test rewrite step.
#[derive(Debug, Clone, Default)]
pub struct DocsToTests {
    config: DocTestConfig,
}

impl DocsToTests {
    pub const NAME: &'static str = "DocsToTests";

    pub fn new(config: DocTestConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn config(&self) -> &DocTestConfig {
        &self.config
    }

    /// Run the rewrite with a fresh [`CompilationUnitManager`].
    pub fn transform(&self, program: &Program) -> Result<Transformation, DocTestError> {
        self.transform_with(&mut CompilationUnitManager::new(), program)
    }

    /// Run the rewrite, compiling examples with `engine`.
    pub fn transform_with<E: CompilationEngine>(
        &self,
        engine: &mut E,
        program: &Program,
    ) -> Result<Transformation, DocTestError> {
        self.config.validate()?;

        let snippets = extract::extract(program, &self.config);
        let mut diagnostics = self.anomaly_diagnostics(snippets.anomalies());

        let units = synth::build_units(&snippets, program, &self.config);
        if units.is_empty() {
            info!(step = self.name(); "No examples found");
            return Ok(Transformation {
                program: program.clone(),
                diagnostics,
                units,
                tagged: Vec::new(),
                status: Status::NoExamples,
            });
        }

        let references = reference::references(program);
        let build = satellite::compile(engine, units.clone(), references)?;
        let failed = build.has_errors();
        diagnostics.extend(build.diagnostics.iter().cloned());

        if failed {
            info!(
                step = self.name(),
                errors = diagnostics.iter().filter(|d| d.is_error()).count();
                "Examples failed to compile, program left unchanged",
            );
            return Ok(Transformation {
                program: program.clone(),
                diagnostics,
                units,
                tagged: Vec::new(),
                status: Status::Failed,
            });
        }

        let merged = merge::merge(program, &build.program, &build.synthetic_ids);
        let tagged = tagger::tag(&merged, &build.synthetic_ids, &self.config.test_attributes());

        info!(
            step = self.name(),
            units = units.len(),
            tests = tagged.tests.len();
            "Examples merged",
        );
        Ok(Transformation {
            program: tagged.program,
            diagnostics,
            units,
            tagged: tagged.tests,
            status: Status::Merged,
        })
    }

    fn anomaly_diagnostics(&self, anomalies: &[ExtractionAnomaly]) -> Vec<Diagnostic> {
        match self.config.fence_policy {
            FencePolicy::Truncate => {
                for anomaly in anomalies {
                    debug!(declaration:% = anomaly.declaration; "Dropped unterminated example fence");
                }
                Vec::new()
            }
            FencePolicy::Warn => anomalies
                .iter()
                .map(|anomaly| {
                    warn!(declaration:% = anomaly.declaration; "Unterminated example fence");
                    anomaly.to_diagnostic()
                })
                .collect(),
        }
    }
}
