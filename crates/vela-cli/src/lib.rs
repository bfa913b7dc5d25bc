// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI logic for the `vela` tool.
//!
//! Every command compiles the given files against the standard headers
//! first; the doc-test rewrite only runs on a host program without errors.

pub mod args;
mod config;
mod error;
pub mod output;

pub use args::{Args, Command, Format};
pub use config::load_config;
pub use error::CliError;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use log::{debug, info};
use serde::Serialize;
use vela_ast::{Program, QualifiedName, SourceId};
use vela_diagnostics::{has_errors, Diagnostic, SourceCache, ToDiagnostic};
use vela_doctest::extract::extract;
use vela_doctest::{DocTestConfig, DocsToTests, FencePolicy, Status};
use vela_engine::{stdlib, CompilationEngine, CompilationUnitManager, SourceUnit};

/// The user's files, compiled.
#[derive(Debug)]
pub struct Host {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
    /// Text of the files and the standard headers.
    pub sources: SourceCache,
}

impl Host {
    pub fn has_errors(&self) -> bool {
        has_errors(&self.diagnostics)
    }
}

/// Compile `files` as primary units linked against the standard headers.
pub fn compile_host(files: &[PathBuf]) -> Result<Host, CliError> {
    let mut sources = SourceCache::new();
    sources.extend(stdlib::sources());

    let mut units = Vec::with_capacity(files.len());
    for path in files {
        let text = fs::read_to_string(path).map_err(|source| CliError::Read { path: path.clone(), source })?;
        let id = SourceId::primary(path.display().to_string());
        sources.insert(id.clone(), text.clone());
        units.push(SourceUnit::new(id, text));
    }

    let mut engine = CompilationUnitManager::new();
    engine.update_references(stdlib::references())?;
    engine.add_or_update_sources(units, false)?;
    let output = engine.build()?;

    debug!(files = files.len(), diagnostics = output.diagnostics.len(); "Compiled host program");
    Ok(Host { program: output.program, diagnostics: output.diagnostics, sources })
}

/// Run one command, writing its report to `out`.
///
/// Returns whether the command succeeded; `Err` is reserved for failures
/// that prevent producing a report at all.
pub fn run(args: &Args, out: &mut dyn Write) -> Result<bool, CliError> {
    let command = args.command.name();
    info!(command = command, files = args.command.files().len(); "Running command");

    let config = config::load_config(args.config.as_deref())?;
    let host = compile_host(args.command.files())?;
    if host.has_errors() {
        report(out, &host.diagnostics, &host.sources, args.format, command, "Compile")?;
        return Ok(false);
    }

    match &args.command {
        Command::Check { .. } => check(out, host, config, args.format),
        Command::Extract { .. } => extract_snippets(out, host, &config, args.format),
        Command::Tests { .. } => list_tests(out, host, config, args.format),
    }
}

fn check(out: &mut dyn Write, host: Host, config: DocTestConfig, format: Format) -> Result<bool, CliError> {
    let Host { program, mut diagnostics, mut sources } = host;
    let result = DocsToTests::new(config).transform(&program)?;

    sources.extend(result.units.iter().map(|u| (u.id.clone(), u.text.clone())));
    diagnostics.extend(result.diagnostics);

    let ok = report(out, &diagnostics, &sources, format, "check", "Check")?;
    if ok && format == Format::Text {
        let detail = match result.status {
            Status::NoExamples => ": no examples".to_string(),
            _ => format!(": {} doc-test(s)", result.tagged.len()),
        };
        writeln!(out, "{}", output::banner_ok("Check", &detail))?;
    }
    Ok(ok)
}

#[derive(Serialize)]
struct ExtractReport<'a> {
    command: &'static str,
    namespaces: Vec<NamespaceSnippets<'a>>,
    anomalies: Vec<AnomalyReport>,
}

#[derive(Serialize)]
struct NamespaceSnippets<'a> {
    namespace: Option<&'a str>,
    snippets: &'a [String],
}

#[derive(Serialize)]
struct AnomalyReport {
    namespace: Option<String>,
    declaration: String,
    discarded: String,
}

fn extract_snippets(out: &mut dyn Write, host: Host, config: &DocTestConfig, format: Format) -> Result<bool, CliError> {
    let snippets = extract(&host.program, config);

    match format {
        Format::Json => {
            let report = ExtractReport {
                command: "extract",
                namespaces: snippets
                    .iter()
                    .map(|(namespace, snippets)| NamespaceSnippets { namespace, snippets })
                    .collect(),
                anomalies: snippets
                    .anomalies()
                    .iter()
                    .map(|a| AnomalyReport {
                        namespace: a.namespace.clone(),
                        declaration: a.declaration.to_string(),
                        discarded: a.discarded.clone(),
                    })
                    .collect(),
            };
            let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
            writeln!(out, "{}", json)?;
        }
        Format::Text => {
            for (namespace, texts) in snippets.iter() {
                let name = namespace.unwrap_or(config.default_namespace.as_str());
                writeln!(out, "{}", output::namespace_heading(name))?;
                for text in texts {
                    for line in text.trim_end().lines() {
                        writeln!(out, "    {}", line)?;
                    }
                    writeln!(out)?;
                }
            }
            if config.fence_policy == FencePolicy::Warn {
                let warnings: Vec<Diagnostic> = snippets.anomalies().iter().map(ToDiagnostic::to_diagnostic).collect();
                output::write_diagnostics(out, &warnings, &host.sources, format, "extract")?;
            }
            writeln!(out, "{}", output::dimmed(&format!("{} snippet(s)", snippets.len())))?;
        }
    }
    Ok(true)
}

#[derive(Serialize)]
struct TestsReport {
    command: &'static str,
    status: Status,
    tests: Vec<TestEntry>,
}

#[derive(Serialize)]
struct TestEntry {
    name: String,
    backends: Vec<String>,
}

fn list_tests(out: &mut dyn Write, host: Host, config: DocTestConfig, format: Format) -> Result<bool, CliError> {
    let Host { program, sources, .. } = host;
    let attribute = QualifiedName::from_path(&config.test_attribute);
    let result = DocsToTests::new(config).transform(&program)?;

    if !result.succeeded() {
        let mut sources = sources;
        sources.extend(result.units.iter().map(|u| (u.id.clone(), u.text.clone())));
        report(out, &result.diagnostics, &sources, format, "tests", "Tests")?;
        return Ok(false);
    }

    let tests: Vec<TestEntry> = result
        .tagged
        .iter()
        .map(|name| TestEntry { name: name.to_string(), backends: backends(&result.program, name, &attribute) })
        .collect();

    match format {
        Format::Json => {
            let report = TestsReport { command: "tests", status: result.status, tests };
            let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
            writeln!(out, "{}", json)?;
        }
        Format::Text => {
            for test in &tests {
                writeln!(out, "{} {} ({})", output::test_marker(), test.name, test.backends.join(", "))?;
            }
            writeln!(out, "{}", output::banner_ok("Tests", &format!(": {} found", tests.len())))?;
        }
    }
    Ok(true)
}

fn backends(program: &Program, name: &QualifiedName, attribute: &QualifiedName) -> Vec<String> {
    program
        .lookup(name)
        .and_then(|decl| decl.as_callable())
        .map(|c| {
            c.attributes
                .iter()
                .filter(|a| &a.name == attribute)
                .filter_map(|a| a.argument.clone())
                .collect()
        })
        .unwrap_or_default()
}

/// Print diagnostics, plus a failure banner in text mode. True when none are errors.
fn report(
    out: &mut dyn Write,
    diagnostics: &[Diagnostic],
    sources: &SourceCache,
    format: Format,
    command: &str,
    phase: &str,
) -> Result<bool, CliError> {
    output::write_diagnostics(out, diagnostics, sources, format, command)?;
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    if errors > 0 && format == Format::Text {
        writeln!(out, "{}", output::banner_fail(phase, errors))?;
    }
    Ok(errors == 0)
}
