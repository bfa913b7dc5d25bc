// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Machine-readable diagnostics (`--format json`).
//!
//! Locations are resolved against the cached text of the unit a
//! diagnostic points into; the source line is included when available.

use serde::Serialize;
use vela_ast::{LineMap, SourceId};

use crate::{codes::ErrorCodeRegistry, Diagnostic, LabelStyle, Severity, SourceCache};

/// Everything one `vela` command reported.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    /// Bumped when fields change meaning.
    pub version: u32,
    pub command: String,
    /// No diagnostic is an error.
    pub success: bool,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Registry category of `code`, such as "DocTest".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    /// The unit the diagnostic points into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceId>,
    /// Where the primary label starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
    pub source_line: String,
}

#[derive(Debug, Serialize)]
pub struct JsonLabel {
    pub role: LabelStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub start: LineCol,
    pub end: LineCol,
}

/// 1-based position, plus the raw offset it came from.
#[derive(Debug, Serialize)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
}

pub fn to_json_report(diagnostics: &[Diagnostic], sources: &SourceCache, command: &str) -> DiagnosticReport {
    let registry = ErrorCodeRegistry::default();
    let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();
    let error_count = count(Severity::Error);

    DiagnosticReport {
        version: 1,
        command: command.to_string(),
        success: error_count == 0,
        diagnostics: diagnostics.iter().map(|d| to_json_diagnostic(d, sources, &registry)).collect(),
        error_count,
        warning_count: count(Severity::Warning),
    }
}

fn to_json_diagnostic(diag: &Diagnostic, sources: &SourceCache, registry: &ErrorCodeRegistry) -> JsonDiagnostic {
    let code = diag.code_str().map(str::to_string);
    let category = diag.code_str().and_then(|c| registry.get(c)).map(|info| info.category.to_string());

    // Without the unit's text there is nothing to resolve spans against
    let text = diag.source.as_ref().and_then(|id| sources.get(id));
    let line_map = text.map(LineMap::new);
    let locate = |offset: usize| -> Option<(usize, usize)> {
        let map = line_map.as_ref()?;
        let (line, col) = map.offset_to_line_col(offset);
        Some((line as usize, col as usize))
    };

    let location = diag.primary_span().and_then(|span| {
        let (line, column) = locate(span.start)?;
        let source_line = match (&line_map, text) {
            (Some(map), Some(text)) => map.line_text(text, line as u32).unwrap_or("").to_string(),
            _ => String::new(),
        };
        Some(SourceLocation { line, column, byte_offset: span.start, source_line })
    });

    let labels = diag
        .labels
        .iter()
        .map(|l| {
            let (start_line, start_col) = locate(l.span.start).unwrap_or((0, 0));
            let (end_line, end_col) = locate(l.span.end).unwrap_or((0, 0));
            JsonLabel {
                role: l.style,
                message: l.message.clone(),
                start: LineCol { line: start_line, column: start_col, byte_offset: l.span.start },
                end: LineCol { line: end_line, column: end_col, byte_offset: l.span.end },
            }
        })
        .collect();

    JsonDiagnostic {
        severity: diag.severity,
        code,
        category,
        message: diag.message.clone(),
        source: diag.source.clone(),
        location,
        labels,
        notes: diag.notes.clone(),
        help: diag.help.clone(),
    }
}

/// Pretty JSON; serialization failure is reported inside the JSON itself.
pub fn to_json_string(report: &DiagnosticReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ast::Span;

    #[test]
    fn report_counts_and_locates() {
        let id = SourceId::synthetic("Demo.doctest.vl");
        let mut sources = SourceCache::new();
        sources.insert(id.clone(), "namespace Demo {\n    Oops();\n}\n");

        let diags = vec![
            Diagnostic::error("unresolved identifier `Oops`")
                .with_code("E0200")
                .with_source(id.clone())
                .with_primary(Span::new(21, 25), "not found"),
            Diagnostic::warning("unused binding"),
        ];

        let report = to_json_report(&diags, &sources, "check");
        assert!(!report.success);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.warning_count, 1);

        let first = &report.diagnostics[0];
        assert_eq!(first.category.as_deref(), Some("Resolution"));
        let location = first.location.as_ref().unwrap();
        assert_eq!((location.line, location.column), (2, 5));
        assert_eq!(location.source_line, "    Oops();");
        assert!(report.diagnostics[1].location.is_none());

        let json: serde_json::Value = serde_json::from_str(&to_json_string(&report)).unwrap();
        assert_eq!(json["diagnostics"][0]["severity"], "error");
        assert_eq!(json["diagnostics"][0]["source"]["role"], "synthetic");
        assert_eq!(json["diagnostics"][0]["labels"][0]["role"], "primary");
    }
}
