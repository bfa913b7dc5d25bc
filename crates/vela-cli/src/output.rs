// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI output formatting with colors and styling.
//!
//! Respects NO_COLOR and FORCE_COLOR environment variables.
//! Colors are automatically disabled when output is piped.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use vela_diagnostics::{formatter, json, Diagnostic, SourceCache};

use crate::args::Format;

/// Initialize color support based on environment.
/// Call once at startup.
pub fn init() {
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

pub fn banner_ok(phase: &str, detail: &str) -> String {
    format!(
        "{} {} {}",
        "===".dimmed(),
        format!("{} OK{}", phase, detail).green().bold(),
        "===".dimmed()
    )
}

pub fn banner_fail(phase: &str, count: usize) -> String {
    let msg = if count == 1 {
        format!("{} FAILED: 1 error", phase)
    } else {
        format!("{} FAILED: {} errors", phase, count)
    };
    format!("{} {} {}", "===".dimmed(), msg.red().bold(), "===".dimmed())
}

pub fn namespace_heading(name: &str) -> ColoredString {
    name.cyan().bold()
}

pub fn test_marker() -> ColoredString {
    "✓".green()
}

pub fn dimmed(text: &str) -> ColoredString {
    text.dimmed()
}

/// Print diagnostics in the requested format.
///
/// Text goes out one rendered diagnostic after another; JSON is a single
/// report for the whole command.
pub fn write_diagnostics(
    out: &mut dyn Write,
    diagnostics: &[Diagnostic],
    sources: &SourceCache,
    format: Format,
    command: &str,
) -> io::Result<()> {
    match format {
        Format::Text => {
            for diagnostic in diagnostics {
                writeln!(out, "{}", formatter::render(diagnostic, sources))?;
            }
            Ok(())
        }
        Format::Json => {
            let report = json::to_json_report(diagnostics, sources, command);
            writeln!(out, "{}", json::to_json_string(&report))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ast::SourceId;

    #[test]
    fn banners() {
        colored::control::set_override(false);
        assert_eq!(banner_ok("Check", ": 2 tests"), "=== Check OK: 2 tests ===");
        assert_eq!(banner_fail("Check", 1), "=== Check FAILED: 1 error ===");
        assert_eq!(banner_fail("Check", 3), "=== Check FAILED: 3 errors ===");
    }

    #[test]
    fn json_is_one_report() {
        let diags = vec![
            Diagnostic::error("boom").with_source(SourceId::primary("a.vl")),
            Diagnostic::warning("careful"),
        ];
        let mut out = Vec::new();
        write_diagnostics(&mut out, &diags, &SourceCache::new(), Format::Json, "check").unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["command"], "check");
        assert_eq!(value["error_count"], 1);
        assert_eq!(value["warning_count"], 1);
    }
}
