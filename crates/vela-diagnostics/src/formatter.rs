// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Rich terminal formatter for diagnostics.
//!
//! ```text
//! error[E0300]: `Add` expects 2 arguments, found 1
//!   --> <Demo.doctest.vl>:4:9
//!    |
//!  4 |     let sum = Add(1);
//!    |               ^^^^^^ called with 1 argument
//!    |
//!    = help: `Demo.Add` is declared as `function Add(a : Int, b : Int) : Int`
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use colored::{ColoredString, Colorize};

use vela_ast::LineMap;

use crate::{Diagnostic, LabelStyle, Severity, SourceCache};

/// Formats diagnostics for terminal output.
pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
    lines: LineMap,
}

/// One underline on an excerpt line; columns are 1-based, `end` exclusive.
struct Marker<'d> {
    start: usize,
    end: usize,
    style: LabelStyle,
    message: Option<&'d str>,
}

struct ExcerptLine<'s, 'd> {
    number: usize,
    text: &'s str,
    markers: Vec<Marker<'d>>,
}

/// Left margin shared by every line of one rendered diagnostic.
#[derive(Clone, Copy)]
struct Gutter(usize);

impl Gutter {
    fn blank(self) -> String {
        " ".repeat(self.0 + 1)
    }

    fn bar(self) -> String {
        format!("{} {}", self.blank(), "|".blue())
    }
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            file_name: None,
            lines: LineMap::new(source),
        }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = header(diagnostic);
        let excerpt = self.excerpt(diagnostic);

        if let (Some(label), false) = (diagnostic.labels.first(), excerpt.is_empty()) {
            let (line, col) = self.lines.offset_to_line_col(label.span.start);
            let _ = writeln!(
                out,
                "  {} {}:{}:{}",
                "-->".blue(),
                self.file_name.unwrap_or("<source>"),
                line,
                col
            );

            let widest = excerpt.last().map_or(1, |l| l.number);
            let gutter = Gutter(widest.to_string().len().max(2));
            let _ = writeln!(out, "{}", gutter.bar());

            let mut previous = None;
            for line in &excerpt {
                if previous.is_some_and(|p: usize| line.number > p + 1) {
                    let _ = writeln!(out, "{} {}", " ".repeat(gutter.0), "...".blue());
                }
                let _ = writeln!(
                    out,
                    "{:>w$} {} {}",
                    line.number.to_string().blue().bold(),
                    "|".blue(),
                    line.text,
                    w = gutter.0 + 1,
                );
                underline(&mut out, line, gutter);
                previous = Some(line.number);
            }
        }

        out.push_str(&footer(diagnostic));
        out
    }

    /// Labels grouped by the line they start on, in line order.
    fn excerpt<'d>(&self, diagnostic: &'d Diagnostic) -> Vec<ExcerptLine<'a, 'd>> {
        let mut by_line: BTreeMap<usize, ExcerptLine<'a, 'd>> = BTreeMap::new();

        for label in diagnostic.labels.iter().filter(|l| l.span.start <= self.source.len()) {
            let (line, start) = self.lines.offset_to_line_col(label.span.start);
            let (end_line, end) = self.lines.offset_to_line_col(label.span.end.min(self.source.len()));
            let text = self.lines.line_text(self.source, line).unwrap_or("");
            // A span running past its first line is underlined to the end of that line.
            let end = if end_line == line { end as usize } else { text.len() + 1 };
            let start = start as usize;

            by_line
                .entry(line as usize)
                .or_insert_with(|| ExcerptLine { number: line as usize, text, markers: Vec::new() })
                .markers
                .push(Marker {
                    start,
                    end: end.max(start + 1),
                    style: label.style,
                    message: label.message.as_deref(),
                });
        }

        by_line.into_values().collect()
    }
}

/// Render a diagnostic against whichever unit it points into.
///
/// Diagnostics without a known source (or whose text is not cached) are
/// rendered without a code excerpt.
pub fn render(diagnostic: &Diagnostic, sources: &SourceCache) -> String {
    let cached = diagnostic
        .source
        .as_ref()
        .and_then(|id| sources.get(id).map(|text| (id.to_string(), text)));
    if let Some((name, text)) = cached {
        return DiagnosticFormatter::new(text).with_file_name(&name).format(diagnostic);
    }

    let mut out = header(diagnostic);
    if let Some(id) = &diagnostic.source {
        let _ = writeln!(out, "  {} {}", "-->".blue(), id);
    }
    out.push_str(&footer(diagnostic));
    out
}

fn header(diagnostic: &Diagnostic) -> String {
    let severity = match diagnostic.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Note => "note".blue().bold(),
    };
    let message = diagnostic.message.bold();
    match &diagnostic.code {
        Some(code) => format!("{}[{}]: {}\n", severity, code.0.as_str().red().bold(), message),
        None => format!("{}: {}\n", severity, message),
    }
}

fn footer(diagnostic: &Diagnostic) -> String {
    let pad = Gutter(2).blank();
    let notes = diagnostic.notes.iter().map(|n| ("note", n.as_str()));
    let help = diagnostic.help.iter().map(|h| ("help", h.as_str()));

    notes
        .chain(help)
        .map(|(kind, text)| format!("{} {} {}: {}\n", pad, "=".cyan(), kind.cyan().bold(), text))
        .collect()
}

/// Write the `^^^`/`---` row for a line, with messages hung underneath
/// when more than one marker carries one.
fn underline(out: &mut String, line: &ExcerptLine<'_, '_>, gutter: Gutter) {
    let mut markers: Vec<&Marker<'_>> = line.markers.iter().collect();
    markers.sort_by_key(|m| (m.style != LabelStyle::Primary, m.start));

    let width = line.text.len() + 10;
    let mut row = vec![' '; width];
    for marker in &markers {
        let glyph = glyph(marker.style);
        let last = marker.end.saturating_sub(1).min(width);
        for cell in row.iter_mut().take(last).skip(marker.start.saturating_sub(1)) {
            *cell = glyph;
        }
    }

    let row: String = row.into_iter().collect();
    let row = row.trim_end();
    if row.is_empty() {
        return;
    }

    let messages: Vec<(usize, LabelStyle, &str)> = markers
        .iter()
        .filter_map(|m| m.message.map(|msg| (m.end.saturating_sub(1), m.style, msg)))
        .collect();

    match messages.as_slice() {
        [] => {
            let _ = writeln!(out, "{} {}", gutter.bar(), paint_row(row));
            return;
        }
        [(_, style, msg)] => {
            let _ = writeln!(out, "{} {} {}", gutter.bar(), paint_row(row), tint(*style, msg));
            return;
        }
        _ => {
            let _ = writeln!(out, "{} {}", gutter.bar(), paint_row(row));
        }
    }
    for (col, style, msg) in messages.iter().rev() {
        let _ = writeln!(
            out,
            "{} {}{} {}",
            gutter.bar(),
            " ".repeat(col.saturating_sub(1)),
            tint(*style, "|"),
            tint(*style, msg),
        );
    }
}

fn glyph(style: LabelStyle) -> char {
    match style {
        LabelStyle::Primary => '^',
        LabelStyle::Secondary => '-',
    }
}

fn tint(style: LabelStyle, text: &str) -> ColoredString {
    match style {
        LabelStyle::Primary => text.red().bold(),
        LabelStyle::Secondary => text.blue(),
    }
}

/// Color each run of underline glyphs by the style it marks.
fn paint_row(row: &str) -> String {
    let mut painted = String::new();
    let mut rest = row;
    while let Some(first) = rest.chars().next() {
        let run_len = rest.find(|c| c != first).unwrap_or(rest.len());
        let (run, tail) = rest.split_at(run_len);
        let _ = match first {
            '^' => write!(painted, "{}", tint(LabelStyle::Primary, run)),
            '-' => write!(painted, "{}", tint(LabelStyle::Secondary, run)),
            _ => write!(painted, "{}", run),
        };
        rest = tail;
    }
    painted
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ast::{SourceId, Span};

    #[test]
    fn excerpt_points_at_label() {
        colored::control::set_override(false);
        let source = "namespace A {\n    function F() : Unit { G(); }\n}\n";
        let start = source.find("G()").unwrap();
        let diag = Diagnostic::error("unresolved identifier `G`")
            .with_code("E0200")
            .with_primary(Span::new(start, start + 1), "not found");

        let out = DiagnosticFormatter::new(source).with_file_name("a.vl").format(&diag);
        assert!(out.starts_with("error[E0200]: unresolved identifier `G`"));
        assert!(out.contains("--> a.vl:2:27"), "{}", out);
        assert!(out.contains("function F() : Unit { G(); }"));
        assert!(out.contains("^ not found"));
    }

    #[test]
    fn messages_hang_below_shared_line() {
        colored::control::set_override(false);
        let source = "let x = Add(a, b);\n";
        let call = source.find("Add").unwrap();
        let arg = source.find('b').unwrap();
        let diag = Diagnostic::error("type mismatch")
            .with_primary(Span::new(arg, arg + 1), "expected Int")
            .with_secondary(Span::new(call, call + 3), "in this call");

        let out = DiagnosticFormatter::new(source).format(&diag);
        assert!(out.contains("--> <source>:1:16"), "{}", out);
        assert!(out.contains("---"), "{}", out);
        let expected = out.find("| expected Int").unwrap();
        let call_note = out.find("| in this call").unwrap();
        assert!(call_note < expected, "{}", out);
    }

    #[test]
    fn render_without_cached_text() {
        colored::control::set_override(false);
        let diag = Diagnostic::warning("example fence is never closed")
            .with_code("W0100")
            .with_source(SourceId::primary("lib.vl"))
            .with_help("add a closing fence");
        let out = render(&diag, &SourceCache::new());
        assert!(out.starts_with("warning[W0100]"));
        assert!(out.contains("--> lib.vl"));
        assert!(out.contains("help: add a closing fence"));
    }
}
