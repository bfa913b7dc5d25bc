// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Extract example snippets from documentation comments.
//!
//! Every type, callable and specialization is visited with the name of its
//! namespace; bodies are never entered. The `Example` section of each doc
//! comment is scanned for fenced code:
//!
//! ```text
//! before ```vela code ``` after
//! ```
//!
//! The token right after an opening fence is a language tag and is skipped
//! together with the one whitespace character ending it. A fence that is
//! never closed ends the scan; its text is not a snippet.

use indexmap::IndexMap;
use log::debug;
use vela_ast::{Declaration, Program, QualifiedName};
use vela_diagnostics::{Diagnostic, ToDiagnostic};

use crate::config::DocTestConfig;
use crate::docs::DocComment;

const FENCE: &str = "```";

/// Snippets grouped by namespace, in discovery order.
///
/// `None` is the global namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snippets {
    groups: IndexMap<Option<String>, Vec<String>>,
    anomalies: Vec<ExtractionAnomaly>,
}

impl Snippets {
    pub fn push(&mut self, namespace: Option<&str>, snippet: impl Into<String>) {
        self.groups
            .entry(namespace.map(str::to_string))
            .or_default()
            .push(snippet.into());
    }

    pub fn get(&self, namespace: Option<&str>) -> Option<&[String]> {
        self.groups
            .get(&namespace.map(str::to_string))
            .map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &[String])> {
        self.groups.iter().map(|(ns, snippets)| (ns.as_deref(), snippets.as_slice()))
    }

    /// Number of snippets across all namespaces.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn anomalies(&self) -> &[ExtractionAnomaly] {
        &self.anomalies
    }
}

/// An example fence that was opened and never closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionAnomaly {
    pub namespace: Option<String>,
    /// The documented declaration.
    pub declaration: QualifiedName,
    /// Everything after the opening fence.
    pub discarded: String,
}

impl ToDiagnostic for ExtractionAnomaly {
    fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::warning(format!(
            "unterminated code fence in the example of `{}`",
            self.declaration
        ))
        .with_code("W0100")
        .with_help("close the example with ``` on its own line");

        let discarded = self.discarded.trim();
        if !discarded.is_empty() {
            diag = diag.with_note(format!("ignored: {}", first_line(discarded)));
        }
        diag
    }
}

/// The snippets of one example, plus the text of an unclosed trailing fence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FenceScan<'a> {
    pub snippets: Vec<&'a str>,
    pub unterminated: Option<&'a str>,
}

/// Split example text into fenced snippets.
pub fn scan_fences(text: &str) -> FenceScan<'_> {
    let mut scan = FenceScan::default();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_marker = &rest[open + FENCE.len()..];
        let body = skip_one_whitespace(skip_token(after_marker));
        match body.find(FENCE) {
            Some(close) => {
                scan.snippets.push(&body[..close]);
                rest = skip_token(&body[close + FENCE.len()..]);
            }
            None => {
                scan.unterminated = Some(after_marker);
                break;
            }
        }
    }
    scan
}

/// Collect every example snippet in `program`.
pub fn extract(program: &Program, config: &DocTestConfig) -> Snippets {
    let mut snippets = Snippets::default();

    for ns in &program.namespaces {
        let key = (!ns.is_global()).then_some(ns.name.as_str());
        let before = snippets.len();
        for decl in &ns.declarations {
            if decl.source().is_primary() || config.scan_references {
                scan_declaration(key, decl, &mut snippets);
            }
        }
        let found = snippets.len() - before;
        if found > 0 {
            debug!(namespace = ns.name.as_str(), snippets = found; "Extracted examples");
        }
    }

    snippets
}

fn scan_declaration(namespace: Option<&str>, decl: &Declaration, snippets: &mut Snippets) {
    let doc = decl.doc();
    if doc.is_empty() {
        return;
    }
    let example = DocComment::new(doc).example();
    let scan = scan_fences(&example);

    for snippet in scan.snippets {
        snippets.push(namespace, snippet);
    }
    if let Some(discarded) = scan.unterminated {
        snippets.anomalies.push(ExtractionAnomaly {
            namespace: namespace.map(str::to_string),
            declaration: decl.name().clone(),
            discarded: discarded.to_string(),
        });
    }
}

fn skip_token(s: &str) -> &str {
    s.trim_start_matches(|c: char| !c.is_whitespace())
}

fn skip_one_whitespace(s: &str) -> &str {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str(),
        _ => s,
    }
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or(s)
}
