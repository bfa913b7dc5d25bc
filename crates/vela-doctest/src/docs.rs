// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Sections of a documentation comment.
//!
//! ```text
//! /// Flips a qubit.
//! ///
//! /// # Example
//! /// ```vela
//! /// ...
//! /// ```
//! ```
//!
//! Lines before the first heading are the summary. A heading line inside a
//! code fence is ordinary text.

use vela_ast::DocBlock;

const FENCE: &str = "```";

/// One `# Heading` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub title: &'a str,
    pub lines: Vec<&'a str>,
}

impl Section<'_> {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A parsed view over a [`DocBlock`].
#[derive(Debug, Clone)]
pub struct DocComment<'a> {
    summary: Vec<&'a str>,
    sections: Vec<Section<'a>>,
}

impl<'a> DocComment<'a> {
    pub fn new(doc: &'a DocBlock) -> Self {
        let mut summary = Vec::new();
        let mut sections: Vec<Section<'a>> = Vec::new();
        let mut in_fence = false;

        for line in &doc.lines {
            let line = line.as_str();
            if !in_fence {
                if let Some(title) = heading(line) {
                    sections.push(Section { title, lines: Vec::new() });
                    continue;
                }
            }
            // A fence opened and closed on the same line leaves the state alone
            if line.matches(FENCE).count() % 2 == 1 {
                in_fence = !in_fence;
            }
            match sections.last_mut() {
                Some(section) => section.lines.push(line),
                None => summary.push(line),
            }
        }

        Self { summary, sections }
    }

    /// Text before the first heading.
    pub fn summary(&self) -> String {
        self.summary.join("\n").trim().to_string()
    }

    pub fn sections(&self) -> &[Section<'a>] {
        &self.sections
    }

    pub fn section(&self, title: &str) -> Option<&Section<'a>> {
        self.sections.iter().find(|s| s.title.eq_ignore_ascii_case(title))
    }

    /// The `# Example` (or `# Examples`) section, or an empty string.
    pub fn example(&self) -> String {
        self.section("Example")
            .or_else(|| self.section("Examples"))
            .map(Section::text)
            .unwrap_or_default()
    }
}

/// `# Title` → `Title`. Deeper headings belong to the enclosing section.
fn heading(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('#')?;
    if rest.starts_with('#') {
        return None;
    }
    let title = rest.trim();
    (!title.is_empty() && rest.starts_with(char::is_whitespace)).then_some(title)
}
