// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source texts that diagnostics point into.

use std::collections::BTreeMap;

use vela_ast::SourceId;

/// Text of every unit that may appear in a diagnostic's `source`.
///
/// Primary files, reference headers and synthetic units all live here so a
/// renderer can show the offending line whatever produced it.
#[derive(Debug, Clone, Default)]
pub struct SourceCache {
    texts: BTreeMap<SourceId, String>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: SourceId, text: impl Into<String>) {
        self.texts.insert(id, text.into());
    }

    pub fn get(&self, id: &SourceId) -> Option<&str> {
        self.texts.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl<S: Into<String>> Extend<(SourceId, S)> for SourceCache {
    fn extend<I: IntoIterator<Item = (SourceId, S)>>(&mut self, iter: I) {
        for (id, text) in iter {
            self.insert(id, text);
        }
    }
}
