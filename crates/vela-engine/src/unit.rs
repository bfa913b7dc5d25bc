// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Inputs to a build.

use std::collections::BTreeMap;

use vela_ast::{Namespace, SourceId};

/// Program text registered with the engine under an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub id: SourceId,
    pub text: String,
}

impl SourceUnit {
    pub fn new(id: SourceId, text: impl Into<String>) -> Self {
        Self { id, text: text.into() }
    }
}

/// Header-only namespaces of referenced libraries, keyed by reference id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSet {
    entries: BTreeMap<SourceId, Vec<Namespace>>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single reference.
    pub fn single(id: SourceId, namespaces: Vec<Namespace>) -> Self {
        let mut set = Self::new();
        set.insert(id, namespaces);
        set
    }

    /// Add namespaces under `id`, after any already stored there.
    pub fn insert(&mut self, id: SourceId, namespaces: Vec<Namespace>) {
        self.entries.entry(id).or_default().extend(namespaces);
    }

    pub fn extend(&mut self, other: ReferenceSet) {
        for (id, namespaces) in other.entries {
            self.insert(id, namespaces);
        }
    }

    pub fn get(&self, id: &SourceId) -> Option<&[Namespace]> {
        self.entries.get(id).map(Vec::as_slice)
    }

    pub fn ids(&self) -> impl Iterator<Item = &SourceId> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SourceId, &[Namespace])> {
        self.entries.iter().map(|(id, nss)| (id, nss.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_appends_under_same_id() {
        let id = SourceId::reference("lib.vlib");
        let mut set = ReferenceSet::single(id.clone(), vec![Namespace::new("A")]);
        set.insert(id.clone(), vec![Namespace::new("B")]);
        assert_eq!(set.len(), 1);
        let names: Vec<_> = set.get(&id).unwrap().iter().map(|ns| ns.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
