// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Identifiers for the unit a declaration originates from.

use std::fmt;

/// Where a declaration was compiled from.
///
/// Only the role matters to the compiler passes: primary sources are the
/// user's own files, references are header-only declarations that can be
/// linked against, and synthetic units are generated by a rewrite step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "role", content = "name", rename_all = "lowercase"))]
pub enum SourceId {
    Primary(String),
    Reference(String),
    Synthetic(String),
}

impl SourceId {
    pub fn primary(path: impl Into<String>) -> Self {
        SourceId::Primary(path.into())
    }

    pub fn reference(path: impl Into<String>) -> Self {
        SourceId::Reference(path.into())
    }

    pub fn synthetic(name: impl Into<String>) -> Self {
        SourceId::Synthetic(name.into())
    }

    /// The path or unit name, without its role.
    pub fn name(&self) -> &str {
        match self {
            SourceId::Primary(n) | SourceId::Reference(n) | SourceId::Synthetic(n) => n,
        }
    }

    /// The same unit, re-tagged as a linkable reference.
    pub fn as_reference(&self) -> SourceId {
        SourceId::Reference(self.name().to_string())
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, SourceId::Primary(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, SourceId::Reference(_))
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, SourceId::Synthetic(_))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Primary(path) => write!(f, "{}", path),
            SourceId::Reference(path) => write!(f, "{} (reference)", path),
            SourceId::Synthetic(name) => write!(f, "<{}>", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_keeps_name() {
        let id = SourceId::primary("src/math.vl");
        let r = id.as_reference();
        assert!(r.is_reference());
        assert_eq!(r.name(), "src/math.vl");
        assert_ne!(id, r);
    }

    #[test]
    fn display_marks_role() {
        assert_eq!(SourceId::primary("a.vl").to_string(), "a.vl");
        assert_eq!(SourceId::reference("a.vl").to_string(), "a.vl (reference)");
        assert_eq!(SourceId::synthetic("A.doctest.vl").to_string(), "<A.doctest.vl>");
    }
}
