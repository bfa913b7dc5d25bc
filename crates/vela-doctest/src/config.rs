// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Settings for the doc-test rewrite.

use serde::Deserialize;
use vela_ast::{Attribute, QualifiedName};

use crate::error::DocTestError;

/// Namespace for examples written on declarations outside any namespace.
pub const DEFAULT_NAMESPACE: &str = "Vela.DocTests";

/// Attribute that marks a callable as a test for one backend.
pub const TEST_ATTRIBUTE: &str = "Std.Diagnostics.Test";

/// What to do with a code fence that is opened but never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FencePolicy {
    /// Drop the trailing text.
    #[default]
    Truncate,
    /// Drop the trailing text and report a warning.
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocTestConfig {
    /// Namespace that receives examples from the global namespace.
    pub default_namespace: String,
    /// Namespaces opened for every example, when the host program has them.
    pub opened_namespaces: Vec<String>,
    /// Backends each generated test is tagged for.
    pub backends: Vec<String>,
    /// Fully qualified name of the test attribute.
    pub test_attribute: String,
    pub fence_policy: FencePolicy,
    /// Also scan declarations that came from referenced libraries.
    pub scan_references: bool,
}

impl Default for DocTestConfig {
    fn default() -> Self {
        Self {
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            opened_namespaces: ["Std.Core", "Std.Intrinsic", "Std.Diagnostics", "Std.Canon", "Std.Arrays"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            backends: vec!["Simulator".to_string(), "ResourcesEstimator".to_string()],
            test_attribute: TEST_ATTRIBUTE.to_string(),
            fence_policy: FencePolicy::Truncate,
            scan_references: false,
        }
    }
}

impl DocTestConfig {
    /// Reject settings that would generate uncompilable source or unnamed attributes.
    pub fn validate(&self) -> Result<(), DocTestError> {
        if !is_qualified_ident(&self.default_namespace) {
            return Err(DocTestError::InvalidConfig {
                field: "default_namespace",
                reason: format!("`{}` is not a namespace name", self.default_namespace),
            });
        }
        if let Some(bad) = self.opened_namespaces.iter().find(|ns| !is_qualified_ident(ns)) {
            return Err(DocTestError::InvalidConfig {
                field: "opened_namespaces",
                reason: format!("`{}` is not a namespace name", bad),
            });
        }
        if !is_qualified_ident(&self.test_attribute) || !self.test_attribute.contains('.') {
            return Err(DocTestError::InvalidConfig {
                field: "test_attribute",
                reason: format!("`{}` is not a fully qualified name", self.test_attribute),
            });
        }
        Ok(())
    }

    /// One test attribute per configured backend.
    pub fn test_attributes(&self) -> Vec<Attribute> {
        let name = QualifiedName::from_path(&self.test_attribute);
        self.backends
            .iter()
            .map(|backend| Attribute::new(name.clone(), Some(backend.clone())))
            .collect()
    }
}

fn is_qualified_ident(path: &str) -> bool {
    !path.is_empty()
        && path.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DocTestConfig::default();
        assert_eq!(config.default_namespace, "Vela.DocTests");
        assert_eq!(config.opened_namespaces.len(), 5);
        assert_eq!(config.backends, vec!["Simulator", "ResourcesEstimator"]);
        assert_eq!(config.fence_policy, FencePolicy::Truncate);
        assert!(!config.scan_references);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_settings_keep_defaults() {
        let config: DocTestConfig =
            serde_json::from_str(r#"{ "backends": ["Simulator"], "fence_policy": "warn" }"#).unwrap();
        assert_eq!(config.backends, vec!["Simulator"]);
        assert_eq!(config.fence_policy, FencePolicy::Warn);
        assert_eq!(config.default_namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<DocTestConfig, _> = serde_json::from_str(r#"{ "backend": "Simulator" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_attributes_follow_backends() {
        let attrs = DocTestConfig::default().test_attributes();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name, QualifiedName::new("Std.Diagnostics", "Test"));
        assert_eq!(attrs[1].argument.as_deref(), Some("ResourcesEstimator"));
    }

    #[test]
    fn validation() {
        let bad_ns = DocTestConfig { default_namespace: "Doc Tests".to_string(), ..Default::default() };
        assert!(matches!(
            bad_ns.validate(),
            Err(DocTestError::InvalidConfig { field: "default_namespace", .. })
        ));

        let unqualified = DocTestConfig { test_attribute: "Test".to_string(), ..Default::default() };
        assert!(unqualified.validate().is_err());

        let bad_open = DocTestConfig { opened_namespaces: vec!["Std..Core".to_string()], ..Default::default() };
        assert!(bad_open.validate().is_err());
    }
}
