// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Wrap extracted snippets into compilable source units.

use indexmap::IndexMap;
use log::debug;
use vela_ast::{Program, SourceId};
use vela_engine::SourceUnit;

use crate::config::DocTestConfig;
use crate::extract::Snippets;

/// Id of the generated unit for `namespace`.
pub fn synthetic_id(namespace: &str) -> SourceId {
    SourceId::synthetic(format!("{}.doctest.vl", namespace))
}

/// One unit per namespace that has a non-blank snippet.
///
/// Snippets from the global namespace go to the configured default
/// namespace, after any snippets already collected under that name.
pub fn build_units(snippets: &Snippets, host: &Program, config: &DocTestConfig) -> Vec<SourceUnit> {
    let opens: Vec<&str> = config
        .opened_namespaces
        .iter()
        .map(String::as_str)
        .filter(|ns| host.contains_namespace(ns))
        .collect();

    let mut grouped: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for (namespace, texts) in snippets.iter() {
        let name = namespace.unwrap_or(config.default_namespace.as_str());
        let entry = grouped.entry(name).or_default();
        entry.extend(texts.iter().map(String::as_str).filter(|s| !s.trim().is_empty()));
    }

    grouped
        .into_iter()
        .filter(|(_, texts)| !texts.is_empty())
        .map(|(name, texts)| {
            let unit = SourceUnit::new(synthetic_id(name), wrap(name, &opens, &texts));
            debug!(unit = unit.id.name(), snippets = texts.len(); "Generated doc-test unit");
            unit
        })
        .collect()
}

/// `namespace <name> {`, the opens, each snippet verbatim, `}`.
pub fn wrap(namespace: &str, opens: &[&str], snippets: &[&str]) -> String {
    let mut lines = Vec::with_capacity(opens.len() + snippets.len() + 2);
    lines.push(format!("namespace {} {{", namespace));
    lines.extend(opens.iter().map(|ns| format!("open {};", ns)));
    lines.extend(snippets.iter().map(|s| s.to_string()));
    lines.push("}".to_string());
    lines.join("\n")
}
