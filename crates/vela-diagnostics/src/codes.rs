// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Diagnostic code registry.
//!
//! Titles and categories for codes like E0001 or W0100.

use std::fmt;

/// Every code the toolchain emits.
const CODES: &[ErrorCodeInfo] = &[
    ErrorCodeInfo::new("E0001", "unexpected character", ErrorCategory::Syntax),
    ErrorCodeInfo::new("E0100", "unexpected token", ErrorCategory::Syntax),
    ErrorCodeInfo::new("E0200", "unresolved identifier", ErrorCategory::Resolution),
    ErrorCodeInfo::new("E0201", "duplicate definition", ErrorCategory::Resolution),
    ErrorCodeInfo::new("E0202", "specialization of unknown callable", ErrorCategory::Resolution),
    ErrorCodeInfo::new("E0203", "unknown type", ErrorCategory::Resolution),
    ErrorCodeInfo::new("E0207", "unknown namespace", ErrorCategory::Resolution),
    ErrorCodeInfo::new("E0300", "arity mismatch", ErrorCategory::Semantic),
    ErrorCodeInfo::new("E0301", "assignment to immutable binding", ErrorCategory::Semantic),
    ErrorCodeInfo::new("E0302", "specialization of a function", ErrorCategory::Semantic),
    ErrorCodeInfo::new("W0001", "unused binding", ErrorCategory::Lint),
    ErrorCodeInfo::new("W0100", "unterminated example fence", ErrorCategory::DocTest),
];

/// Lookup over the known codes.
#[derive(Default)]
pub struct ErrorCodeRegistry {
    _private: (),
}

#[derive(Debug)]
pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
}

impl ErrorCodeInfo {
    const fn new(code: &'static str, title: &'static str, category: ErrorCategory) -> Self {
        Self { code, title, category }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Resolution,
    Semantic,
    Lint,
    DocTest,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl ErrorCodeRegistry {
    pub fn get(&self, code: &str) -> Option<&'static ErrorCodeInfo> {
        CODES.iter().find(|info| info.code == code)
    }

    pub fn all(&self) -> impl Iterator<Item = &'static ErrorCodeInfo> {
        CODES.iter()
    }
}
