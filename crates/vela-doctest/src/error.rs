// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Fatal doc-test errors.

use thiserror::Error;
use vela_engine::EngineError;

/// Failures that stop the rewrite.
///
/// Examples that do not compile are reported as diagnostics in the
/// transformation result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocTestError {
    #[error("satellite build rejected by the engine: {0}")]
    Engine(#[from] EngineError),

    #[error("invalid doc-test setting `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}
