// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Engine contract violations.

use thiserror::Error;
use vela_ast::SourceId;

/// A misuse of the engine by its caller.
///
/// Problems in the compiled code are diagnostics, never `EngineError`s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("`{id}` cannot be compiled as a source unit")]
    InvalidUnitId { id: SourceId },

    #[error("reference `{id}` has the same name as a compiled unit")]
    DuplicateReference { id: SourceId },

    #[error("`{id}` is not a reference id")]
    NotAReference { id: SourceId },
}
