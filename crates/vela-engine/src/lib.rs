// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Incremental compilation engine for Vela.
//!
//! A [`CompilationUnitManager`] holds source units and a [`ReferenceSet`] of
//! header-only namespaces from other libraries. `build` parses what changed,
//! assembles one [`vela_ast::Program`] and checks the compiled declarations
//! against everything visible to them.

mod assemble;
pub mod checker;
mod engine;
mod error;
mod scope;
pub mod stdlib;
mod unit;

pub use assemble::namespaces_from_blocks;
pub use checker::{CheckError, CheckErrorKind};
pub use engine::{BuildOutput, CompilationEngine, CompilationUnitManager};
pub use error::EngineError;
pub use unit::{ReferenceSet, SourceUnit};
