// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the Vela language.
//!
//! Transforms a token stream into namespace blocks of declarations. Every
//! declaration is attributed to the [`vela_ast::SourceId`] the parser was
//! created with.

mod hints;
mod parser;

pub use parser::{ParseError, ParseResult, Parser};
