// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for the Vela language.
//!
//! Tokenizes source code into a stream of tokens for the parser. Doc
//! comments (`///`) are kept as tokens; plain comments are dropped.

mod lexer;

pub use lexer::{LexError, LexResult, Lexer};
