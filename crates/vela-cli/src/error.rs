// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use vela_doctest::DocTestError;
use vela_engine::EngineError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("missing configuration file: {}", .0.display())]
    MissingConfig(PathBuf),

    #[error("failed to parse TOML configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    DocTest(#[from] DocTestError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}
