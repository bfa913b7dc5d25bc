// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Command-line argument definitions for the `vela` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Compile Vela documentation examples as tests
#[derive(Parser, Debug)]
#[command(name = "vela", author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    pub format: Format,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compile the files and their documentation examples
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the example snippets found in doc comments
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the tests generated from doc comments
    Tests {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Check { .. } => "check",
            Command::Extract { .. } => "extract",
            Command::Tests { .. } => "tests",
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        match self {
            Command::Check { files } | Command::Extract { files } | Command::Tests { files } => files,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_options_after_subcommand() {
        let args = Args::try_parse_from(["vela", "check", "a.vl", "b.vl", "--format", "json"]).unwrap();
        assert_eq!(args.format, Format::Json);
        assert_eq!(args.command.name(), "check");
        assert_eq!(args.command.files().len(), 2);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn files_are_required() {
        assert!(Args::try_parse_from(["vela", "tests"]).is_err());
    }
}
