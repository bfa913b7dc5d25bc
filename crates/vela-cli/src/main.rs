// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Vela CLI entry point.

use std::io;
use std::process;
use std::str::FromStr;

use clap::Parser;
use colored::Colorize;
use log::{debug, error, info, LevelFilter};

use vela_cli::{output, Args};

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    output::init();

    info!(log_level:?; "Starting vela");
    debug!(args:?; "Parsed arguments");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match vela_cli::run(&args, &mut out) {
        Ok(true) => info!("Completed successfully"),
        Ok(false) => process::exit(1),
        Err(err) => {
            error!(error:% = err; "Command failed");
            eprintln!("{}: {}", "error".red().bold(), err);
            process::exit(2);
        }
    }
}
