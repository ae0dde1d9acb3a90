#![forbid(unsafe_code)]
//! Command line front end for th-iban addresses

use clap::Parser;
use colored::*;
use std::process::ExitCode;
use th_iban::cli::{run, Cli};

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
