//! Report sensor CLI.

use std::process::ExitCode;

use clap::Parser;
use sensor_cli::logging::init_logging;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_analyse, run_reports};
use crate::summary::{print_reports, print_summary};

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    let outcome = match cli.command {
        Command::Analyse(args) => run_analyse(&args).map(|result| {
            print_summary(&result);
            !result.has_failures()
        }),
        Command::Reports(args) => run_reports(&args).map(|reports| {
            print_reports(&reports);
            true
        }),
    };
    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
