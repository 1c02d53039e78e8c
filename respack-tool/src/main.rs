use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::debug;
use respack_lib::{EXIT_GENERIC_FAILURE, TerminalPrompt, exit_code_for};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;
mod logging;

use cli::{Cli, normalize_args};

fn main() -> ExitCode {
    let args = normalize_args(std::env::args_os());

    // No arguments at all: show usage instead of complaining about --source
    if args.len() <= 1 {
        return match Cli::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::from(EXIT_GENERIC_FAILURE),
        };
    }

    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too and are not failures
            let code = if e.use_stderr() { EXIT_GENERIC_FAILURE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    logging::init_logging(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            println!("Created zip: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("reading the current directory")?;
    debug!("working directory {}", cwd.display());
    respack_lib::pack(&cli.to_raw_args(), &cwd, &mut TerminalPrompt)
}
