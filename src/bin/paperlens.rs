//! paperlens - command-line driver for the literature analysis stages.
//!
//! Logging goes to stderr through `env_logger`; `RUST_LOG` overrides the
//! level chosen by `--verbose` / `--quiet`.

use clap::Parser;
use std::process::ExitCode;

use paperlens::cli::output::color;
use paperlens::cli::{self, Cli};

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}
