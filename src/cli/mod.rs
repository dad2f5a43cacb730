//! CLI library modules for the paperlens binary.
//!
//! This module provides reusable CLI functionality that can be tested
//! independently of the binary.

pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;

pub use parser::{Cli, Commands, OutputFormat};

use clap::CommandFactory;
use std::io;

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<(), String> {
    let config = utils::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Spans(args) => commands::spans::run(args, config),
        Commands::Similarity(args) => commands::similarity::run(args, config),
        Commands::Eval(args) => commands::eval::run(args, config),
        Commands::Config(args) => commands::config::run(args, config, cli.quiet),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "paperlens", &mut io::stdout());
            Ok(())
        }
    }
}
