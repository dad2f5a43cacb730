//! Config command - configuration management

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use super::super::output::{color, log_info};

use crate::PipelineConfig;

/// Configuration management
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Action to perform
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write the default configuration to a file
    Init {
        /// Destination file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: ConfigArgs, config: PipelineConfig, quiet: bool) -> Result<(), String> {
    match args.action {
        ConfigAction::Show => {
            let toml_string = config
                .to_toml_string()
                .map_err(|e| format!("Failed to serialize config: {}", e))?;
            print!("{}", toml_string);
        }
        ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
            }
            let toml_string = PipelineConfig::default()
                .to_toml_string()
                .map_err(|e| format!("Failed to serialize config: {}", e))?;
            fs::write(&path, toml_string)
                .map_err(|e| format!("Failed to write config: {}", e))?;
            log_info(
                &format!("{} Wrote config: {}", color("32", "✓"), path.display()),
                quiet,
            );
        }
    }

    Ok(())
}
