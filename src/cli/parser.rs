//! CLI argument parsing and structure definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::commands;

/// Acknowledgment entities, abstract similarity and NER scoring for papers
#[derive(Parser, Debug)]
#[command(name = "paperlens")]
#[command(
    author,
    version,
    about = "Acknowledgment entities, abstract similarity and NER scoring for papers",
    long_about = r#"
paperlens - post-processing for literature analysis pipelines

STAGES:
  • spans       - rebuild entity spans from BIO token predictions
  • similarity  - link papers whose abstract embeddings are close
  • eval        - fuzzy-score predicted entities against gold annotations

All inputs and outputs are JSON. Model inference happens upstream.

EXAMPLES:
  paperlens spans -i predictions.json -o acknowledgment.json
  paperlens similarity -i embeddings.json --threshold 0.8 --format networkx
  paperlens eval --gold acknowledgment_manual.json --predicted acknowledgment.json
  paperlens config init paperlens.toml
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML configuration file (flags override its values)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build entity buckets from token predictions
    #[command(visible_alias = "s")]
    Spans(commands::SpansArgs),

    /// Build the document similarity graph from embeddings
    #[command(visible_alias = "sim")]
    Similarity(commands::SimilarityArgs),

    /// Evaluate predicted entity buckets against gold buckets
    #[command(visible_alias = "e")]
    Eval(commands::EvalArgs),

    /// Show or create configuration files
    Config(commands::ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Unified output format selection for all commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// JSON lines (one object per line)
    Jsonl,
    /// NetworkX node-link graph (similarity only)
    Networkx,
}

impl OutputFormat {
    /// Name as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
            Self::Jsonl => "jsonl",
            Self::Networkx => "networkx",
        }
    }
}
