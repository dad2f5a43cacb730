//! Eval command - fuzzy-score predicted buckets against gold buckets

use clap::Parser;
use std::path::PathBuf;

use super::super::output::write_output;
use super::super::parser::OutputFormat;
use super::super::utils::{parse_category, read_input};

use crate::corpus::write_json;
use crate::{EntityBucket, EntityCategory, PipelineConfig};

/// Evaluate predicted entity buckets against gold buckets
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Hand-labeled buckets
    #[arg(long, value_name = "PATH")]
    pub gold: PathBuf,

    /// Predicted buckets, in the same document order as the gold file
    #[arg(long, value_name = "PATH")]
    pub predicted: PathBuf,

    /// Category to score (repeatable; default from config)
    #[arg(long = "category", value_name = "CAT", value_parser = parse_category)]
    pub categories: Vec<EntityCategory>,

    /// Fuzzy ratio (0-100) needed for a match
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub match_threshold: Option<u8>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format (human, json)
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

pub fn run(args: EvalArgs, mut config: PipelineConfig) -> Result<(), String> {
    if let Some(threshold) = args.match_threshold {
        config.evaluation.match_threshold = threshold;
    }
    if !args.categories.is_empty() {
        config.evaluation.categories = args.categories;
    }
    config.validate().map_err(|e| e.to_string())?;

    let gold: Vec<EntityBucket> = read_input(&args.gold)?;
    let predicted: Vec<EntityBucket> = read_input(&args.predicted)?;

    let evaluator = config.evaluator();
    let report = evaluator
        .evaluate(&gold, &predicted)
        .map_err(|e| e.to_string())?;

    let output = args.output.as_deref();
    match args.format {
        OutputFormat::Human => write_output(&report.render_text(evaluator.categories()), output),
        OutputFormat::Json => write_json(output, &report).map_err(|e| e.to_string()),
        other => Err(format!("format '{}' is not supported by eval", other.name())),
    }
}
