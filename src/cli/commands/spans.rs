//! Spans command - token predictions to entity buckets

use clap::Parser;
use std::path::PathBuf;

use super::super::output::{format_buckets, write_output};
use super::super::parser::OutputFormat;
use super::super::utils::read_input;

use crate::corpus::{annotate_corpus, write_json, write_jsonl, AnnotatedDocument};
use crate::{EntityBucket, PipelineConfig};

/// Build entity buckets from token predictions
#[derive(Parser, Debug)]
pub struct SpansArgs {
    /// JSON array of `{id, text, predictions}` documents
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Confidence floor for span-opening tokens
    #[arg(long, value_name = "FLOAT")]
    pub threshold: Option<f64>,

    /// Sub-word continuation marker (empty disables)
    #[arg(long, value_name = "STR")]
    pub marker: Option<String>,

    /// Replacement for whitespace in entity text
    #[arg(long, value_name = "STR")]
    pub joiner: Option<String>,

    /// Drop repeated entities within a document
    #[arg(long)]
    pub dedup: bool,

    /// Output format (json, jsonl, human)
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,
}

pub fn run(args: SpansArgs, mut config: PipelineConfig) -> Result<(), String> {
    if let Some(threshold) = args.threshold {
        config.spans.score_threshold = threshold;
    }
    if let Some(marker) = args.marker {
        config.spans.continuation_marker = marker;
    }
    if let Some(joiner) = args.joiner {
        config.spans.joiner = joiner;
    }
    config.validate().map_err(|e| e.to_string())?;

    let documents: Vec<AnnotatedDocument> = read_input(&args.input)?;
    let mut buckets = annotate_corpus(&config.span_builder(), &documents).map_err(|e| e.to_string())?;
    if args.dedup {
        buckets = buckets.iter().map(EntityBucket::deduplicated).collect();
    }

    let output = args.output.as_deref();
    match args.format {
        OutputFormat::Json => write_json(output, &buckets).map_err(|e| e.to_string()),
        OutputFormat::Jsonl => write_jsonl(output, &buckets).map_err(|e| e.to_string()),
        OutputFormat::Human => write_output(&format_buckets(&buckets), output),
        other => Err(format!("format '{}' is not supported by spans", other.name())),
    }
}
