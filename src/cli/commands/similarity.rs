//! Similarity command - embedding vectors to a similarity graph

use clap::Parser;
use std::path::PathBuf;

use super::super::output::{format_edges, write_output};
use super::super::parser::OutputFormat;
use super::super::utils::read_input;

use crate::corpus::{write_json, write_jsonl};
use crate::{EmbeddingVector, PipelineConfig};

/// Build the document similarity graph from embeddings
#[derive(Parser, Debug)]
pub struct SimilarityArgs {
    /// JSON array of `{id, title, embedding}` records
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Minimum cosine similarity for an edge
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub threshold: Option<f64>,

    /// Output format (json, jsonl, human, networkx)
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,
}

pub fn run(args: SimilarityArgs, mut config: PipelineConfig) -> Result<(), String> {
    if let Some(threshold) = args.threshold {
        config.similarity.threshold = threshold;
    }

    let vectors: Vec<EmbeddingVector> = read_input(&args.input)?;
    let graph = config
        .graph_builder()
        .build(&vectors)
        .map_err(|e| e.to_string())?;

    let output = args.output.as_deref();
    match args.format {
        OutputFormat::Json => write_json(output, graph.edges()).map_err(|e| e.to_string()),
        OutputFormat::Jsonl => write_jsonl(output, graph.edges()).map_err(|e| e.to_string()),
        OutputFormat::Networkx => {
            let value = graph.to_node_link_json(&vectors).map_err(|e| e.to_string())?;
            write_json(output, &value).map_err(|e| e.to_string())
        }
        OutputFormat::Human => write_output(&format_edges(&graph, &vectors), output),
    }
}
