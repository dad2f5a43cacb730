//! Output formatting utilities for CLI commands

use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::path::Path;

use crate::graph::{EmbeddingVector, SimilarityGraph};
use crate::{EntityBucket, EntityCategory};

/// Log info message (respects quiet flag)
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write to {}: {}", path.display(), e))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    }
    Ok(())
}

/// Colorize text with ANSI escape codes (only if stdout is a terminal)
pub fn color(code: &str, text: &str) -> String {
    if io::stdout().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Get color code for entity category
pub fn category_color(category: EntityCategory) -> &'static str {
    match category {
        EntityCategory::Person => "1;34",
        EntityCategory::Organization => "1;32",
        EntityCategory::Location => "1;33",
        EntityCategory::Miscellaneous => "1;37",
    }
}

/// Render buckets one document per block, skipping empty categories.
pub fn format_buckets(buckets: &[EntityBucket]) -> String {
    let mut out = String::new();
    for bucket in buckets {
        out.push_str(&format!("{} {}\n", color("1", "document"), bucket.document_id));
        if bucket.is_empty() {
            out.push_str(&format!("  {}\n", color("90", "(no entities)")));
            continue;
        }
        for (category, entities) in bucket.iter().filter(|(_, list)| !list.is_empty()) {
            out.push_str(&format!(
                "  {} ({}): {}\n",
                color(category_color(category), category.as_label()),
                entities.len(),
                entities.join(", ")
            ));
        }
    }
    out
}

/// Render similarity edges with paper titles.
pub fn format_edges(graph: &SimilarityGraph, vectors: &[EmbeddingVector]) -> String {
    let rule = "-".repeat(60);
    let mut out = String::new();
    for edge in graph.edges() {
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "paper 1 (id: {:>3}): {}\n",
            edge.from_id, vectors[edge.from_index].title
        ));
        out.push_str(&format!(
            "paper 2 (id: {:>3}): {}\n",
            edge.to_id, vectors[edge.to_index].title
        ));
        out.push_str(&format!("score            : {:6.4}\n", edge.score));
        out.push_str(&rule);
        out.push_str("\n\n");
    }
    out.push_str(&format!(
        "{} documents, {} edges (threshold {})\n",
        graph.node_count(),
        graph.edge_count(),
        graph.threshold()
    ));
    out
}
