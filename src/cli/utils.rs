//! Utility functions for CLI commands

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::corpus::read_json;
use crate::{EntityCategory, PipelineConfig};

/// Load the configuration file, or defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, String> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e)),
        None => Ok(PipelineConfig::default()),
    }
}

/// Read a JSON input file
pub fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    read_json(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

/// Parse an entity category argument (`PER`, `person`, ...)
pub fn parse_category(s: &str) -> Result<EntityCategory, String> {
    EntityCategory::from_label(s).ok_or_else(|| {
        format!(
            "unknown category '{}' (expected one of PER, ORG, LOC, MISC)",
            s
        )
    })
}
