//! Graph definition load/save (JSON).

use std::path::Path;

use tracing::instrument;

use crate::types::GraphDefinition;

/// Parses a graph definition from JSON text.
pub fn parse_definition(json: &str) -> Result<GraphDefinition, serde_json::Error> {
  serde_json::from_str(json)
}

/// Loads a graph definition from `path`. Invalid JSON maps to `InvalidData`.
#[instrument(level = "trace", skip(path), fields(path = %path.display()))]
pub fn load_definition(path: &Path) -> Result<GraphDefinition, std::io::Error> {
  let text = std::fs::read_to_string(path)?;
  parse_definition(&text).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Saves a graph definition to `path` as pretty JSON, creating parent directories.
#[instrument(level = "trace", skip(path, def))]
pub fn save_definition(path: &Path, def: &GraphDefinition) -> Result<(), std::io::Error> {
  let json = serde_json::to_string_pretty(def)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)
}
