//! Execution report save/load (JSON).

use std::path::Path;

use tracing::instrument;

use crate::types::ExecutionReport;

/// Default report filename used by the CLI.
pub const REPORT_FILENAME: &str = "microscene_report.json";

/// Saves a report to `path` as pretty JSON.
#[instrument(level = "trace", skip(path, report))]
pub fn save_report(path: &Path, report: &ExecutionReport) -> Result<(), std::io::Error> {
  let json = serde_json::to_string_pretty(report)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)
}

/// Loads a report from `path`. Returns error if file is missing or invalid JSON.
#[instrument(level = "trace", skip(path))]
pub fn load_report(path: &Path) -> Result<ExecutionReport, std::io::Error> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
