//! Tests for report save/load.

use crate::report_io::{REPORT_FILENAME, load_report, save_report};
use crate::types::{EntryId, ExecutionEvent, ExecutionReport, GraphState};

#[test]
fn roundtrip_save_load() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join(REPORT_FILENAME);
  let report = ExecutionReport {
    version: ExecutionReport::VERSION,
    scene: "door".to_string(),
    started_at: "2026-03-01T12:00:00+00:00".to_string(),
    finished_at: Some("2026-03-01T12:00:01+00:00".to_string()),
    final_state: GraphState::Finished,
    ticks: 3,
    events: vec![ExecutionEvent::NodeCrashed {
      tick: 2,
      entry: EntryId(4),
      node: "print#0".to_string(),
      reason: "boom".to_string(),
    }],
  };
  save_report(&path, &report).unwrap();
  assert!(path.exists());
  let loaded = load_report(&path).unwrap();
  assert_eq!(loaded.scene, "door");
  assert_eq!(loaded.ticks, 3);
  assert_eq!(loaded.events, report.events);
}

#[test]
fn load_missing_file_returns_error() {
  let dir = tempfile::tempdir().unwrap();
  assert!(load_report(&dir.path().join("nonexistent.json")).is_err());
}
