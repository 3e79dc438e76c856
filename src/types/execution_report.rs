//! DTOs for a microscene run report: per-tick scheduling events for debugging.

use serde::{Deserialize, Serialize};

use super::{EntryId, GraphState};

/// One recorded scheduling event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExecutionEvent {
  StateChanged {
    tick: u64,
    state: GraphState,
  },
  /// The entry's join was satisfied and it joined a frontier.
  EntryActivated {
    tick: u64,
    entry: EntryId,
    quit_path: bool,
  },
  EntryFinished {
    tick: u64,
    entry: EntryId,
    winner: usize,
  },
  NodeCrashed {
    tick: u64,
    entry: EntryId,
    node: String,
    reason: String,
  },
  StackFaulted {
    tick: u64,
    entry: EntryId,
    reason: String,
  },
}

impl ExecutionEvent {
  pub fn tick(&self) -> u64 {
    match self {
      ExecutionEvent::StateChanged { tick, .. }
      | ExecutionEvent::EntryActivated { tick, .. }
      | ExecutionEvent::EntryFinished { tick, .. }
      | ExecutionEvent::NodeCrashed { tick, .. }
      | ExecutionEvent::StackFaulted { tick, .. } => *tick,
    }
  }
}

/// Root structure for a saved run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
  /// Report format version.
  pub version: u32,
  /// Scene (graph) name.
  pub scene: String,
  /// RFC 3339 timestamp when the run started.
  pub started_at: String,
  /// RFC 3339 timestamp when the run stopped.
  pub finished_at: Option<String>,
  pub final_state: GraphState,
  /// Ticks executed.
  pub ticks: u64,
  pub events: Vec<ExecutionEvent>,
}

impl ExecutionReport {
  pub const VERSION: u32 = 1;

  /// Entries in activation order.
  pub fn activations(&self) -> Vec<EntryId> {
    self
      .events
      .iter()
      .filter_map(|e| match e {
        ExecutionEvent::EntryActivated { entry, .. } => Some(*entry),
        _ => None,
      })
      .collect()
  }
}
