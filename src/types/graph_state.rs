//! Lifecycle state of a whole microscene.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a whole microscene.
///
/// `NotStarted -> Executing -> Finishing -> Finished`. A restart goes back to
/// `Executing` from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphState {
  #[default]
  NotStarted,
  Executing,
  /// The quit path is running.
  Finishing,
  Finished,
}

impl GraphState {
  /// True while ticks do any work.
  pub fn is_running(self) -> bool {
    matches!(self, GraphState::Executing | GraphState::Finishing)
  }
}

impl fmt::Display for GraphState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GraphState::NotStarted => write!(f, "not_started"),
      GraphState::Executing => write!(f, "executing"),
      GraphState::Finishing => write!(f, "finishing"),
      GraphState::Finished => write!(f, "finished"),
    }
  }
}
