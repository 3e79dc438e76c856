//! Completion state of a single node.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Completion state of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
  /// Not started since construction or the last reset.
  #[default]
  None,
  Executing,
  Finished,
  /// The node faulted; terminal until reset.
  Crashed,
}

impl NodeState {
  /// Finished or Crashed. Terminal nodes are never updated again until reset.
  pub fn is_terminal(self) -> bool {
    matches!(self, NodeState::Finished | NodeState::Crashed)
  }
}

impl fmt::Display for NodeState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NodeState::None => write!(f, "none"),
      NodeState::Executing => write!(f, "executing"),
      NodeState::Finished => write!(f, "finished"),
      NodeState::Crashed => write!(f, "crashed"),
    }
  }
}
