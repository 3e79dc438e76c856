//! Result of one stack update and the connection arity of a behaviour.

use serde::{Deserialize, Serialize};

/// What a stack behaviour reports after one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackResult {
  pub finished: bool,
  /// Output connection set taken when `finished`.
  pub winner_index: usize,
}

impl StackResult {
  /// Keep running next tick.
  pub fn running() -> Self {
    Self::default()
  }

  /// Finished through output 0.
  pub fn finish() -> Self {
    Self::finish_and_select(0)
  }

  pub fn finish_if(condition: bool) -> Self {
    Self {
      finished: condition,
      winner_index: 0,
    }
  }

  pub fn finish_and_select(index: usize) -> Self {
    Self {
      finished: true,
      winner_index: index,
    }
  }
}

/// How many connection sets a behaviour exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputArity {
  /// Exactly one exit; only connection set 0 may be populated.
  SingleOutput,
  /// One exit per stack node; the update nominates the winner.
  MultipleOutput,
}
