//! Node capability trait and the slot that runs a node's completion state machine.

use tracing::{error, instrument, trace};

use crate::context::GraphContext;
use crate::error::NodeError;
use crate::types::NodeState;

/// What a node reports after a start/update callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Progress {
  /// Keep the turn; the node is updated again next tick.
  Running,
  /// The node is done.
  Complete,
}

impl Progress {
  /// `Complete` when `done`, else `Running`.
  pub fn complete_if(done: bool) -> Self {
    if done {
      Progress::Complete
    } else {
      Progress::Running
    }
  }
}

/// A single unit of work: an action or a precondition.
///
/// Returning `Err` from either callback crashes the node; it will not be
/// updated again until its entry is reactivated.
pub trait Node: Send {
  /// First update after construction or reset.
  fn on_start(&mut self, _ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    Ok(Progress::Running)
  }

  fn on_update(&mut self, _ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    Ok(Progress::Running)
  }
}

/// A node owned by an entry's stack, with its completion state.
pub struct NodeSlot {
  id: String,
  state: NodeState,
  crash: Option<String>,
  node: Box<dyn Node>,
}

impl NodeSlot {
  pub fn new(id: impl Into<String>, node: Box<dyn Node>) -> Self {
    Self {
      id: id.into(),
      state: NodeState::None,
      crash: None,
      node,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn state(&self) -> NodeState {
    self.state
  }

  /// Returns the node to `None` for its next activation.
  pub fn reset_state(&mut self) {
    self.state = NodeState::None;
    self.crash = None;
  }

  /// Drives the node one step and returns its state afterwards.
  ///
  /// The first call after a reset runs `on_start` and, unless that completed
  /// the node, `on_update` in the same call. Terminal nodes are skipped.
  #[instrument(level = "trace", skip(self, ctx), fields(node = %self.id))]
  pub fn update_node(&mut self, ctx: &mut GraphContext<'_>) -> NodeState {
    let result = match self.state {
      NodeState::Finished | NodeState::Crashed => return self.state,
      NodeState::None => {
        self.state = NodeState::Executing;
        trace!("node started");
        match self.node.on_start(ctx) {
          Ok(Progress::Running) => self.node.on_update(ctx),
          other => other,
        }
      }
      NodeState::Executing => self.node.on_update(ctx),
    };

    match result {
      Ok(Progress::Complete) => {
        trace!("node finished");
        self.state = NodeState::Finished;
      }
      Ok(Progress::Running) => {}
      Err(e) => {
        error!(node = %self.id, error = %e, "node crashed");
        self.state = NodeState::Crashed;
        self.crash = Some(e.to_string());
      }
    }
    self.state
  }

  /// Crash reason, handed out once after the node crashes.
  pub(crate) fn take_crash(&mut self) -> Option<String> {
    self.crash.take()
  }
}

impl std::fmt::Debug for NodeSlot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NodeSlot")
      .field("id", &self.id)
      .field("state", &self.state)
      .finish()
  }
}
