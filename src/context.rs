//! Per-tick contexts handed to nodes and stack behaviours.
//!
//! [GraphContext] lives for one tick of one microscene and borrows the
//! scene's mutable run state. [StackContext] wraps it together with the
//! node stack of the entry being updated.

use std::time::Duration;

use rand::rngs::StdRng;

use crate::config::CrashPolicy;
use crate::error::StackError;
use crate::node::NodeSlot;
use crate::types::{CustomData, GraphState, NodeState, SceneStates, Variables};

/// Request from a node to the hosting director.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneCommand {
  /// (Re)start the named scene.
  Start { scene: String },
}

/// Ephemeral per-tick context: caller identity, custom data and scene run state.
pub struct GraphContext<'a> {
  caller: &'a str,
  custom_data: Option<&'a CustomData>,
  variables: &'a mut Variables,
  rng: &'a mut StdRng,
  scenes: &'a SceneStates,
  commands: &'a mut Vec<SceneCommand>,
  tick: u64,
  delta: Duration,
}

impl<'a> GraphContext<'a> {
  #[allow(clippy::too_many_arguments)]
  pub(crate) fn new(
    caller: &'a str,
    custom_data: Option<&'a CustomData>,
    variables: &'a mut Variables,
    rng: &'a mut StdRng,
    scenes: &'a SceneStates,
    commands: &'a mut Vec<SceneCommand>,
    tick: u64,
    delta: Duration,
  ) -> Self {
    Self {
      caller,
      custom_data,
      variables,
      rng,
      scenes,
      commands,
      tick,
      delta,
    }
  }

  /// Identity of whoever drives this microscene.
  pub fn caller(&self) -> &str {
    self.caller
  }

  pub fn custom_data(&self) -> Option<&CustomData> {
    self.custom_data
  }

  /// Custom data downcast to `T`, if present and of that type.
  pub fn custom_data_as<T: 'static>(&self) -> Option<&T> {
    self.custom_data.and_then(|d| d.downcast_ref::<T>())
  }

  /// 1-based number of the current tick.
  pub fn tick(&self) -> u64 {
    self.tick
  }

  /// Time elapsed since the previous tick.
  pub fn delta_time(&self) -> Duration {
    self.delta
  }

  pub fn variable(&self, key: &str) -> Option<&str> {
    self.variables.get(key).map(String::as_str)
  }

  pub fn set_variable(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.variables.insert(key.into(), value.into());
  }

  pub fn variables(&self) -> &Variables {
    self.variables
  }

  /// Random source shared by the scene's stack behaviours.
  pub fn rng(&mut self) -> &mut StdRng {
    self.rng
  }

  /// State of a sibling scene hosted by the same director.
  pub fn scene_state(&self, scene: &str) -> Option<GraphState> {
    self.scenes.get(scene).copied()
  }

  /// Queues a command for the director, applied after this scene's tick.
  pub fn request(&mut self, command: SceneCommand) {
    self.commands.push(command);
  }
}

/// Context for one stack behaviour call: the graph context plus the entry's nodes.
pub struct StackContext<'a, 'g> {
  graph: &'a mut GraphContext<'g>,
  nodes: &'a mut [NodeSlot],
  crash_policy: CrashPolicy,
}

impl<'a, 'g> StackContext<'a, 'g> {
  pub(crate) fn new(
    graph: &'a mut GraphContext<'g>,
    nodes: &'a mut [NodeSlot],
    crash_policy: CrashPolicy,
  ) -> Self {
    Self {
      graph,
      nodes,
      crash_policy,
    }
  }

  pub fn stack_len(&self) -> usize {
    self.nodes.len()
  }

  /// Updates node `index` and returns its state afterwards.
  pub fn update_node(&mut self, index: usize) -> Result<NodeState, StackError> {
    let len = self.nodes.len();
    let slot = self
      .nodes
      .get_mut(index)
      .ok_or(StackError::NodeIndexOutOfRange { index, len })?;
    Ok(slot.update_node(self.graph))
  }

  pub fn node_state(&self, index: usize) -> Option<NodeState> {
    self.nodes.get(index).map(NodeSlot::state)
  }

  /// Whether `state` lets the stack move on, under the scene's crash policy.
  pub fn is_complete(&self, state: NodeState) -> bool {
    match state {
      NodeState::Finished => true,
      NodeState::Crashed => self.crash_policy == CrashPolicy::TreatAsFinished,
      NodeState::None | NodeState::Executing => false,
    }
  }

  /// Updates node `index` and reports whether it is now complete.
  pub fn update_node_complete(&mut self, index: usize) -> Result<bool, StackError> {
    let state = self.update_node(index)?;
    Ok(self.is_complete(state))
  }

  pub fn caller(&self) -> &str {
    self.graph.caller()
  }

  pub fn custom_data(&self) -> Option<&CustomData> {
    self.graph.custom_data()
  }

  pub fn rng(&mut self) -> &mut StdRng {
    self.graph.rng()
  }

  /// The wrapped graph context.
  pub fn graph(&mut self) -> &mut GraphContext<'g> {
    self.graph
  }
}
