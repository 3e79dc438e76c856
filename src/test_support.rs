//! Scripted nodes and behaviours shared by unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::context::{GraphContext, SceneCommand, StackContext};
use crate::error::{NodeError, StackError};
use crate::node::{Node, Progress};
use crate::stacks::StackBehaviour;
use crate::types::{OutputArity, SceneStates, StackResult, Variables};

/// Call log shared between a scripted node and its test.
#[derive(Debug, Clone, Default)]
pub(crate) struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
  pub(crate) fn push(&self, s: impl Into<String>) {
    self.0.lock().unwrap().push(s.into());
  }

  pub(crate) fn all(&self) -> Vec<String> {
    self.0.lock().unwrap().clone()
  }

  pub(crate) fn count(&self, s: &str) -> usize {
    self.0.lock().unwrap().iter().filter(|c| *c == s).count()
  }
}

/// Completes on its `finish_on`-th update call; `0` completes inside `on_start`.
pub(crate) struct ScriptedNode {
  name: String,
  finish_on: u32,
  updates: u32,
  calls: Calls,
}

impl ScriptedNode {
  pub(crate) fn new(name: &str, finish_on: u32, calls: &Calls) -> Self {
    Self {
      name: name.to_string(),
      finish_on,
      updates: 0,
      calls: calls.clone(),
    }
  }

  pub(crate) fn boxed(name: &str, finish_on: u32, calls: &Calls) -> Box<dyn Node> {
    Box::new(Self::new(name, finish_on, calls))
  }
}

impl Node for ScriptedNode {
  fn on_start(&mut self, _ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    self.updates = 0;
    self.calls.push(format!("{}:start", self.name));
    Ok(Progress::complete_if(self.finish_on == 0))
  }

  fn on_update(&mut self, ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    self.updates += 1;
    self.calls.push(format!("{}:update", self.name));
    self.calls.push(format!("{}:tick{}", self.name, ctx.tick()));
    Ok(Progress::complete_if(self.updates >= self.finish_on))
  }
}

/// Fails on its `fail_on`-th update call; `0` fails inside `on_start`.
pub(crate) struct FailingNode {
  fail_on: u32,
  updates: u32,
  calls: Calls,
}

impl FailingNode {
  pub(crate) fn boxed(fail_on: u32, calls: &Calls) -> Box<dyn Node> {
    Box::new(Self {
      fail_on,
      updates: 0,
      calls: calls.clone(),
    })
  }
}

impl Node for FailingNode {
  fn on_start(&mut self, _ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    self.updates = 0;
    self.calls.push("fail:start");
    if self.fail_on == 0 {
      return Err(NodeError::new("boom in start"));
    }
    Ok(Progress::Running)
  }

  fn on_update(&mut self, _ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    self.updates += 1;
    self.calls.push("fail:update");
    if self.updates >= self.fail_on {
      return Err(NodeError::new("boom in update"));
    }
    Ok(Progress::Running)
  }
}

/// Faults on its first `faults_left` updates, then behaves like `single`.
pub(crate) struct FaultyBehaviour {
  pub(crate) faults_left: u32,
}

impl StackBehaviour for FaultyBehaviour {
  fn arity(&self) -> OutputArity {
    OutputArity::SingleOutput
  }

  fn update(&mut self, ctx: &mut StackContext<'_, '_>) -> Result<StackResult, StackError> {
    if self.faults_left > 0 {
      self.faults_left -= 1;
      return Err(StackError::Other("behaviour fault".to_string()));
    }
    let done = ctx.update_node_complete(0)?;
    Ok(StackResult::finish_if(done))
  }
}

/// Owns the run state a [GraphContext] borrows.
pub(crate) struct TestEnv {
  pub(crate) variables: Variables,
  pub(crate) rng: StdRng,
  pub(crate) scenes: SceneStates,
  pub(crate) commands: Vec<SceneCommand>,
}

impl TestEnv {
  pub(crate) fn new() -> Self {
    Self {
      variables: Variables::new(),
      rng: StdRng::seed_from_u64(7),
      scenes: SceneStates::new(),
      commands: Vec::new(),
    }
  }

  pub(crate) fn ctx(&mut self, tick: u64) -> GraphContext<'_> {
    self.ctx_with_delta(tick, Duration::from_millis(16))
  }

  pub(crate) fn ctx_with_delta(&mut self, tick: u64, delta: Duration) -> GraphContext<'_> {
    GraphContext::new(
      "test",
      None,
      &mut self.variables,
      &mut self.rng,
      &self.scenes,
      &mut self.commands,
      tick,
      delta,
    )
  }
}

/// Runs `start` on a behaviour against `nodes`.
pub(crate) fn start_stack(
  behaviour: &mut dyn StackBehaviour,
  nodes: &mut [crate::node::NodeSlot],
  env: &mut TestEnv,
  policy: crate::config::CrashPolicy,
) -> Result<(), StackError> {
  let mut g = env.ctx(0);
  let mut s = StackContext::new(&mut g, nodes, policy);
  behaviour.start(&mut s)
}

/// Runs one `update` on a behaviour against `nodes` at `tick`.
pub(crate) fn update_stack(
  behaviour: &mut dyn StackBehaviour,
  nodes: &mut [crate::node::NodeSlot],
  env: &mut TestEnv,
  tick: u64,
  policy: crate::config::CrashPolicy,
) -> Result<StackResult, StackError> {
  let mut g = env.ctx(tick);
  let mut s = StackContext::new(&mut g, nodes, policy);
  behaviour.update(&mut s)
}

/// Scripted slots named `n0`, `n1`, ... finishing on the given update counts.
pub(crate) fn scripted_slots(finish_on: &[u32], calls: &Calls) -> Vec<crate::node::NodeSlot> {
  finish_on
    .iter()
    .enumerate()
    .map(|(i, f)| {
      let name = format!("n{}", i);
      crate::node::NodeSlot::new(name.clone(), ScriptedNode::boxed(&name, *f, calls))
    })
    .collect()
}
