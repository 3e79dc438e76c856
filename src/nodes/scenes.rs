//! Nodes that talk to sibling scenes through the director.

use serde::Deserialize;
use tracing::error;

use crate::context::{GraphContext, SceneCommand};
use crate::error::NodeError;
use crate::node::{Node, Progress};
use crate::types::GraphState;

/// Asks the director to (re)start `scene`. Completes right away, or once
/// that run reaches Finished when `wait` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct StartMicrosceneNode {
  pub scene: String,
  #[serde(default)]
  pub wait: bool,
  /// Tick the start was requested on; the target's state is only trusted
  /// after it.
  #[serde(skip)]
  requested_on: u64,
}

impl StartMicrosceneNode {
  pub fn new(scene: impl Into<String>, wait: bool) -> Self {
    Self {
      scene: scene.into(),
      wait,
      requested_on: 0,
    }
  }
}

impl Node for StartMicrosceneNode {
  fn on_start(&mut self, ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    if ctx.scene_state(&self.scene).is_none() {
      error!(caller = ctx.caller(), scene = %self.scene, "referenced microscene is not hosted");
      return Ok(Progress::Complete);
    }
    ctx.request(SceneCommand::Start {
      scene: self.scene.clone(),
    });
    self.requested_on = ctx.tick();
    Ok(Progress::complete_if(!self.wait))
  }

  fn on_update(&mut self, ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    // Commands apply after this scene's tick, so the snapshot of the
    // requesting tick still shows the previous run.
    if ctx.tick() <= self.requested_on {
      return Ok(Progress::Running);
    }
    Ok(Progress::complete_if(
      ctx.scene_state(&self.scene) == Some(GraphState::Finished),
    ))
  }
}

/// Precondition: completes when `scene` is Finished.
#[derive(Debug, Clone, Deserialize)]
pub struct WaitForMicrosceneNode {
  pub scene: String,
}

impl WaitForMicrosceneNode {
  pub fn new(scene: impl Into<String>) -> Self {
    Self {
      scene: scene.into(),
    }
  }
}

impl Node for WaitForMicrosceneNode {
  fn on_update(&mut self, ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    match ctx.scene_state(&self.scene) {
      Some(state) => Ok(Progress::complete_if(state == GraphState::Finished)),
      None => {
        error!(caller = ctx.caller(), scene = %self.scene, "referenced microscene is not hosted");
        Ok(Progress::Complete)
      }
    }
  }
}
