//! Tests for `StartMicrosceneNode` and `WaitForMicrosceneNode`.

use super::{StartMicrosceneNode, WaitForMicrosceneNode};
use crate::context::SceneCommand;
use crate::node::NodeSlot;
use crate::test_support::TestEnv;
use crate::types::{GraphState, NodeState};

fn start_command(scene: &str) -> SceneCommand {
  SceneCommand::Start {
    scene: scene.to_string(),
  }
}

#[test]
fn start_unknown_scene_completes_without_command() {
  let mut env = TestEnv::new();
  let mut slot = NodeSlot::new("s", Box::new(StartMicrosceneNode::new("ghost", true)));
  assert_eq!(slot.update_node(&mut env.ctx(1)), NodeState::Finished);
  assert!(env.commands.is_empty());
}

#[test]
fn start_without_wait_completes_immediately() {
  let mut env = TestEnv::new();
  env.scenes.insert("door".to_string(), GraphState::NotStarted);
  let mut slot = NodeSlot::new("s", Box::new(StartMicrosceneNode::new("door", false)));
  assert_eq!(slot.update_node(&mut env.ctx(1)), NodeState::Finished);
  assert_eq!(env.commands, vec![start_command("door")]);
}

#[test]
fn start_with_wait_ignores_previous_finished_run() {
  let mut env = TestEnv::new();
  env.scenes.insert("door".to_string(), GraphState::Finished);
  let mut slot = NodeSlot::new("s", Box::new(StartMicrosceneNode::new("door", true)));
  assert_eq!(slot.update_node(&mut env.ctx(1)), NodeState::Executing);
  assert_eq!(env.commands, vec![start_command("door")]);

  env.scenes.insert("door".to_string(), GraphState::Executing);
  assert_eq!(slot.update_node(&mut env.ctx(2)), NodeState::Executing);
  env.scenes.insert("door".to_string(), GraphState::Finished);
  assert_eq!(slot.update_node(&mut env.ctx(3)), NodeState::Finished);
}

#[test]
fn wait_for_scene_completes_when_finished() {
  let mut env = TestEnv::new();
  env.scenes.insert("door".to_string(), GraphState::Executing);
  let mut slot = NodeSlot::new("w", Box::new(WaitForMicrosceneNode::new("door")));
  assert_eq!(slot.update_node(&mut env.ctx(1)), NodeState::Executing);
  env.scenes.insert("door".to_string(), GraphState::Finishing);
  assert_eq!(slot.update_node(&mut env.ctx(2)), NodeState::Executing);
  env.scenes.insert("door".to_string(), GraphState::Finished);
  assert_eq!(slot.update_node(&mut env.ctx(3)), NodeState::Finished);
}

#[test]
fn wait_for_unknown_scene_completes() {
  let mut env = TestEnv::new();
  let mut slot = NodeSlot::new("w", Box::new(WaitForMicrosceneNode::new("ghost")));
  assert_eq!(slot.update_node(&mut env.ctx(1)), NodeState::Finished);
}
