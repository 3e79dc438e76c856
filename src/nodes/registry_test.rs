//! Tests for `NodeRegistry`.

use super::{NodeRegistry, params};
use crate::context::GraphContext;
use crate::error::NodeError;
use crate::node::{Node, NodeSlot, Progress};
use crate::test_support::TestEnv;
use crate::types::{NodeDefinition, NodeState};

#[test]
fn builtins_are_registered() {
  let r = NodeRegistry::with_builtins();
  assert_eq!(
    r.kinds(),
    vec![
      "empty",
      "print",
      "set_variable",
      "start_microscene",
      "variable_equals",
      "wait",
      "wait_for_microscene",
      "wait_ticks",
    ]
  );
}

#[test]
fn creates_node_from_params() {
  let r = NodeRegistry::with_builtins();
  let def = NodeDefinition::new("set_variable")
    .with_param("key", "door")
    .with_param("value", "open");
  let node = r.create(&def).unwrap().unwrap();
  let mut env = TestEnv::new();
  let mut slot = NodeSlot::new("s", node);
  assert_eq!(slot.update_node(&mut env.ctx(1)), NodeState::Finished);
  assert_eq!(env.variables.get("door").map(String::as_str), Some("open"));
}

#[test]
fn bad_params_and_unknown_kinds() {
  let r = NodeRegistry::with_builtins();
  assert!(r.create(&NodeDefinition::new("teleport")).is_none());

  let missing = NodeDefinition::new("wait_ticks");
  assert!(r.create(&missing).unwrap().is_err());

  let negative = NodeDefinition::new("wait").with_param("seconds", -2.0);
  let err = r.create(&negative).unwrap().err().unwrap();
  assert!(err.to_string().contains("invalid wait"));
}

#[derive(serde::Deserialize)]
struct Shout {
  times: u32,
}

impl Node for Shout {
  fn on_start(&mut self, ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    ctx.set_variable("shouts", self.times.to_string());
    Ok(Progress::Complete)
  }
}

#[test]
fn custom_kinds_can_be_registered() {
  let mut r = NodeRegistry::new();
  r.register_params::<Shout>("shout");
  r.register("shout_twice", |def| {
    let mut s: Shout = params(def)?;
    s.times *= 2;
    Ok(Box::new(s))
  });
  assert!(r.contains("shout"));

  let mut env = TestEnv::new();
  let def = NodeDefinition::new("shout_twice").with_param("times", 3);
  let mut slot = NodeSlot::new("s", r.create(&def).unwrap().unwrap());
  slot.update_node(&mut env.ctx(1));
  assert_eq!(env.variables.get("shouts").map(String::as_str), Some("6"));
}
