//! Tests for `ParallelAllStack`.

use super::ParallelAllStack;
use crate::config::CrashPolicy;
use crate::node::NodeSlot;
use crate::test_support::{Calls, FailingNode, ScriptedNode, TestEnv, scripted_slots, update_stack};
use crate::types::StackResult;

#[test]
fn finishes_on_the_last_completion() {
  let calls = Calls::default();
  let mut nodes = scripted_slots(&[2, 3, 1], &calls);
  let mut env = TestEnv::new();
  let mut b = ParallelAllStack;
  let p = CrashPolicy::TreatAsFinished;
  assert!(!update_stack(&mut b, &mut nodes, &mut env, 1, p).unwrap().finished);
  assert!(!update_stack(&mut b, &mut nodes, &mut env, 2, p).unwrap().finished);
  assert_eq!(
    update_stack(&mut b, &mut nodes, &mut env, 3, p),
    Ok(StackResult::finish())
  );

  // Every unfinished node was driven on every tick.
  assert_eq!(calls.count("n0:update"), 2);
  assert_eq!(calls.count("n1:update"), 3);
  assert_eq!(calls.count("n2:update"), 1);
  for t in 1..=3 {
    assert_eq!(calls.count(&format!("n1:tick{}", t)), 1);
  }
}

#[test]
fn crashed_sibling_blocks_under_stall() {
  let calls = Calls::default();
  let mut nodes = vec![
    NodeSlot::new("ok", ScriptedNode::boxed("ok", 1, &calls)),
    NodeSlot::new("bad", FailingNode::boxed(1, &calls)),
  ];
  let mut env = TestEnv::new();
  let mut b = ParallelAllStack;
  for t in 1..5 {
    let r = update_stack(&mut b, &mut nodes, &mut env, t, CrashPolicy::Stall).unwrap();
    assert!(!r.finished);
  }
}

#[test]
fn crashed_sibling_counts_as_finished_by_default() {
  let calls = Calls::default();
  let mut nodes = vec![
    NodeSlot::new("ok", ScriptedNode::boxed("ok", 2, &calls)),
    NodeSlot::new("bad", FailingNode::boxed(1, &calls)),
  ];
  let mut env = TestEnv::new();
  let mut b = ParallelAllStack;
  let p = CrashPolicy::TreatAsFinished;
  assert!(!update_stack(&mut b, &mut nodes, &mut env, 1, p).unwrap().finished);
  assert!(update_stack(&mut b, &mut nodes, &mut env, 2, p).unwrap().finished);
}
