//! Tests for `Director`.

use crate::compiler::compile_with_builtins;
use crate::config::ExecutorConfig;
use crate::definition_io::parse_definition;
use crate::director::Director;
use crate::error::DirectorError;
use crate::executor::Microscene;
use crate::types::GraphState;
use std::time::Duration;

const DT: Duration = Duration::from_millis(16);

fn scene(json: &str) -> Microscene {
  let graph = compile_with_builtins(&parse_definition(json).unwrap()).unwrap();
  Microscene::new(graph, ExecutorConfig::default())
}

fn caller_and_callee() -> Director {
  let mut d = Director::new();
  d.add(scene(
    r#"{ "name": "intro", "root": [1], "entries": [
      { "id": 1, "nodes": [{ "type": "start_microscene", "scene": "door", "wait": true }] }
    ] }"#,
  ))
  .unwrap();
  d.add(scene(
    r#"{ "name": "door", "root": [1], "entries": [
      { "id": 1, "nodes": [{ "type": "wait_ticks", "ticks": 2 }] }
    ] }"#,
  ))
  .unwrap();
  d
}

#[test]
fn started_scene_runs_in_same_tick_and_caller_waits_for_it() {
  let mut d = caller_and_callee();
  d.start("intro", None).unwrap();
  assert_eq!(d.names(), vec!["intro", "door"]);

  d.tick_with_delta(DT);
  assert_eq!(d.scene("door").unwrap().state(), GraphState::Executing);
  assert_eq!(d.scene("door").unwrap().ticks(), 1);
  assert_eq!(d.scene("intro").unwrap().state(), GraphState::Executing);

  d.tick_with_delta(DT);
  assert_eq!(d.scene("door").unwrap().state(), GraphState::Finished);
  assert_eq!(d.scene("intro").unwrap().state(), GraphState::Executing);

  d.tick_with_delta(DT);
  assert_eq!(d.scene("intro").unwrap().state(), GraphState::Finished);
  assert!(d.all_finished());
  assert_eq!(d.ticks(), 3);
}

#[test]
fn waits_for_scene_hosted_earlier_in_order() {
  let mut d = Director::new();
  d.add(scene(
    r#"{ "name": "door", "root": [1], "entries": [
      { "id": 1, "nodes": [{ "type": "wait_ticks", "ticks": 3 }] }
    ] }"#,
  ))
  .unwrap();
  d.add(scene(
    r#"{ "name": "npc", "root": [1], "entries": [
      { "id": 1, "nodes": [{ "type": "wait_for_microscene", "scene": "door" }] }
    ] }"#,
  ))
  .unwrap();
  d.start("door", None).unwrap();
  d.start("npc", None).unwrap();

  d.tick_with_delta(DT);
  d.tick_with_delta(DT);
  assert_eq!(d.count_in(GraphState::Executing), 2);
  d.tick_with_delta(DT);
  assert_eq!(d.scene("door").unwrap().state(), GraphState::Finished);
  assert_eq!(d.scene("npc").unwrap().state(), GraphState::Finished);
}

#[test]
fn not_started_scenes_do_not_tick() {
  let mut d = caller_and_callee();
  d.tick_with_delta(DT);
  assert_eq!(d.count_in(GraphState::NotStarted), 2);
  assert!(d.all_finished());
}

#[test]
fn rejects_duplicate_and_unknown_names() {
  let mut d = caller_and_callee();
  let dup = scene(r#"{ "name": "door", "entries": [{ "id": 1, "nodes": [{ "type": "empty" }] }] }"#);
  assert_eq!(
    d.add(dup),
    Err(DirectorError::DuplicateScene("door".to_string()))
  );
  assert_eq!(
    d.start("attic", None),
    Err(DirectorError::UnknownScene("attic".to_string()))
  );
  assert!(d.scene("attic").is_none());
  assert_eq!(d.len(), 2);
}

#[test]
fn finish_runs_quit_path() {
  let mut d = Director::new();
  d.add(scene(
    r#"{ "name": "loop", "root": [1], "quit_root": [2], "entries": [
      { "id": 1, "nodes": [{ "type": "wait_ticks", "ticks": 100 }] },
      { "id": 2, "nodes": [{ "type": "set_variable", "key": "bye", "value": "yes" }] }
    ] }"#,
  ))
  .unwrap();
  d.start("loop", None).unwrap();
  d.tick_with_delta(DT);
  d.finish("loop").unwrap();
  d.tick_with_delta(DT);

  let s = d.scene("loop").unwrap();
  assert_eq!(s.state(), GraphState::Finished);
  assert_eq!(s.variables().get("bye").map(String::as_str), Some("yes"));
}
