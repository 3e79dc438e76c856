//! Tests for `GraphDefinition` serde.

use super::{GraphDefinition, NodeDefinition};

const SAMPLE: &str = r#"{
  "name": "door",
  "root": [1],
  "quit_root": [3],
  "variables": { "door": "closed" },
  "entries": [
    {
      "id": 1,
      "behaviour": "sequence",
      "nodes": [
        { "type": "wait_ticks", "ticks": 2 },
        { "type": "set_variable", "id": "open", "key": "door", "value": "open" }
      ],
      "connections": [[2]]
    },
    { "id": 2, "nodes": [{ "type": "empty" }] },
    { "id": 3, "nodes": [{ "type": "print", "message": "bye" }], "input_ports_connection_count": 1 }
  ],
  "metadata": { "positions": { "1": [10, 20] } }
}"#;

#[test]
fn parses_entries_nodes_and_params() {
  let def: GraphDefinition = serde_json::from_str(SAMPLE).unwrap();
  assert_eq!(def.name, "door");
  assert_eq!(def.root, vec![1]);
  assert_eq!(def.quit_root, vec![3]);
  assert_eq!(def.entries.len(), 3);
  let first = &def.entries[0];
  assert_eq!(first.behaviour.as_deref(), Some("sequence"));
  assert_eq!(first.connections, vec![vec![2]]);
  assert_eq!(first.nodes[0].kind, "wait_ticks");
  assert_eq!(first.nodes[0].params["ticks"], 2);
  assert_eq!(first.nodes[1].id.as_deref(), Some("open"));
  assert!(!first.nodes[1].params.contains_key("type"));
  assert!(!first.nodes[1].params.contains_key("id"));
  assert_eq!(def.entries[1].behaviour, None);
  assert!(def.entries[1].connections.is_empty());
  assert_eq!(def.entries[2].input_ports_connection_count, Some(1));
  assert_eq!(def.variables.get("door").map(String::as_str), Some("closed"));
  assert!(def.metadata.is_some());
}

#[test]
fn missing_sections_default_to_empty() {
  let def: GraphDefinition = serde_json::from_str("{}").unwrap();
  assert!(def.name.is_empty());
  assert!(def.root.is_empty());
  assert!(def.entries.is_empty());
  assert!(def.metadata.is_none());
}

#[test]
fn params_as_deserializes_typed_config() {
  #[derive(serde::Deserialize)]
  struct Wait {
    ticks: u32,
  }
  let node = NodeDefinition::new("wait_ticks").with_param("ticks", 4);
  let cfg: Wait = node.params_as().unwrap();
  assert_eq!(cfg.ticks, 4);
}

#[test]
fn params_as_reports_bad_types() {
  #[derive(Debug, serde::Deserialize)]
  #[allow(dead_code)]
  struct Wait {
    ticks: u32,
  }
  let node = NodeDefinition::new("wait_ticks").with_param("ticks", "soon");
  assert!(node.params_as::<Wait>().is_err());
}
