//! Persisted microscene graph: a plain table of entries loaded via serde.
//!
//! Editor-only data (node positions, sticky notes) lives under `metadata` and
//! is ignored at runtime.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A whole persisted graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDefinition {
  #[serde(default)]
  pub name: String,
  /// Successors of the Root source (id 0).
  #[serde(default)]
  pub root: Vec<i32>,
  /// Successors of the QuitRoot source (id -1).
  #[serde(default)]
  pub quit_root: Vec<i32>,
  #[serde(default)]
  pub entries: Vec<EntryDefinition>,
  /// Scene variables set on every (re)start.
  #[serde(default)]
  pub variables: HashMap<String, String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata: Option<Value>,
}

/// One scheduling unit: a stack of nodes, its behaviour and outgoing connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDefinition {
  pub id: i32,
  /// Stack behaviour kind. Omitted for lone nodes.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub behaviour: Option<String>,
  pub nodes: Vec<NodeDefinition>,
  /// Successor ids by output index.
  #[serde(default)]
  pub connections: Vec<Vec<i32>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub input_ports_connection_count: Option<u32>,
}

/// A node reference: its kind plus kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(flatten)]
  pub params: Map<String, Value>,
}

impl NodeDefinition {
  pub fn new(kind: impl Into<String>) -> Self {
    Self {
      kind: kind.into(),
      id: None,
      params: Map::new(),
    }
  }

  /// Adds a parameter (builder style).
  pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.params.insert(key.into(), value.into());
    self
  }

  /// Deserializes the parameters into a typed config.
  pub fn params_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(self.params.clone()))
  }
}
