//! Kind name to node factory table.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use super::{
  EMPTY, EmptyNode, PRINT, PrintNode, SET_VARIABLE, START_MICROSCENE, SetVariableNode,
  StartMicrosceneNode, VARIABLE_EQUALS, VariableEqualsNode, WAIT, WAIT_FOR_MICROSCENE, WAIT_TICKS,
  WaitForMicrosceneNode, WaitNode, WaitTicksNode,
};
use crate::error::NodeError;
use crate::node::Node;
use crate::types::NodeDefinition;

/// Builds a fresh node from its persisted definition. Errors describe bad parameters.
pub type NodeFactory = Box<dyn Fn(&NodeDefinition) -> Result<Box<dyn Node>, NodeError> + Send + Sync>;

#[derive(Default)]
pub struct NodeRegistry {
  factories: HashMap<String, NodeFactory>,
}

/// Deserializes a definition's parameters, mapping failures to [NodeError].
pub fn params<T: DeserializeOwned>(def: &NodeDefinition) -> Result<T, NodeError> {
  def.params_as::<T>().map_err(|e| NodeError::new(e.to_string()))
}

impl NodeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registry with every built-in node kind.
  pub fn with_builtins() -> Self {
    let mut r = Self::new();
    r.register(EMPTY, |_| Ok(Box::new(EmptyNode)));
    r.register_params::<PrintNode>(PRINT);
    r.register(WAIT, |def| {
      let p: super::wait::WaitParams = params(def)?;
      Ok(Box::new(WaitNode::from_seconds(p.seconds)?))
    });
    r.register_params::<WaitTicksNode>(WAIT_TICKS);
    r.register_params::<SetVariableNode>(SET_VARIABLE);
    r.register_params::<VariableEqualsNode>(VARIABLE_EQUALS);
    r.register_params::<StartMicrosceneNode>(START_MICROSCENE);
    r.register_params::<WaitForMicrosceneNode>(WAIT_FOR_MICROSCENE);
    r
  }

  /// Registers (or replaces) a node kind.
  pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
  where
    F: Fn(&NodeDefinition) -> Result<Box<dyn Node>, NodeError> + Send + Sync + 'static,
  {
    self.factories.insert(kind.into(), Box::new(factory));
  }

  /// Registers a node kind that deserializes directly from its parameters.
  pub fn register_params<N>(&mut self, kind: impl Into<String>)
  where
    N: Node + DeserializeOwned + 'static,
  {
    self.register(kind, |def| Ok(Box::new(params::<N>(def)?)));
  }

  /// `None` for an unknown kind; `Some(Err(_))` for bad parameters.
  pub fn create(&self, def: &NodeDefinition) -> Option<Result<Box<dyn Node>, NodeError>> {
    self.factories.get(&def.kind).map(|f| f(def))
  }

  pub fn contains(&self, kind: &str) -> bool {
    self.factories.contains_key(kind)
  }

  /// Registered kinds, sorted.
  pub fn kinds(&self) -> Vec<&str> {
    let mut k: Vec<&str> = self.factories.keys().map(String::as_str).collect();
    k.sort_unstable();
    k
  }
}
