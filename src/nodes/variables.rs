//! Scene variable action and precondition.

use serde::Deserialize;
use tracing::trace;

use crate::context::GraphContext;
use crate::error::NodeError;
use crate::node::{Node, Progress};

/// Writes `key = value` into the scene variables and completes.
#[derive(Debug, Clone, Deserialize)]
pub struct SetVariableNode {
  pub key: String,
  pub value: String,
}

impl SetVariableNode {
  pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      value: value.into(),
    }
  }
}

impl Node for SetVariableNode {
  fn on_start(&mut self, ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    trace!(key = %self.key, value = %self.value, "set variable");
    ctx.set_variable(self.key.clone(), self.value.clone());
    Ok(Progress::Complete)
  }
}

/// Precondition: completes on the first update where `key` equals `value`.
/// A missing variable never matches.
#[derive(Debug, Clone, Deserialize)]
pub struct VariableEqualsNode {
  pub key: String,
  pub value: String,
}

impl VariableEqualsNode {
  pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      value: value.into(),
    }
  }
}

impl Node for VariableEqualsNode {
  fn on_update(&mut self, ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    Ok(Progress::complete_if(
      ctx.variable(&self.key) == Some(self.value.as_str()),
    ))
  }
}
