//! No-op action.

use crate::context::GraphContext;
use crate::error::NodeError;
use crate::node::{Node, Progress};

/// Completes as soon as it starts. Useful as a join point or placeholder.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyNode;

impl Node for EmptyNode {
  fn on_start(&mut self, _ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    Ok(Progress::Complete)
  }
}
