//! Runs the stack's nodes one after another.

use crate::context::StackContext;
use crate::error::StackError;
use crate::types::{OutputArity, StackResult};

use super::StackBehaviour;

/// Updates only the node under the cursor; advances the cursor when it
/// completes and finishes once every node has.
#[derive(Debug, Default, Clone)]
pub struct SequenceStack {
  index: usize,
}

impl StackBehaviour for SequenceStack {
  fn arity(&self) -> OutputArity {
    OutputArity::SingleOutput
  }

  fn start(&mut self, _ctx: &mut StackContext<'_, '_>) -> Result<(), StackError> {
    self.index = 0;
    Ok(())
  }

  fn update(&mut self, ctx: &mut StackContext<'_, '_>) -> Result<StackResult, StackError> {
    let len = ctx.stack_len();
    if len == 0 {
      return Err(StackError::EmptyStack);
    }
    if self.index < len && ctx.update_node_complete(self.index)? {
      self.index += 1;
    }
    Ok(StackResult::finish_if(self.index >= len))
  }
}
