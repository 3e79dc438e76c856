//! Races the stack's nodes; the first to finish picks the output.

use crate::context::StackContext;
use crate::error::StackError;
use crate::types::{OutputArity, StackResult};

use super::StackBehaviour;

/// Updates nodes in order and finishes on the first complete one, selecting
/// its index as the winning output. Nodes after the winner are not updated
/// that tick, and the losers are simply abandoned.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelFirstStack;

impl StackBehaviour for ParallelFirstStack {
  fn arity(&self) -> OutputArity {
    OutputArity::MultipleOutput
  }

  fn update(&mut self, ctx: &mut StackContext<'_, '_>) -> Result<StackResult, StackError> {
    if ctx.stack_len() == 0 {
      return Err(StackError::EmptyStack);
    }
    for i in 0..ctx.stack_len() {
      if ctx.update_node_complete(i)? {
        return Ok(StackResult::finish_and_select(i));
      }
    }
    Ok(StackResult::running())
  }
}
