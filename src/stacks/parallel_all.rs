//! Runs all nodes every tick and moves on when all are done.

use crate::context::StackContext;
use crate::error::StackError;
use crate::types::{OutputArity, StackResult};

use super::StackBehaviour;

/// Updates every node each tick, with no early exit; finishes when all are complete.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelAllStack;

impl StackBehaviour for ParallelAllStack {
  fn arity(&self) -> OutputArity {
    OutputArity::SingleOutput
  }

  fn update(&mut self, ctx: &mut StackContext<'_, '_>) -> Result<StackResult, StackError> {
    if ctx.stack_len() == 0 {
      return Err(StackError::EmptyStack);
    }
    let mut finished = true;
    for i in 0..ctx.stack_len() {
      finished &= ctx.update_node_complete(i)?;
    }
    Ok(StackResult::finish_if(finished))
  }
}
