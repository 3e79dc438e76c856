//! Default behaviour for a lone node.

use crate::context::StackContext;
use crate::error::StackError;
use crate::types::{OutputArity, StackResult};

use super::StackBehaviour;

/// Updates node 0 and finishes when it does.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleStack;

impl StackBehaviour for SingleStack {
  fn arity(&self) -> OutputArity {
    OutputArity::SingleOutput
  }

  fn update(&mut self, ctx: &mut StackContext<'_, '_>) -> Result<StackResult, StackError> {
    if ctx.stack_len() == 0 {
      return Err(StackError::EmptyStack);
    }
    let done = ctx.update_node_complete(0)?;
    Ok(StackResult::finish_if(done))
  }
}
