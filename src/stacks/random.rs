//! Picks one node at random per activation.

use rand::Rng;

use crate::context::StackContext;
use crate::error::StackError;
use crate::types::{OutputArity, StackResult};

use super::StackBehaviour;

/// Chooses an index uniformly on start, then updates only that node; its
/// index is the winning output.
#[derive(Debug, Default, Clone)]
pub struct RandomStack {
  index: usize,
}

impl RandomStack {
  /// Index chosen at the last start.
  pub fn chosen(&self) -> usize {
    self.index
  }
}

impl StackBehaviour for RandomStack {
  fn arity(&self) -> OutputArity {
    OutputArity::MultipleOutput
  }

  fn start(&mut self, ctx: &mut StackContext<'_, '_>) -> Result<(), StackError> {
    let len = ctx.stack_len();
    if len == 0 {
      return Err(StackError::EmptyStack);
    }
    self.index = ctx.rng().gen_range(0..len);
    Ok(())
  }

  fn update(&mut self, ctx: &mut StackContext<'_, '_>) -> Result<StackResult, StackError> {
    let done = ctx.update_node_complete(self.index)?;
    Ok(StackResult {
      finished: done,
      winner_index: self.index,
    })
  }
}
