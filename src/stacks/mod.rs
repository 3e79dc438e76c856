//! Stack behaviours: strategies deciding how an entry's nodes are driven and
//! which output wins.
//!
//! Built-ins are registered by name in a [StackRegistry] so persisted graphs
//! can refer to them (and to user strategies) by kind.

use std::collections::HashMap;

use crate::context::StackContext;
use crate::error::StackError;
use crate::types::{OutputArity, StackResult};

mod parallel_all;
#[cfg(test)]
mod parallel_all_test;
mod parallel_first;
mod random;
mod sequence;
mod single;

pub use parallel_all::ParallelAllStack;
pub use parallel_first::ParallelFirstStack;
pub use random::RandomStack;
pub use sequence::SequenceStack;
pub use single::SingleStack;

/// Strategy bound to one graph entry.
///
/// May keep small transient state (a cursor, a chosen index) which is reset
/// in [StackBehaviour::start] on every activation.
pub trait StackBehaviour: Send {
  fn arity(&self) -> OutputArity;

  /// Called each time the owning entry activates, after its nodes were reset.
  fn start(&mut self, _ctx: &mut StackContext<'_, '_>) -> Result<(), StackError> {
    Ok(())
  }

  /// Called once per tick while the entry is active.
  fn update(&mut self, ctx: &mut StackContext<'_, '_>) -> Result<StackResult, StackError>;
}

pub const SINGLE: &str = "single";
pub const SEQUENCE: &str = "sequence";
pub const PARALLEL_ALL: &str = "parallel_all";
pub const PARALLEL_FIRST: &str = "parallel_first";
pub const RANDOM: &str = "random";

/// Builds a fresh behaviour instance for one entry.
pub type StackFactory = Box<dyn Fn() -> Box<dyn StackBehaviour> + Send + Sync>;

/// Kind name to behaviour factory.
#[derive(Default)]
pub struct StackRegistry {
  factories: HashMap<String, StackFactory>,
}

impl StackRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registry with `single`, `sequence`, `parallel_all`, `parallel_first` and `random`.
  pub fn with_builtins() -> Self {
    let mut r = Self::new();
    r.register(SINGLE, || Box::new(SingleStack));
    r.register(SEQUENCE, || Box::new(SequenceStack::default()));
    r.register(PARALLEL_ALL, || Box::new(ParallelAllStack));
    r.register(PARALLEL_FIRST, || Box::new(ParallelFirstStack));
    r.register(RANDOM, || Box::new(RandomStack::default()));
    r
  }

  /// Registers (or replaces) a behaviour kind.
  pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
  where
    F: Fn() -> Box<dyn StackBehaviour> + Send + Sync + 'static,
  {
    self.factories.insert(kind.into(), Box::new(factory));
  }

  pub fn create(&self, kind: &str) -> Option<Box<dyn StackBehaviour>> {
    self.factories.get(kind).map(|f| f())
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
