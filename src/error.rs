//! Error types for nodes, stack behaviours and graph compilation.

use thiserror::Error;

use crate::types::EntryId;

/// A node fault. The node slot turns it into the Crashed state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct NodeError(pub String);

impl NodeError {
  pub fn new(msg: impl Into<String>) -> Self {
    Self(msg.into())
  }
}

impl From<&str> for NodeError {
  fn from(msg: &str) -> Self {
    Self(msg.to_string())
  }
}

impl From<String> for NodeError {
  fn from(msg: String) -> Self {
    Self(msg)
  }
}

/// A stack behaviour fault. The executor logs it and keeps the entry on its frontier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
  #[error("stack is empty")]
  EmptyStack,

  #[error("node index {index} out of range for stack of {len}")]
  NodeIndexOutOfRange { index: usize, len: usize },

  #[error("{0}")]
  Other(String),
}

/// Graph definition or builder validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
  #[error("duplicate entry id {0}")]
  DuplicateEntry(EntryId),

  #[error("unknown entry {0}")]
  UnknownEntry(EntryId),

  #[error("entry id {0} is reserved for root/quit root")]
  ReservedEntryId(EntryId),

  #[error("entry {from} connects to unknown entry {to}")]
  UnknownSuccessor { from: EntryId, to: EntryId },

  #[error("entry {0} has an empty node stack")]
  EmptyStack(EntryId),

  #[error("entry {0} has several nodes but no stack behaviour")]
  MissingBehaviour(EntryId),

  #[error("entry {entry}: unknown stack behaviour '{kind}'")]
  UnknownBehaviour { entry: EntryId, kind: String },

  #[error("entry {entry}: unknown node type '{kind}'")]
  UnknownNodeKind { entry: EntryId, kind: String },

  #[error("entry {entry}: invalid parameters for node '{kind}': {message}")]
  InvalidNodeParams {
    entry: EntryId,
    kind: String,
    message: String,
  },

  #[error("entry {entry}: single-output behaviour has {sets} connection sets")]
  SingleOutputConnections { entry: EntryId, sets: usize },

  #[error("entry {entry}: {sets} connection sets for a stack of {nodes} nodes")]
  TooManyConnectionSets {
    entry: EntryId,
    sets: usize,
    nodes: usize,
  },
}

/// Director bookkeeping failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectorError {
  #[error("a scene named '{0}' is already hosted")]
  DuplicateScene(String),

  #[error("no scene named '{0}'")]
  UnknownScene(String),
}
