//! # microscenes
//!
//! Tick-driven execution engine for small branching graphs of actions and
//! preconditions ("microscenes").
//!
//! ## Architecture
//!
//! A graph is a table of entries. Each entry owns a stack of [Node]s and a
//! [StackBehaviour] that decides how the stack is driven and which output
//! wins; outputs fan out to successor entries. The [Microscene] executor
//! keeps two frontiers (main and quit path), updates every active entry once
//! per tick, and activates a successor once all of its distinct predecessors
//! have reached it.
//!
//! - [GraphBuilder] builds graphs in code; [compile_definition] builds them
//!   from a persisted [GraphDefinition] through the [NodeRegistry] and
//!   [StackRegistry] tables.
//! - [Director] hosts several scenes that can start and wait for each other.
//! - [run_until_finished] drives one scene to completion and produces an
//!   [ExecutionReport].

pub mod compiler;
pub mod config;
pub mod context;
pub mod definition_io;
pub mod director;
#[cfg(test)]
mod director_test;
pub mod error;
pub mod executor;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod report_io;
#[cfg(test)]
mod report_io_test;
pub mod runner;
pub mod stacks;
#[cfg(test)]
mod test_support;
pub mod types;

pub use compiler::{compile_definition, compile_with_builtins};
pub use config::{ActivationPolicy, CrashPolicy, ExecutorConfig};
pub use context::{GraphContext, SceneCommand, StackContext};
pub use director::Director;
pub use error::{CompileError, DirectorError, NodeError, StackError};
pub use executor::Microscene;
pub use graph::{GraphBuilder, GraphEntry, MicrosceneGraph};
pub use node::{Node, NodeSlot, Progress};
pub use nodes::NodeRegistry;
pub use runner::{RunError, RunOptions, RunSummary, run_definition, run_until_finished};
pub use stacks::{StackBehaviour, StackRegistry};
pub use types::{
  CustomData, EntryId, ExecutionEvent, ExecutionReport, GraphDefinition, GraphState, NodeState,
  OutputArity, StackResult,
};
