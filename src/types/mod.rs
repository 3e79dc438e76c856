//! Microscene data types: states, ids, stack results, the persisted graph
//! definition and run reports.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

mod entry_id;
mod execution_report;
mod graph_definition;
#[cfg(test)]
mod graph_definition_test;
mod graph_state;
mod node_state;
mod stack_result;

pub use entry_id::EntryId;
pub use execution_report::{ExecutionEvent, ExecutionReport};
pub use graph_definition::{EntryDefinition, GraphDefinition, NodeDefinition};
pub use graph_state::GraphState;
pub use node_state::NodeState;
pub use stack_result::{OutputArity, StackResult};

/// Key-value scene variables shared by all nodes of one microscene.
pub type Variables = HashMap<String, String>;

/// Opaque caller-supplied data threaded through every node and stack call.
pub type CustomData = Arc<dyn Any + Send + Sync>;

/// Snapshot of sibling scene states, keyed by scene name.
pub type SceneStates = HashMap<String, GraphState>;
