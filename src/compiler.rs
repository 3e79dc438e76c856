//! Compiles a persisted [GraphDefinition] into a runnable [MicrosceneGraph].
//!
//! Node kinds and stack behaviours are resolved by name through the
//! registries; topology checks and join counts are left to [GraphBuilder].

use tracing::{debug, info, instrument};

use crate::error::CompileError;
use crate::graph::{GraphBuilder, MicrosceneGraph};
use crate::node::NodeSlot;
use crate::nodes::NodeRegistry;
use crate::stacks::{SINGLE, SingleStack, StackBehaviour, StackRegistry};
use crate::types::{EntryDefinition, EntryId, GraphDefinition};

/// Compiles `def` using the given node and behaviour tables.
///
/// - Node ids default to `<type>#<index>` within their stack.
/// - An entry without a behaviour must hold exactly one node; it runs as `single`.
/// - A persisted `input_ports_connection_count` overrides the computed one.
#[instrument(level = "trace", skip(def, nodes, stacks), fields(graph = %def.name))]
pub fn compile_definition(
  def: &GraphDefinition,
  nodes: &NodeRegistry,
  stacks: &StackRegistry,
) -> Result<MicrosceneGraph, CompileError> {
  info!(entries = def.entries.len(), "compiling microscene definition");
  let mut builder = GraphBuilder::new(def.name.clone());

  for entry in &def.entries {
    let id = EntryId(entry.id);
    let slots = build_nodes(id, entry, nodes)?;
    let behaviour = build_behaviour(id, entry, slots.len(), stacks)?;
    debug!(entry = %id, nodes = slots.len(), behaviour = ?entry.behaviour, "entry compiled");
    builder = builder.entry(id, behaviour, slots);

    for (output, set) in entry.connections.iter().enumerate() {
      for to in set {
        builder = builder.connect(id, output, *to);
      }
    }
    if let Some(count) = entry.input_ports_connection_count {
      builder = builder.input_count(id, count);
    }
  }

  for to in &def.root {
    builder = builder.root(*to);
  }
  for to in &def.quit_root {
    builder = builder.quit_root(*to);
  }
  for (k, v) in &def.variables {
    builder = builder.variable(k.clone(), v.clone());
  }
  builder.build()
}

/// [compile_definition] with the built-in node and behaviour registries.
pub fn compile_with_builtins(def: &GraphDefinition) -> Result<MicrosceneGraph, CompileError> {
  compile_definition(def, &NodeRegistry::with_builtins(), &StackRegistry::with_builtins())
}

fn build_nodes(
  id: EntryId,
  entry: &EntryDefinition,
  registry: &NodeRegistry,
) -> Result<Vec<NodeSlot>, CompileError> {
  entry
    .nodes
    .iter()
    .enumerate()
    .map(|(i, def)| -> Result<NodeSlot, CompileError> {
      let node = registry
        .create(def)
        .ok_or_else(|| CompileError::UnknownNodeKind {
          entry: id,
          kind: def.kind.clone(),
        })?
        .map_err(|e| CompileError::InvalidNodeParams {
          entry: id,
          kind: def.kind.clone(),
          message: e.to_string(),
        })?;
      let name = def.id.clone().unwrap_or_else(|| format!("{}#{}", def.kind, i));
      Ok(NodeSlot::new(name, node))
    })
    .collect()
}

fn build_behaviour(
  id: EntryId,
  entry: &EntryDefinition,
  node_count: usize,
  registry: &StackRegistry,
) -> Result<Box<dyn StackBehaviour>, CompileError> {
  match entry.behaviour.as_deref() {
    Some(kind) => registry
      .create(kind)
      .ok_or_else(|| CompileError::UnknownBehaviour {
        entry: id,
        kind: kind.to_string(),
      }),
    None if node_count > 1 => Err(CompileError::MissingBehaviour(id)),
    // Empty stacks are rejected by the builder.
    None => Ok(registry.create(SINGLE).unwrap_or_else(|| Box::new(SingleStack))),
  }
}
