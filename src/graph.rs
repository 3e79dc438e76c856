//! Runtime graph model: entries (node stacks + behaviour + connections) and
//! the builder that validates them and computes join counts.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::{info, instrument, warn};

use crate::error::CompileError;
use crate::node::NodeSlot;
use crate::stacks::{SingleStack, StackBehaviour};
use crate::types::{EntryId, OutputArity, Variables};

/// Which frontier an active entry lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Frontier {
  Main,
  Quit,
}

/// Source of one reach on a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reach {
  Root,
  QuitRoot,
  Entry(usize),
}

/// The unit of scheduling: sibling nodes driven by one behaviour, plus
/// successor sets by output index.
pub struct GraphEntry {
  id: EntryId,
  pub(crate) nodes: Vec<NodeSlot>,
  pub(crate) behaviour: Box<dyn StackBehaviour>,
  input_ports_connection_count: u32,
  /// Distinct sources that reached this entry since its last activation.
  pub(crate) reached_from: Vec<Reach>,
  /// Successor entry indices by output index; de-duplicated per set.
  connections: Vec<Vec<usize>>,
  pub(crate) active: Option<Frontier>,
  /// Tick of the last activation.
  pub(crate) activated_on: u64,
}

impl GraphEntry {
  pub fn id(&self) -> EntryId {
    self.id
  }

  pub fn nodes(&self) -> &[NodeSlot] {
    &self.nodes
  }

  pub fn arity(&self) -> OutputArity {
    self.behaviour.arity()
  }

  /// Distinct predecessor entries that must reach this entry before it activates.
  pub fn input_ports_connection_count(&self) -> u32 {
    self.input_ports_connection_count
  }

  pub fn reached_count(&self) -> u32 {
    self.reached_from.len() as u32
  }

  pub fn is_active(&self) -> bool {
    self.active.is_some()
  }

  /// Reach count at which the join fires. Entries fed only by Root/QuitRoot
  /// have no counted predecessors and fire on the first reach.
  pub(crate) fn join_threshold(&self) -> u32 {
    self.input_ports_connection_count.max(1)
  }

  pub(crate) fn connection_set(&self, output: usize) -> Option<&[usize]> {
    self.connections.get(output).map(Vec::as_slice)
  }

  pub(crate) fn connection_sets(&self) -> usize {
    self.connections.len()
  }
}

impl std::fmt::Debug for GraphEntry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("GraphEntry")
      .field("id", &self.id)
      .field("nodes", &self.nodes)
      .field("input_ports_connection_count", &self.input_ports_connection_count)
      .field("reached_count", &self.reached_count())
      .field("connections", &self.connections)
      .finish()
  }
}

/// A validated microscene graph with Root and QuitRoot sources.
#[derive(Debug)]
pub struct MicrosceneGraph {
  name: String,
  pub(crate) entries: Vec<GraphEntry>,
  index: HashMap<EntryId, usize>,
  pub(crate) root: Vec<usize>,
  pub(crate) quit_root: Vec<usize>,
  variables: Variables,
}

impl MicrosceneGraph {
  pub fn builder(name: impl Into<String>) -> GraphBuilder {
    GraphBuilder::new(name)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn entry(&self, id: EntryId) -> Option<&GraphEntry> {
    self.index.get(&id).map(|i| &self.entries[*i])
  }

  pub fn entry_ids(&self) -> Vec<EntryId> {
    self.entries.iter().map(GraphEntry::id).collect()
  }

  /// Successors of `id` on output `output`. Root and QuitRoot have output 0 only.
  pub fn successors(&self, id: EntryId, output: usize) -> Vec<EntryId> {
    let set: &[usize] = match id {
      EntryId::ROOT if output == 0 => &self.root,
      EntryId::QUIT_ROOT if output == 0 => &self.quit_root,
      _ => self
        .index
        .get(&id)
        .and_then(|i| self.entries[*i].connection_set(output))
        .unwrap_or(&[]),
    };
    set.iter().map(|i| self.entries[*i].id).collect()
  }

  /// Variables applied on every (re)start.
  pub fn initial_variables(&self) -> &Variables {
    &self.variables
  }

  pub(crate) fn id_of(&self, index: usize) -> EntryId {
    self.entries[index].id
  }
}

struct PendingEntry {
  id: EntryId,
  behaviour: Box<dyn StackBehaviour>,
  nodes: Vec<NodeSlot>,
}

/// Builds a [MicrosceneGraph] from entries and edges, validating topology and
/// computing each entry's join count.
pub struct GraphBuilder {
  name: String,
  entries: Vec<PendingEntry>,
  edges: Vec<(EntryId, usize, EntryId)>,
  root: Vec<EntryId>,
  quit_root: Vec<EntryId>,
  input_counts: HashMap<EntryId, u32>,
  variables: Variables,
}

impl GraphBuilder {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      entries: Vec::new(),
      edges: Vec::new(),
      root: Vec::new(),
      quit_root: Vec::new(),
      input_counts: HashMap::new(),
      variables: Variables::new(),
    }
  }

  /// Adds an entry with an explicit behaviour.
  pub fn entry(
    mut self,
    id: impl Into<EntryId>,
    behaviour: Box<dyn StackBehaviour>,
    nodes: Vec<NodeSlot>,
  ) -> Self {
    self.entries.push(PendingEntry {
      id: id.into(),
      behaviour,
      nodes,
    });
    self
  }

  /// Adds a lone-node entry driven by [SingleStack].
  pub fn single(self, id: impl Into<EntryId>, node: NodeSlot) -> Self {
    self.entry(id, Box::new(SingleStack), vec![node])
  }

  /// Adds `to` to the successor set `output` of `from`.
  pub fn connect(mut self, from: impl Into<EntryId>, output: usize, to: impl Into<EntryId>) -> Self {
    self.edges.push((from.into(), output, to.into()));
    self
  }

  pub fn root(mut self, to: impl Into<EntryId>) -> Self {
    self.root.push(to.into());
    self
  }

  pub fn quit_root(mut self, to: impl Into<EntryId>) -> Self {
    self.quit_root.push(to.into());
    self
  }

  /// Overrides the computed join count of `id`.
  pub fn input_count(mut self, id: impl Into<EntryId>, count: u32) -> Self {
    self.input_counts.insert(id.into(), count);
    self
  }

  pub fn variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.variables.insert(key.into(), value.into());
    self
  }

  #[instrument(level = "trace", skip(self), fields(graph = %self.name))]
  pub fn build(self) -> Result<MicrosceneGraph, CompileError> {
    let mut index: HashMap<EntryId, usize> = HashMap::new();
    for (i, e) in self.entries.iter().enumerate() {
      if e.id.is_reserved() {
        return Err(CompileError::ReservedEntryId(e.id));
      }
      if index.insert(e.id, i).is_some() {
        return Err(CompileError::DuplicateEntry(e.id));
      }
      if e.nodes.is_empty() {
        return Err(CompileError::EmptyStack(e.id));
      }
    }

    let resolve = |from: EntryId, to: EntryId| -> Result<usize, CompileError> {
      index
        .get(&to)
        .copied()
        .ok_or(CompileError::UnknownSuccessor { from, to })
    };

    let mut sets: Vec<Vec<Vec<usize>>> = (0..self.entries.len()).map(|_| Vec::new()).collect();
    for (from, output, to) in &self.edges {
      let from_i = *index.get(from).ok_or(CompileError::UnknownEntry(*from))?;
      let to_i = resolve(*from, *to)?;
      let entry_sets = &mut sets[from_i];
      if entry_sets.len() <= *output {
        entry_sets.resize_with(output + 1, Vec::new);
      }
      if !entry_sets[*output].contains(&to_i) {
        entry_sets[*output].push(to_i);
      }
    }

    for (i, e) in self.entries.iter().enumerate() {
      let n_sets = sets[i].len();
      match e.behaviour.arity() {
        OutputArity::SingleOutput if n_sets > 1 => {
          return Err(CompileError::SingleOutputConnections {
            entry: e.id,
            sets: n_sets,
          });
        }
        OutputArity::MultipleOutput if n_sets > e.nodes.len() => {
          return Err(CompileError::TooManyConnectionSets {
            entry: e.id,
            sets: n_sets,
            nodes: e.nodes.len(),
          });
        }
        _ => {}
      }
    }

    let mut root = Vec::new();
    for to in &self.root {
      let i = resolve(EntryId::ROOT, *to)?;
      if !root.contains(&i) {
        root.push(i);
      }
    }
    let mut quit_root = Vec::new();
    for to in &self.quit_root {
      let i = resolve(EntryId::QUIT_ROOT, *to)?;
      if !quit_root.contains(&i) {
        quit_root.push(i);
      }
    }

    // Join counts: distinct predecessor entries, whichever of their outputs
    // the edge hangs off. Root and QuitRoot are not counted.
    let mut predecessors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); self.entries.len()];
    for (from_i, entry_sets) in sets.iter().enumerate() {
      for to_i in entry_sets.iter().flatten() {
        predecessors[*to_i].insert(from_i);
      }
    }

    warn_unreachable(&self.entries, &sets, &root, &quit_root);

    let entry_count = self.entries.len();
    let mut entries = Vec::with_capacity(entry_count);
    for ((pending, connections), preds) in self.entries.into_iter().zip(sets).zip(predecessors) {
      let computed = preds.len() as u32;
      let count = match self.input_counts.get(&pending.id) {
        Some(explicit) if *explicit != computed => {
          warn!(
            entry = %pending.id,
            explicit = *explicit,
            computed,
            "persisted input connection count differs from topology"
          );
          *explicit
        }
        Some(explicit) => *explicit,
        None => computed,
      };
      entries.push(GraphEntry {
        id: pending.id,
        nodes: pending.nodes,
        behaviour: pending.behaviour,
        input_ports_connection_count: count,
        reached_from: Vec::new(),
        connections,
        active: None,
        activated_on: 0,
      });
    }

    info!(
      graph = %self.name,
      entry_count,
      edge_count = self.edges.len(),
      "graph built"
    );
    Ok(MicrosceneGraph {
      name: self.name,
      entries,
      index,
      root,
      quit_root,
      variables: self.variables,
    })
  }
}

fn warn_unreachable(
  entries: &[PendingEntry],
  sets: &[Vec<Vec<usize>>],
  root: &[usize],
  quit_root: &[usize],
) {
  let mut seen: HashSet<usize> = HashSet::new();
  let mut queue: VecDeque<usize> = root.iter().chain(quit_root).copied().collect();
  while let Some(i) = queue.pop_front() {
    if !seen.insert(i) {
      continue;
    }
    queue.extend(sets[i].iter().flatten().copied());
  }
  for (i, e) in entries.iter().enumerate() {
    if !seen.contains(&i) {
      warn!(entry = %e.id, "entry is unreachable from root and quit root");
    }
  }
}
