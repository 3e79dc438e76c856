//! The microscene executor: a tick-driven scheduler over graph entries.
//!
//! Two frontiers hold the active entries (main path and quit path). Each tick
//! updates every active entry's stack behaviour in frontier order; finished
//! entries are retired and fan out to the successor set their behaviour
//! selected. A successor activates once it has been reached by as many
//! distinct predecessor activations as its join count requires.
//!
//! When the main frontier runs dry the scene moves to `Finishing` on its own
//! and runs the quit path from QuitRoot; once that is empty too, it is
//! `Finished`.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::config::{ActivationPolicy, ExecutorConfig};
use crate::context::{GraphContext, SceneCommand, StackContext};
use crate::graph::{Frontier, MicrosceneGraph, Reach};
use crate::types::{
  CustomData, EntryId, ExecutionEvent, GraphState, OutputArity, SceneStates, Variables,
};

/// Per-tick facts shared by every entry update in that tick.
#[derive(Clone, Copy)]
struct TickInfo<'s> {
  tick: u64,
  delta: Duration,
  scenes: &'s SceneStates,
}

/// Mutable run state borrowed by [GraphContext] during a tick.
struct RunState {
  caller: String,
  custom_data: Option<CustomData>,
  variables: Variables,
  rng: StdRng,
  commands: Vec<SceneCommand>,
  record_events: bool,
  events: Vec<ExecutionEvent>,
}

impl RunState {
  fn record(&mut self, event: ExecutionEvent) {
    if self.record_events {
      self.events.push(event);
    }
  }

  fn context<'a>(&'a mut self, info: TickInfo<'a>) -> GraphContext<'a> {
    GraphContext::new(
      &self.caller,
      self.custom_data.as_ref(),
      &mut self.variables,
      &mut self.rng,
      info.scenes,
      &mut self.commands,
      info.tick,
      info.delta,
    )
  }
}

/// Runtime for one microscene graph.
pub struct Microscene {
  graph: MicrosceneGraph,
  config: ExecutorConfig,
  state: GraphState,
  executing_stacks: Vec<usize>,
  executing_quit_stacks: Vec<usize>,
  /// Per-entry tick of the last stack update; an entry runs at most once per tick.
  last_updated: Vec<u64>,
  ticks: u64,
  run: RunState,
}

impl Microscene {
  pub fn new(graph: MicrosceneGraph, config: ExecutorConfig) -> Self {
    let rng = match config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    let entry_count = graph.len();
    Self {
      run: RunState {
        caller: graph.name().to_string(),
        custom_data: None,
        variables: graph.initial_variables().clone(),
        rng,
        commands: Vec::new(),
        record_events: config.record_events,
        events: Vec::new(),
      },
      graph,
      config,
      state: GraphState::NotStarted,
      executing_stacks: Vec::with_capacity(entry_count + 1),
      executing_quit_stacks: Vec::with_capacity(entry_count + 1),
      last_updated: vec![0; entry_count],
      ticks: 0,
    }
  }

  /// Sets the caller identity seen by nodes (defaults to the graph name).
  pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
    self.run.caller = caller.into();
    self
  }

  pub fn name(&self) -> &str {
    self.graph.name()
  }

  pub fn graph(&self) -> &MicrosceneGraph {
    &self.graph
  }

  pub fn config(&self) -> &ExecutorConfig {
    &self.config
  }

  pub fn state(&self) -> GraphState {
    self.state
  }

  /// Ticks run since construction.
  pub fn ticks(&self) -> u64 {
    self.ticks
  }

  pub fn variables(&self) -> &Variables {
    &self.run.variables
  }

  pub fn is_executing_any_node(&self) -> bool {
    !self.executing_stacks.is_empty() || !self.executing_quit_stacks.is_empty()
  }

  /// Entries on the main frontier, in frontier order.
  pub fn executing_entries(&self) -> Vec<EntryId> {
    self
      .executing_stacks
      .iter()
      .map(|i| self.graph.id_of(*i))
      .collect()
  }

  /// Entries on the quit frontier, in frontier order.
  pub fn executing_quit_entries(&self) -> Vec<EntryId> {
    self
      .executing_quit_stacks
      .iter()
      .map(|i| self.graph.id_of(*i))
      .collect()
  }

  /// Events recorded so far (empty unless `record_events` is on).
  pub fn events(&self) -> &[ExecutionEvent] {
    &self.run.events
  }

  pub fn take_events(&mut self) -> Vec<ExecutionEvent> {
    std::mem::take(&mut self.run.events)
  }

  /// Commands queued by nodes for the hosting director.
  pub fn drain_commands(&mut self) -> Vec<SceneCommand> {
    std::mem::take(&mut self.run.commands)
  }

  /// Starts or restarts the graph: clears both frontiers, resets every node
  /// and join counter, restores initial variables and seeds the main
  /// frontier from Root.
  #[instrument(level = "trace", skip(self, custom_data), fields(scene = %self.graph.name()))]
  pub fn start_executing_microscene(&mut self, custom_data: Option<CustomData>) {
    for entry in &mut self.graph.entries {
      entry.reached_from.clear();
      entry.active = None;
      for node in &mut entry.nodes {
        node.reset_state();
      }
    }
    self.executing_stacks.clear();
    self.executing_quit_stacks.clear();
    self.last_updated.iter_mut().for_each(|t| *t = 0);
    self.run.custom_data = custom_data;
    self.run.variables = self.graph.initial_variables().clone();
    self.run.commands.clear();
    self.set_state(GraphState::Executing);

    let scenes = SceneStates::new();
    let info = TickInfo {
      tick: self.ticks,
      delta: Duration::ZERO,
      scenes: &scenes,
    };
    let root = self.graph.root.clone();
    self.advance(Reach::Root, &root, Frontier::Main, info);
  }

  /// Abandons the main frontier and switches to the quit path.
  #[instrument(level = "trace", skip(self), fields(scene = %self.graph.name()))]
  pub fn finish(&mut self) {
    if self.state != GraphState::Executing {
      debug!(state = %self.state, "finish ignored");
      return;
    }
    let scenes = SceneStates::new();
    let info = TickInfo {
      tick: self.ticks,
      delta: Duration::ZERO,
      scenes: &scenes,
    };
    self.begin_finishing(info);
  }

  /// Advances one tick using the configured default delta.
  pub fn tick(&mut self) {
    self.tick_with_delta(self.config.default_delta());
  }

  pub fn tick_with_delta(&mut self, delta: Duration) {
    let scenes = SceneStates::new();
    self.tick_in(delta, &scenes);
  }

  /// Advances one tick with a view of sibling scene states.
  #[instrument(level = "trace", skip(self, scenes), fields(scene = %self.graph.name(), tick = self.ticks + 1))]
  pub(crate) fn tick_in(&mut self, delta: Duration, scenes: &SceneStates) {
    if !self.state.is_running() {
      return;
    }
    self.ticks += 1;
    let info = TickInfo {
      tick: self.ticks,
      delta,
      scenes,
    };

    if self.state == GraphState::Executing {
      self.run_frontier(Frontier::Main, info);
      if self.executing_stacks.is_empty() {
        debug!("main frontier empty, running quit path");
        self.begin_finishing(info);
      }
    }

    if self.state == GraphState::Finishing {
      self.run_frontier(Frontier::Quit, info);
      if self.executing_quit_stacks.is_empty() {
        self.set_state(GraphState::Finished);
      }
    }
  }

  fn frontier(&self, which: Frontier) -> &Vec<usize> {
    match which {
      Frontier::Main => &self.executing_stacks,
      Frontier::Quit => &self.executing_quit_stacks,
    }
  }

  fn frontier_mut(&mut self, which: Frontier) -> &mut Vec<usize> {
    match which {
      Frontier::Main => &mut self.executing_stacks,
      Frontier::Quit => &mut self.executing_quit_stacks,
    }
  }

  /// Updates every entry on `which`, including entries appended while iterating.
  fn run_frontier(&mut self, which: Frontier, info: TickInfo<'_>) {
    let mut i = 0;
    loop {
      let Some(&idx) = self.frontier(which).get(i) else {
        break;
      };
      let deferred = self.config.activation_policy == ActivationPolicy::NextTick
        && self.graph.entries[idx].activated_on == info.tick;
      if deferred || self.last_updated[idx] == info.tick {
        i += 1;
        continue;
      }

      match self.update_entry(idx, info) {
        Some(winner) => {
          self.frontier_mut(which).remove(i);
          self.graph.entries[idx].active = None;
          self.advance_graph_execution(idx, winner, which, info);
        }
        None => i += 1,
      }
    }
  }

  /// Runs one behaviour update; returns the winner index when the stack finished.
  fn update_entry(&mut self, idx: usize, info: TickInfo<'_>) -> Option<usize> {
    self.last_updated[idx] = info.tick;
    let policy = self.config.crash_policy;
    let entry = &mut self.graph.entries[idx];
    let result = {
      let mut ctx = self.run.context(info);
      let mut stack = StackContext::new(&mut ctx, &mut entry.nodes, policy);
      entry.behaviour.update(&mut stack)
    };

    let id = entry.id();
    for node in &mut entry.nodes {
      if let Some(reason) = node.take_crash() {
        let event = ExecutionEvent::NodeCrashed {
          tick: info.tick,
          entry: id,
          node: node.id().to_string(),
          reason,
        };
        self.run.record(event);
      }
    }

    match result {
      Ok(r) if r.finished => Some(r.winner_index),
      Ok(_) => None,
      Err(e) => {
        error!(entry = %id, error = %e, "stack behaviour faulted; entry stays active");
        self.run.record(ExecutionEvent::StackFaulted {
          tick: info.tick,
          entry: id,
          reason: e.to_string(),
        });
        None
      }
    }
  }

  /// Fans a finished entry out to its winning successor set.
  fn advance_graph_execution(
    &mut self,
    idx: usize,
    winner: usize,
    which: Frontier,
    info: TickInfo<'_>,
  ) {
    let entry = &self.graph.entries[idx];
    let id = entry.id();
    debug!(entry = %id, winner, "entry finished");
    self.run.record(ExecutionEvent::EntryFinished {
      tick: info.tick,
      entry: id,
      winner,
    });

    let outputs = match entry.arity() {
      OutputArity::SingleOutput => 1,
      OutputArity::MultipleOutput => entry.nodes().len().max(entry.connection_sets()),
    };
    if winner >= outputs {
      error!(entry = %id, winner, outputs, "winner index out of range; branch dropped");
      return;
    }
    let successors = entry
      .connection_set(winner)
      .map(<[usize]>::to_vec)
      .unwrap_or_default();
    self.advance(Reach::Entry(idx), &successors, which, info);
  }

  /// Records a reach from `from` on each successor and activates those whose
  /// join is satisfied. A source counts once per activation of the successor,
  /// however many times it fires.
  fn advance(&mut self, from: Reach, successors: &[usize], which: Frontier, info: TickInfo<'_>) {
    for &s in successors {
      let entry = &mut self.graph.entries[s];
      let threshold = entry.join_threshold();
      if entry.reached_from.contains(&from) {
        trace!(entry = %entry.id(), ?from, "join already reached by this source");
        continue;
      }
      if entry.reached_from.len() as u32 >= threshold {
        error!(
          entry = %entry.id(),
          reached = entry.reached_from.len(),
          threshold,
          "join overflow; predecessor counts were miscomputed"
        );
        entry.reached_from.clear();
      }
      entry.reached_from.push(from);
      if (entry.reached_from.len() as u32) < threshold {
        trace!(entry = %entry.id(), reached = entry.reached_from.len(), threshold, "join waiting");
        continue;
      }
      self.activate(s, which, info);
    }
  }

  /// Resets an entry's nodes and behaviour and puts it on `which`.
  fn activate(&mut self, idx: usize, which: Frontier, info: TickInfo<'_>) {
    let policy = self.config.crash_policy;
    let entry = &mut self.graph.entries[idx];
    entry.reached_from.clear();
    entry.activated_on = info.tick;
    for node in &mut entry.nodes {
      node.reset_state();
    }
    let started = {
      let mut ctx = self.run.context(info);
      let mut stack = StackContext::new(&mut ctx, &mut entry.nodes, policy);
      entry.behaviour.start(&mut stack)
    };
    let id = entry.id();
    if let Err(e) = started {
      error!(entry = %id, error = %e, "stack behaviour failed to start");
      self.run.record(ExecutionEvent::StackFaulted {
        tick: info.tick,
        entry: id,
        reason: e.to_string(),
      });
    }

    let current = entry.active;
    match current {
      Some(current) => {
        warn!(entry = %id, "entry reactivated while active; restarted in place");
        self.run.record(ExecutionEvent::EntryActivated {
          tick: info.tick,
          entry: id,
          quit_path: current == Frontier::Quit,
        });
      }
      None => {
        entry.active = Some(which);
        trace!(entry = %id, "entry activated");
        self.run.record(ExecutionEvent::EntryActivated {
          tick: info.tick,
          entry: id,
          quit_path: which == Frontier::Quit,
        });
        self.frontier_mut(which).push(idx);
      }
    }
  }

  fn begin_finishing(&mut self, info: TickInfo<'_>) {
    for idx in std::mem::take(&mut self.executing_stacks) {
      self.graph.entries[idx].active = None;
    }
    for entry in &mut self.graph.entries {
      if entry.active.is_none() {
        entry.reached_from.clear();
      }
    }
    self.set_state(GraphState::Finishing);
    let quit = self.graph.quit_root.clone();
    self.advance(Reach::QuitRoot, &quit, Frontier::Quit, info);
  }

  fn set_state(&mut self, state: GraphState) {
    if self.state == state {
      return;
    }
    info!(scene = %self.graph.name(), from = %self.state, to = %state, tick = self.ticks, "microscene state changed");
    self.state = state;
    self.run.record(ExecutionEvent::StateChanged {
      tick: self.ticks,
      state,
    });
  }
}

impl std::fmt::Debug for Microscene {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Microscene")
      .field("name", &self.graph.name())
      .field("state", &self.state)
      .field("ticks", &self.ticks)
      .field("executing", &self.executing_entries())
      .field("executing_quit", &self.executing_quit_entries())
      .finish()
  }
}
