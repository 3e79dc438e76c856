//! Hosts several named microscenes and ticks them together.
//!
//! Scenes tick in insertion order with a shared delta. Before each scene's
//! tick the director takes a fresh snapshot of every scene's state, and the
//! scene commands a scene queued are applied right after its tick, so a
//! scene started by an earlier one runs later in the same director tick.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::context::SceneCommand;
use crate::error::DirectorError;
use crate::executor::Microscene;
use crate::types::{CustomData, GraphState, SceneStates};

#[derive(Debug, Default)]
pub struct Director {
  scenes: Vec<Microscene>,
  index: HashMap<String, usize>,
  ticks: u64,
}

impl Director {
  pub fn new() -> Self {
    Self::default()
  }

  /// Hosts `scene` under its graph name.
  pub fn add(&mut self, scene: Microscene) -> Result<(), DirectorError> {
    let name = scene.name().to_string();
    if self.index.contains_key(&name) {
      return Err(DirectorError::DuplicateScene(name));
    }
    debug!(scene = %name, "scene added");
    self.index.insert(name, self.scenes.len());
    self.scenes.push(scene);
    Ok(())
  }

  /// (Re)starts the named scene.
  #[instrument(level = "trace", skip(self, custom_data))]
  pub fn start(&mut self, name: &str, custom_data: Option<CustomData>) -> Result<(), DirectorError> {
    let i = self.position(name)?;
    self.scenes[i].start_executing_microscene(custom_data);
    Ok(())
  }

  /// Asks the named scene to abandon its main path and run its quit path.
  pub fn finish(&mut self, name: &str) -> Result<(), DirectorError> {
    let i = self.position(name)?;
    self.scenes[i].finish();
    Ok(())
  }

  pub fn scene(&self, name: &str) -> Option<&Microscene> {
    self.index.get(name).map(|i| &self.scenes[*i])
  }

  pub fn scene_mut(&mut self, name: &str) -> Option<&mut Microscene> {
    self.index.get(name).map(|i| &mut self.scenes[*i])
  }

  /// Scene names in tick order.
  pub fn names(&self) -> Vec<&str> {
    self.scenes.iter().map(Microscene::name).collect()
  }

  pub fn len(&self) -> usize {
    self.scenes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.scenes.is_empty()
  }

  pub fn ticks(&self) -> u64 {
    self.ticks
  }

  /// Current state of every hosted scene.
  pub fn states(&self) -> SceneStates {
    self
      .scenes
      .iter()
      .map(|s| (s.name().to_string(), s.state()))
      .collect()
  }

  /// True when no hosted scene is executing or finishing.
  pub fn all_finished(&self) -> bool {
    self.scenes.iter().all(|s| !s.state().is_running())
  }

  /// Ticks every scene with `delta`.
  #[instrument(level = "trace", skip(self), fields(tick = self.ticks + 1))]
  pub fn tick_with_delta(&mut self, delta: Duration) {
    self.ticks += 1;
    for i in 0..self.scenes.len() {
      let snapshot = self.states();
      self.scenes[i].tick_in(delta, &snapshot);
      let commands = self.scenes[i].drain_commands();
      for command in commands {
        self.apply(i, command);
      }
    }
  }

  fn apply(&mut self, from: usize, command: SceneCommand) {
    match command {
      SceneCommand::Start { scene } => match self.index.get(&scene) {
        Some(&target) => {
          info!(from = %self.scenes[from].name(), scene = %scene, "starting scene on request");
          self.scenes[target].start_executing_microscene(None);
        }
        None => warn!(from = %self.scenes[from].name(), scene = %scene, "start requested for unknown scene"),
      },
    }
  }

  fn position(&self, name: &str) -> Result<usize, DirectorError> {
    self
      .index
      .get(name)
      .copied()
      .ok_or_else(|| DirectorError::UnknownScene(name.to_string()))
  }

  /// Number of scenes currently in `state`.
  pub fn count_in(&self, state: GraphState) -> usize {
    self.scenes.iter().filter(|s| s.state() == state).count()
  }
}
