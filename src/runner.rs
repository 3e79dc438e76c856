//! Drives a microscene to completion outside a host loop.
//!
//! - [run_until_finished]: start a scene and tick it until it is Finished.
//! - [run_definition]: compile a definition with the built-in registries, then run it.
//!
//! Both produce a [RunSummary] carrying an [ExecutionReport], optionally
//! written to disk.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::compiler::compile_with_builtins;
use crate::config::ExecutorConfig;
use crate::error::CompileError;
use crate::executor::Microscene;
use crate::report_io;
use crate::types::{CustomData, ExecutionReport, GraphDefinition, GraphState};

/// Default tick limit for [RunOptions].
pub const DEFAULT_MAX_TICKS: u64 = 10_000;

/// Options for [run_until_finished].
#[derive(Clone)]
pub struct RunOptions {
  /// Give up once this many ticks ran without reaching Finished.
  pub max_ticks: u64,
  /// Delta per tick; the scene's configured default when `None`.
  pub delta: Option<Duration>,
  /// Passed to the scene on start.
  pub custom_data: Option<CustomData>,
  /// If set, the report is written here when the run stops.
  pub report_path: Option<PathBuf>,
}

impl Default for RunOptions {
  fn default() -> Self {
    Self {
      max_ticks: DEFAULT_MAX_TICKS,
      delta: None,
      custom_data: None,
      report_path: None,
    }
  }
}

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct RunSummary {
  pub final_state: GraphState,
  /// Ticks executed by this run.
  pub ticks: u64,
  pub report: ExecutionReport,
}

#[derive(Debug, Error)]
pub enum RunError {
  #[error(transparent)]
  Compile(#[from] CompileError),

  #[error("writing report: {0}")]
  Io(#[from] std::io::Error),

  #[error("scene '{}' still {} after {max_ticks} ticks", .summary.report.scene, .summary.final_state)]
  TickLimit {
    max_ticks: u64,
    summary: Box<RunSummary>,
  },
}

/// Starts `scene` and ticks it until Finished or `options.max_ticks` ran out.
#[instrument(level = "trace", skip(scene, options), fields(scene = %scene.name(), max_ticks = options.max_ticks))]
pub fn run_until_finished(scene: &mut Microscene, options: RunOptions) -> Result<RunSummary, RunError> {
  let started_at = Utc::now().to_rfc3339();
  let delta = options.delta.unwrap_or_else(|| scene.config().default_delta());
  let first_tick = scene.ticks();
  scene.start_executing_microscene(options.custom_data.clone());

  while scene.state().is_running() && scene.ticks() - first_tick < options.max_ticks {
    scene.tick_with_delta(delta);
  }

  let ticks = scene.ticks() - first_tick;
  let summary = RunSummary {
    final_state: scene.state(),
    ticks,
    report: ExecutionReport {
      version: ExecutionReport::VERSION,
      scene: scene.name().to_string(),
      started_at,
      finished_at: Some(Utc::now().to_rfc3339()),
      final_state: scene.state(),
      ticks,
      events: scene.take_events(),
    },
  };

  if let Some(path) = &options.report_path {
    report_io::save_report(path, &summary.report)?;
    info!(path = %path.display(), "report written");
  }

  if summary.final_state != GraphState::Finished {
    warn!(state = %summary.final_state, ticks, "tick limit reached");
    return Err(RunError::TickLimit {
      max_ticks: options.max_ticks,
      summary: Box::new(summary),
    });
  }
  info!(ticks, "microscene finished");
  Ok(summary)
}

/// Compiles `def` with the built-in registries and runs it with `config`.
#[instrument(level = "trace", skip(def, config, options), fields(graph = %def.name))]
pub fn run_definition(
  def: &GraphDefinition,
  config: ExecutorConfig,
  options: RunOptions,
) -> Result<RunSummary, RunError> {
  let graph = compile_with_builtins(def)?;
  let mut scene = Microscene::new(graph, config);
  run_until_finished(&mut scene, options)
}
