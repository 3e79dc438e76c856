//! Time and tick based waits.

use std::time::Duration;

use serde::Deserialize;

use crate::context::GraphContext;
use crate::error::NodeError;
use crate::node::{Node, Progress};

/// Completes once the summed tick deltas reach `duration`.
#[derive(Debug, Clone)]
pub struct WaitNode {
  duration: Duration,
  elapsed: Duration,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaitParams {
  pub(crate) seconds: f64,
}

impl WaitNode {
  pub fn new(duration: Duration) -> Self {
    Self {
      duration,
      elapsed: Duration::ZERO,
    }
  }

  /// Rejects negative, NaN and overflowing durations.
  pub fn from_seconds(seconds: f64) -> Result<Self, NodeError> {
    Duration::try_from_secs_f64(seconds)
      .map(Self::new)
      .map_err(|e| NodeError::new(format!("invalid wait of {} seconds: {}", seconds, e)))
  }

  pub fn elapsed(&self) -> Duration {
    self.elapsed
  }
}

impl Node for WaitNode {
  fn on_start(&mut self, _ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    self.elapsed = Duration::ZERO;
    Ok(Progress::complete_if(self.duration.is_zero()))
  }

  fn on_update(&mut self, ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    self.elapsed += ctx.delta_time();
    Ok(Progress::complete_if(self.elapsed >= self.duration))
  }
}

/// Completes on its `ticks`-th update; `0` completes on start.
#[derive(Debug, Clone, Deserialize)]
pub struct WaitTicksNode {
  ticks: u32,
  #[serde(skip)]
  updates: u32,
}

impl WaitTicksNode {
  pub fn new(ticks: u32) -> Self {
    Self { ticks, updates: 0 }
  }
}

impl Node for WaitTicksNode {
  fn on_start(&mut self, _ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    self.updates = 0;
    Ok(Progress::complete_if(self.ticks == 0))
  }

  fn on_update(&mut self, _ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    self.updates += 1;
    Ok(Progress::complete_if(self.updates >= self.ticks))
  }
}
