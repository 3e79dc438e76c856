//! Executor configuration: defaults, serde, and environment overrides.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// How stacks treat a crashed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrashPolicy {
  /// A crashed node counts as finished, so its stack can still complete.
  #[default]
  TreatAsFinished,
  /// A crashed node never completes; the branch stalls.
  Stall,
}

/// When entries activated during a tick first run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationPolicy {
  /// Newly activated entries are visited later in the same tick.
  #[default]
  SameTick,
  /// Newly activated entries wait for the next tick.
  NextTick,
}

impl std::str::FromStr for CrashPolicy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "treat_as_finished" | "finish" => Ok(CrashPolicy::TreatAsFinished),
      "stall" => Ok(CrashPolicy::Stall),
      other => Err(format!("unknown crash policy '{}'", other)),
    }
  }
}

impl std::str::FromStr for ActivationPolicy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "same_tick" => Ok(ActivationPolicy::SameTick),
      "next_tick" => Ok(ActivationPolicy::NextTick),
      other => Err(format!("unknown activation policy '{}'", other)),
    }
  }
}

/// Env var overriding [ExecutorConfig::seed].
pub const ENV_SEED: &str = "MICROSCENE_SEED";
/// Env var overriding [ExecutorConfig::crash_policy].
pub const ENV_CRASH_POLICY: &str = "MICROSCENE_CRASH_POLICY";
/// Env var overriding [ExecutorConfig::activation_policy].
pub const ENV_ACTIVATION_POLICY: &str = "MICROSCENE_ACTIVATION_POLICY";
/// Env var overriding [ExecutorConfig::record_events] (`1`/`true`).
pub const ENV_RECORD_EVENTS: &str = "MICROSCENE_RECORD_EVENTS";

/// Settings for one microscene executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
  pub crash_policy: CrashPolicy,
  pub activation_policy: ActivationPolicy,
  /// Collect [crate::types::ExecutionEvent]s while running.
  pub record_events: bool,
  /// Seed for random stacks; entropy when `None`.
  pub seed: Option<u64>,
  /// Delta time used by [crate::Microscene::tick].
  pub default_delta_ms: u64,
}

impl Default for ExecutorConfig {
  fn default() -> Self {
    Self {
      crash_policy: CrashPolicy::default(),
      activation_policy: ActivationPolicy::default(),
      record_events: false,
      seed: None,
      default_delta_ms: 16,
    }
  }
}

impl ExecutorConfig {
  pub fn default_delta(&self) -> Duration {
    Duration::from_millis(self.default_delta_ms)
  }

  /// Applies `MICROSCENE_*` environment overrides. Unparseable values are
  /// logged and ignored.
  #[instrument(level = "trace", skip(self))]
  pub fn apply_env(mut self) -> Self {
    self.apply_overrides(|key| env::var(key).ok());
    self
  }

  pub(crate) fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup(ENV_SEED) {
      match v.trim().parse::<u64>() {
        Ok(seed) => self.seed = Some(seed),
        Err(e) => warn!(var = ENV_SEED, value = %v, error = %e, "ignoring invalid override"),
      }
    }
    if let Some(v) = lookup(ENV_CRASH_POLICY) {
      match v.parse() {
        Ok(p) => self.crash_policy = p,
        Err(e) => warn!(var = ENV_CRASH_POLICY, error = %e, "ignoring invalid override"),
      }
    }
    if let Some(v) = lookup(ENV_ACTIVATION_POLICY) {
      match v.parse() {
        Ok(p) => self.activation_policy = p,
        Err(e) => warn!(var = ENV_ACTIVATION_POLICY, error = %e, "ignoring invalid override"),
      }
    }
    if let Some(v) = lookup(ENV_RECORD_EVENTS) {
      self.record_events = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
    }
  }
}
