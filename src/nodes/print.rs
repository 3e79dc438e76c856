//! Logs a message through `tracing` and completes.

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::context::GraphContext;
use crate::error::NodeError;
use crate::node::{Node, Progress};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintLevel {
  #[default]
  Info,
  Warn,
  Error,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrintNode {
  pub message: String,
  #[serde(default)]
  pub level: PrintLevel,
}

impl PrintNode {
  pub fn new(message: impl Into<String>, level: PrintLevel) -> Self {
    Self {
      message: message.into(),
      level,
    }
  }

  /// The message with `{name}` placeholders replaced by scene variables.
  /// Unknown names are left as written.
  pub fn render(&self, ctx: &GraphContext<'_>) -> String {
    let mut out = String::with_capacity(self.message.len());
    let mut rest = self.message.as_str();
    while let Some(open) = rest.find('{') {
      let Some(close) = rest[open..].find('}') else {
        break;
      };
      let key = &rest[open + 1..open + close];
      out.push_str(&rest[..open]);
      match ctx.variable(key) {
        Some(v) => out.push_str(v),
        None => out.push_str(&rest[open..=open + close]),
      }
      rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
  }
}

impl Node for PrintNode {
  fn on_start(&mut self, ctx: &mut GraphContext<'_>) -> Result<Progress, NodeError> {
    let text = self.render(ctx);
    let caller = ctx.caller();
    match self.level {
      PrintLevel::Info => info!(caller, "{}", text),
      PrintLevel::Warn => warn!(caller, "{}", text),
      PrintLevel::Error => error!(caller, "{}", text),
    }
    Ok(Progress::Complete)
  }
}
