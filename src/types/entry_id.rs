//! Identifier of a graph entry in persisted and built graphs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a graph entry.
///
/// Authored entries use positive ids. `0` and `-1` are reserved for the
/// synthetic Root and QuitRoot sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i32);

impl EntryId {
  pub const ROOT: EntryId = EntryId(0);
  pub const QUIT_ROOT: EntryId = EntryId(-1);

  /// True for Root and QuitRoot.
  pub fn is_reserved(self) -> bool {
    self.0 <= 0
  }
}

impl From<i32> for EntryId {
  fn from(id: i32) -> Self {
    EntryId(id)
  }
}

impl fmt::Display for EntryId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      EntryId::ROOT => write!(f, "root"),
      EntryId::QUIT_ROOT => write!(f, "quit_root"),
      EntryId(id) => write!(f, "{}", id),
    }
  }
}
