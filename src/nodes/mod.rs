//! Built-in microscene nodes and the registry that builds nodes from
//! persisted definitions.
//!
//! Every built-in kind is registered under its `type` name by
//! [NodeRegistry::with_builtins]; applications add their own kinds with
//! [NodeRegistry::register].

mod empty;
mod print;
mod registry;
#[cfg(test)]
mod registry_test;
mod scenes;
#[cfg(test)]
mod scenes_test;
mod variables;
mod wait;

pub use empty::EmptyNode;
pub use print::{PrintLevel, PrintNode};
pub use registry::{NodeFactory, NodeRegistry, params};
pub use scenes::{StartMicrosceneNode, WaitForMicrosceneNode};
pub use variables::{SetVariableNode, VariableEqualsNode};
pub use wait::{WaitNode, WaitTicksNode};

pub const EMPTY: &str = "empty";
pub const PRINT: &str = "print";
pub const WAIT: &str = "wait";
pub const WAIT_TICKS: &str = "wait_ticks";
pub const SET_VARIABLE: &str = "set_variable";
pub const VARIABLE_EQUALS: &str = "variable_equals";
pub const START_MICROSCENE: &str = "start_microscene";
pub const WAIT_FOR_MICROSCENE: &str = "wait_for_microscene";
