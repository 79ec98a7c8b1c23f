//! Navigation over an open file.
//!
//! This module turns a container into a node tree, resolves nodes back to
//! container objects, and drives the session state machine that feeds the
//! display.

mod controller;
mod resolve;
mod tree_builder;

pub use controller::{DisplaySink, Navigator, PageRequest, SessionState, Viewer, ViewerId};
pub use resolve::{resolve, ResolvedObject};
pub use tree_builder::build_tree;
