//! Utility functions.
//!
//! This module provides clipboard access and layout configuration.

mod clipboard;
pub mod layout_config;

pub use clipboard::{copy_node_path, copy_page};
pub use layout_config::LayoutConfig;
