//! h5lens - A terminal-based viewer for HDF4 and HDF5 files.
//!
//! h5lens shows the group/dataset hierarchy of an HDF file as a tree, the
//! attributes of the selected node as a table, and opens datasets either as
//! a paged grid of values or, for datasets tagged `CLASS = "IMAGE"`, as an
//! image.
//!
//! # Features
//!
//! - Tree-based navigation with expand/collapse
//! - Attribute table with type and size columns
//! - Paged views over the third axis of a dataset
//! - Vim-style keyboard shortcuts
//! - Gruvbox color themes
//! - Clipboard integration
//!
//! # Example
//!
//! ```ignore
//! use h5lens::data::NetcdfStorage;
//! use h5lens::navigation::Navigator;
//! use std::path::Path;
//!
//! let mut navigator = Navigator::new(NetcdfStorage);
//! navigator.open_file(Path::new("data.h5"), &mut sink)?;
//! let root = navigator.tree().unwrap();
//! println!("Loaded {} with {} nodes", root.label(), root.count());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod data;
pub mod data_viewer;
pub mod error;
pub mod explorer;
pub mod file_browser;
pub mod navigation;
pub mod shared;
pub mod ui;
pub mod util;

pub use error::{Result, ViewerError};
