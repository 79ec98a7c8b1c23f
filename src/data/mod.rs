//! Data access and representation.
//!
//! This module defines the node model, the read-only storage boundary with
//! its netCDF/HDF5 and in-memory backends, and attribute projection.

pub mod attributes;
pub mod memory;
mod netcdf_store;
mod node;
pub mod storage;
mod value;

pub use attributes::{AttributeEntry, ValueKind};
pub use netcdf_store::{NetcdfContainer, NetcdfStorage};
pub use node::{Node, NodeKind, ObjectPath, SEPARATOR};
pub use storage::{AxisSelector, ChildEntry, Container, Storage};
pub use value::{trim_nul, AttributeValue, ScalarValue};
