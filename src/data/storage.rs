//! The read-only storage boundary.
//!
//! The core never parses file bytes itself. Everything it knows about a file
//! comes through [`Storage`] (open) and [`Container`] (one open handle).
//! Dropping a container closes it.

use super::{AttributeValue, NodeKind, ObjectPath, ScalarValue};
use crate::error::Result;
use ndarray::ArrayD;
use std::path::Path;

/// One entry returned by [`Container::list_children`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    /// Child name (a single path segment).
    pub name: String,
    /// Whether the child is a group or a dataset.
    pub kind: NodeKind,
}

impl ChildEntry {
    /// Create a child entry.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Selection of a single axis when reading a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSelector {
    /// The whole axis is read and kept in the result.
    Free,
    /// The axis is pinned to one index and dropped from the result.
    Fixed(usize),
}

impl AxisSelector {
    /// Start and count of the selected range on an axis of length `len`.
    pub fn extent(self, len: usize) -> (usize, usize) {
        match self {
            AxisSelector::Free => (0, len),
            AxisSelector::Fixed(index) => (index, 1),
        }
    }
}

/// Check a selection against a dataset shape.
pub fn validate_selection(shape: &[usize], selection: &[AxisSelector]) -> Result<()> {
    if shape.len() != selection.len() {
        return Err(crate::ViewerError::Storage(format!(
            "selection has {} axes, dataset has {}",
            selection.len(),
            shape.len()
        )));
    }
    for (axis, (&len, sel)) in shape.iter().zip(selection).enumerate() {
        if let AxisSelector::Fixed(index) = *sel {
            if index >= len {
                return Err(crate::ViewerError::Storage(format!(
                    "index {} out of bounds for axis {} of length {}",
                    index, axis, len
                )));
            }
        }
    }
    Ok(())
}

/// Shape of the array produced by reading `selection`: the free axes in order.
pub fn selection_shape(shape: &[usize], selection: &[AxisSelector]) -> Vec<usize> {
    shape
        .iter()
        .zip(selection)
        .filter(|(_, sel)| matches!(sel, AxisSelector::Free))
        .map(|(&len, _)| len)
        .collect()
}

/// An open, read-only hierarchical container.
pub trait Container {
    /// Children of the group at `at`, in native order.
    fn list_children(&self, at: &ObjectPath) -> Result<Vec<ChildEntry>>;

    /// Attributes of the object at `at`, in native order.
    fn attributes(&self, at: &ObjectPath) -> Result<Vec<(String, AttributeValue)>>;

    /// Shape of the dataset at `at`.
    fn shape(&self, at: &ObjectPath) -> Result<Vec<usize>>;

    /// Read the cells picked by `selection` (one selector per axis).
    ///
    /// The result has one axis per [`AxisSelector::Free`] entry, in order.
    fn read_slice(&self, at: &ObjectPath, selection: &[AxisSelector])
        -> Result<ArrayD<ScalarValue>>;
}

/// Opens containers by file path.
pub trait Storage {
    /// Handle type for one open file.
    type Container: Container;

    /// Open the file at `path` read-only.
    fn open(&self, path: &Path) -> Result<Self::Container>;
}
