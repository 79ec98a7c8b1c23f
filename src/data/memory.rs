//! In-memory storage backend.
//!
//! Holds whole container trees in memory behind the same [`Storage`] trait
//! as the file backends. Used for fixtures and tests.

use super::storage::{validate_selection, AxisSelector, ChildEntry, Container, Storage};
use super::{AttributeValue, NodeKind, ObjectPath, ScalarValue};
use crate::error::{Result, ViewerError};
use ndarray::{ArrayD, IxDyn, SliceInfoElem};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A dataset held in memory.
#[derive(Debug, Clone)]
pub struct MemoryDataset {
    /// Dataset values.
    pub data: ArrayD<ScalarValue>,
    /// Dataset attributes in insertion order.
    pub attributes: Vec<(String, AttributeValue)>,
}

impl MemoryDataset {
    /// Build a dataset from a shape and flat row-major values.
    ///
    /// Fails with [`ViewerError::Storage`] when `values.len()` does not match
    /// the shape.
    pub fn from_shape(shape: &[usize], values: Vec<ScalarValue>) -> Result<Self> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|e| {
            ViewerError::Storage(format!("values do not fit shape {:?}: {}", shape, e))
        })?;
        Ok(Self {
            data,
            attributes: Vec::new(),
        })
    }

    /// Build an integer dataset whose cells hold their own flat index.
    pub fn iota(shape: &[usize]) -> Self {
        let mut next = 0;
        let data = ArrayD::from_shape_fn(IxDyn(shape), |_| {
            let value = ScalarValue::Int(next);
            next += 1;
            value
        });
        Self {
            data,
            attributes: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attr(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.push((name.to_string(), value.into()));
        self
    }
}

/// A child of a [`MemoryGroup`].
#[derive(Debug, Clone)]
pub enum MemoryObject {
    /// Nested group.
    Group(MemoryGroup),
    /// Leaf dataset.
    Dataset(MemoryDataset),
}

/// A group held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryGroup {
    /// Children in insertion order.
    pub children: Vec<(String, MemoryObject)>,
    /// Group attributes in insertion order.
    pub attributes: Vec<(String, AttributeValue)>,
}

impl MemoryGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sub-group.
    pub fn with_group(mut self, name: &str, group: MemoryGroup) -> Self {
        self.children
            .push((name.to_string(), MemoryObject::Group(group)));
        self
    }

    /// Add a dataset.
    pub fn with_dataset(mut self, name: &str, dataset: MemoryDataset) -> Self {
        self.children
            .push((name.to_string(), MemoryObject::Dataset(dataset)));
        self
    }

    /// Add an attribute.
    pub fn with_attr(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.push((name.to_string(), value.into()));
        self
    }

    fn child(&self, name: &str) -> Option<&MemoryObject> {
        self.children
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, object)| object)
    }
}

/// Storage serving in-memory files by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<PathBuf, Rc<MemoryGroup>>,
    open_handles: Rc<Cell<usize>>,
}

impl MemoryStorage {
    /// Create a storage with no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, root: MemoryGroup) -> Self {
        self.files.insert(path.into(), Rc::new(root));
        self
    }

    /// Replace or remove a file, simulating external modification.
    pub fn set_file(&mut self, path: impl Into<PathBuf>, root: Option<MemoryGroup>) {
        let path = path.into();
        match root {
            Some(root) => {
                self.files.insert(path, Rc::new(root));
            },
            None => {
                self.files.remove(&path);
            },
        }
    }

    /// Number of containers currently open.
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }
}

impl Storage for MemoryStorage {
    type Container = MemoryContainer;

    fn open(&self, path: &Path) -> Result<MemoryContainer> {
        let root = self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ViewerError::open(path, "no such file"))?;
        self.open_handles.set(self.open_handles.get() + 1);
        Ok(MemoryContainer {
            root,
            open_handles: Rc::clone(&self.open_handles),
        })
    }
}

/// An open in-memory file.
#[derive(Debug)]
pub struct MemoryContainer {
    root: Rc<MemoryGroup>,
    open_handles: Rc<Cell<usize>>,
}

impl MemoryContainer {
    fn lookup(&self, at: &ObjectPath) -> Result<Lookup<'_>> {
        let mut current = Lookup::Group(&self.root);
        for segment in at.segments() {
            let Lookup::Group(group) = current else {
                return Err(ViewerError::Storage(format!("{} is not a group", at)));
            };
            current = match group.child(segment) {
                Some(MemoryObject::Group(g)) => Lookup::Group(g),
                Some(MemoryObject::Dataset(d)) => Lookup::Dataset(d),
                None => return Err(ViewerError::Storage(format!("{} not found", at))),
            };
        }
        Ok(current)
    }

    fn dataset(&self, at: &ObjectPath) -> Result<&MemoryDataset> {
        match self.lookup(at)? {
            Lookup::Dataset(d) => Ok(d),
            Lookup::Group(_) => Err(ViewerError::Storage(format!("{} is not a dataset", at))),
        }
    }
}

impl Drop for MemoryContainer {
    fn drop(&mut self) {
        self.open_handles
            .set(self.open_handles.get().saturating_sub(1));
    }
}

enum Lookup<'a> {
    Group(&'a MemoryGroup),
    Dataset(&'a MemoryDataset),
}

impl Container for MemoryContainer {
    fn list_children(&self, at: &ObjectPath) -> Result<Vec<ChildEntry>> {
        match self.lookup(at)? {
            Lookup::Group(group) => Ok(group
                .children
                .iter()
                .map(|(name, object)| {
                    let kind = match object {
                        MemoryObject::Group(_) => NodeKind::Group,
                        MemoryObject::Dataset(_) => NodeKind::Dataset,
                    };
                    ChildEntry::new(name.clone(), kind)
                })
                .collect()),
            Lookup::Dataset(_) => Ok(Vec::new()),
        }
    }

    fn attributes(&self, at: &ObjectPath) -> Result<Vec<(String, AttributeValue)>> {
        Ok(match self.lookup(at)? {
            Lookup::Group(group) => group.attributes.clone(),
            Lookup::Dataset(dataset) => dataset.attributes.clone(),
        })
    }

    fn shape(&self, at: &ObjectPath) -> Result<Vec<usize>> {
        Ok(self.dataset(at)?.data.shape().to_vec())
    }

    fn read_slice(
        &self,
        at: &ObjectPath,
        selection: &[AxisSelector],
    ) -> Result<ArrayD<ScalarValue>> {
        let dataset = self.dataset(at)?;
        validate_selection(dataset.data.shape(), selection)?;

        let info: Vec<SliceInfoElem> = selection
            .iter()
            .map(|sel| match *sel {
                AxisSelector::Free => SliceInfoElem::Slice {
                    start: 0,
                    end: None,
                    step: 1,
                },
                AxisSelector::Fixed(index) => SliceInfoElem::Index(index as isize),
            })
            .collect();

        Ok(dataset.data.slice(info.as_slice()).to_owned())
    }
}
