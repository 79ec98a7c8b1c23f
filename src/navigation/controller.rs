//! Navigation session: file lifecycle, selection and dataset viewers.

use super::resolve::{resolve, ResolvedObject};
use super::tree_builder::build_tree;
use crate::data::attributes::project;
use crate::data::{AttributeEntry, Node, NodeKind, Storage};
use crate::data_viewer::image::{classify, ImageView};
use crate::data_viewer::slicer::DatasetView;
use crate::error::{Result, ViewerError};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No file open.
    #[default]
    Closed,
    /// A file is open and its tree is shown.
    Open,
    /// A node is selected and its attributes are shown.
    NodeSelected,
    /// At least one dataset viewer was opened from this session.
    DatasetOpen,
}

/// Identifier of an open viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewerId(u64);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An open dataset viewer.
#[derive(Debug, Clone)]
pub enum Viewer {
    /// Paged grid of values.
    Table(DatasetView),
    /// Decoded image.
    Image(ImageView),
}

impl Viewer {
    /// Name of the dataset being viewed.
    pub fn name(&self) -> &str {
        match self {
            Viewer::Table(view) => view.name(),
            Viewer::Image(view) => view.name(),
        }
    }

    /// File the dataset was read from.
    pub fn source(&self) -> &Path {
        match self {
            Viewer::Table(view) => view.source(),
            Viewer::Image(view) => view.source(),
        }
    }
}

/// A paging request from the viewer controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Move by a number of pages (Prev is -1, Next is +1).
    Advance(isize),
    /// Go to a page typed into the page field.
    JumpTo(i64),
}

/// Receiver of everything the session wants displayed.
pub trait DisplaySink {
    /// Show a freshly built tree.
    fn show_tree(&mut self, root: &Node);
    /// Remove the tree.
    fn clear_tree(&mut self);
    /// Show the attribute table of `node`.
    fn show_attributes(&mut self, node: &Node, entries: &[AttributeEntry]);
    /// Empty the attribute table.
    fn clear_attributes(&mut self);
    /// Show a new viewer or refresh an existing one.
    fn show_viewer(&mut self, id: ViewerId, viewer: &Viewer);
    /// Surface a failed action.
    fn report_error(&mut self, error: &ViewerError);
}

/// The single navigation session over one file.
///
/// No container stays open between calls: every action opens the file by
/// path through the storage and drops the handle before returning.
#[derive(Debug)]
pub struct Navigator<S: Storage> {
    storage: S,
    state: SessionState,
    file: Option<PathBuf>,
    tree: Option<Node>,
    viewers: BTreeMap<ViewerId, Viewer>,
    next_id: u64,
}

impl<S: Storage> Navigator<S> {
    /// Create a closed session reading through `storage`.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: SessionState::Closed,
            file: None,
            tree: None,
            viewers: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable storage backend.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Path of the open file.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Tree of the open file.
    pub fn tree(&self) -> Option<&Node> {
        self.tree.as_ref()
    }

    /// Open `path` and show its tree.
    ///
    /// On failure the previous session, tree included, is left as it was.
    pub fn open_file<D: DisplaySink>(&mut self, path: &Path, sink: &mut D) -> Result<()> {
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let root = {
            let container = match self.storage.open(path) {
                Ok(c) => c,
                Err(e) => return fail(sink, as_open_error(path, e)),
            };
            match build_tree(&container, &label) {
                Ok(root) => root,
                Err(e) => return fail(sink, as_open_error(path, e)),
            }
        };

        tracing::info!("Opened {} ({} nodes)", path.display(), root.count());
        sink.show_tree(&root);
        sink.clear_attributes();
        self.tree = Some(root);
        self.file = Some(path.to_path_buf());
        self.state = SessionState::Open;
        Ok(())
    }

    /// Select `node` and show its attributes.
    pub fn select<D: DisplaySink>(
        &mut self,
        node: &Node,
        sink: &mut D,
    ) -> Result<Vec<AttributeEntry>> {
        let entries = match self.with_resolved(node, |container, object| project(container, object)) {
            Ok(entries) => entries,
            Err(e) => return fail(sink, e),
        };

        sink.show_attributes(node, &entries);
        self.state = SessionState::NodeSelected;
        Ok(entries)
    }

    /// Open a viewer on a dataset node. Groups are ignored.
    pub fn activate<D: DisplaySink>(
        &mut self,
        node: &Node,
        sink: &mut D,
    ) -> Result<Option<ViewerId>> {
        if node.kind != NodeKind::Dataset {
            return Ok(None);
        }

        let source = match &self.file {
            Some(file) => file.clone(),
            None => return fail(sink, ViewerError::resolution(node.path())),
        };
        let opened = self.with_resolved(node, |container, object| {
            if object.kind != NodeKind::Dataset {
                return Ok(None);
            }
            let viewer = if classify(container, object)? {
                Viewer::Image(ImageView::open(container, &source, object)?)
            } else {
                Viewer::Table(DatasetView::open(container, &source, object)?)
            };
            Ok(Some(viewer))
        });

        let viewer = match opened {
            Ok(Some(viewer)) => viewer,
            Ok(None) => return Ok(None),
            Err(e) => return fail(sink, e),
        };

        let id = ViewerId(self.next_id);
        self.next_id += 1;
        tracing::info!("Opened viewer {} on {}", id, node.path());
        sink.show_viewer(id, &viewer);
        self.viewers.insert(id, viewer);
        self.state = SessionState::DatasetOpen;
        Ok(Some(id))
    }

    /// Close the file: drop the tree and clear the panels.
    ///
    /// Open viewers are left alone and keep paging by reopening their file.
    pub fn close_file<D: DisplaySink>(&mut self, sink: &mut D) {
        if let Some(file) = self.file.take() {
            tracing::info!("Closed {}", file.display());
        }
        self.tree = None;
        self.state = SessionState::Closed;
        sink.clear_tree();
        sink.clear_attributes();
    }

    /// Apply a paging request to viewer `id`.
    ///
    /// Returns `Ok(false)` when the request is refused or the viewer does not
    /// page; nothing changes in that case.
    pub fn page<D: DisplaySink>(
        &mut self,
        id: ViewerId,
        request: PageRequest,
        sink: &mut D,
    ) -> Result<bool> {
        let Some(Viewer::Table(view)) = self.viewers.get_mut(&id) else {
            return Ok(false);
        };

        let moved = match request {
            PageRequest::Advance(delta) => view.advance(&self.storage, delta),
            PageRequest::JumpTo(target) => view.jump_to(&self.storage, target),
        };
        match moved {
            Ok(true) => {
                if let Some(viewer) = self.viewers.get(&id) {
                    sink.show_viewer(id, viewer);
                }
                Ok(true)
            },
            Ok(false) => Ok(false),
            Err(e) => fail(sink, e),
        }
    }

    /// Close viewer `id`, returning it.
    pub fn close_viewer(&mut self, id: ViewerId) -> Option<Viewer> {
        let viewer = self.viewers.remove(&id)?;
        tracing::debug!("Closed viewer {}", id);
        if self.viewers.is_empty() && self.state == SessionState::DatasetOpen {
            self.state = SessionState::NodeSelected;
        }
        Some(viewer)
    }

    /// Viewer `id`, if open.
    pub fn viewer(&self, id: ViewerId) -> Option<&Viewer> {
        self.viewers.get(&id)
    }

    /// All open viewers, oldest first.
    pub fn viewers(&self) -> impl Iterator<Item = (ViewerId, &Viewer)> {
        self.viewers.iter().map(|(id, viewer)| (*id, viewer))
    }

    /// Open the file, resolve `node` and run `f` on it.
    fn with_resolved<T>(
        &self,
        node: &Node,
        f: impl FnOnce(&S::Container, &ResolvedObject) -> Result<T>,
    ) -> Result<T> {
        let file = self
            .file
            .as_deref()
            .ok_or_else(|| ViewerError::resolution(node.path()))?;
        let container = self.storage.open(file)?;
        let object = resolve(&container, node)?;
        f(&container, &object)
    }
}

fn as_open_error(path: &Path, error: ViewerError) -> ViewerError {
    match error {
        ViewerError::Open { .. } => error,
        other => ViewerError::open(path, other),
    }
}

fn fail<T, D: DisplaySink>(sink: &mut D, error: ViewerError) -> Result<T> {
    tracing::error!("{}", error);
    sink.report_error(&error);
    Err(error)
}
