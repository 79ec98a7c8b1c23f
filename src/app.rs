//! Application state and logic.

use std::path::{Path, PathBuf};

use crate::data::{AttributeEntry, NetcdfStorage, Node, Storage};
use crate::data_viewer::DataViewerState;
use crate::error::ViewerError;
use crate::explorer::{AttributeTable, ExplorerState};
use crate::file_browser::FileBrowserState;
use crate::navigation::{DisplaySink, Navigator, PageRequest, Viewer, ViewerId};
use crate::shared::Theme;
use crate::util::{self, LayoutConfig};

/// Everything the navigation session draws into.
#[derive(Debug, Default)]
pub struct Screen {
    /// Explorer state (tree navigation + attributes).
    pub explorer: ExplorerState,
    /// Data viewer overlay state.
    pub data_viewer: DataViewerState,
    /// Status message.
    pub status: String,
    /// Error message of the last failed action.
    pub error_message: Option<String>,
}

impl DisplaySink for Screen {
    fn show_tree(&mut self, root: &Node) {
        self.explorer.set_tree(root);
        self.error_message = None;
    }

    fn clear_tree(&mut self) {
        self.explorer.clear();
    }

    fn show_attributes(&mut self, node: &Node, entries: &[AttributeEntry]) {
        self.explorer.attributes = Some(AttributeTable {
            path: node.path(),
            entries: entries.to_vec(),
        });
        self.explorer.attribute_scroll = 0;
        self.error_message = None;
    }

    fn clear_attributes(&mut self) {
        self.explorer.attributes = None;
        self.explorer.attribute_scroll = 0;
    }

    fn show_viewer(&mut self, id: ViewerId, viewer: &Viewer) {
        self.data_viewer.show(id);
        if let Viewer::Table(view) = viewer {
            self.data_viewer.clamp_scroll(view.rows(), view.cols());
            if view.has_paging() {
                self.status = format!("{}: page {}", view.name(), view.page_index());
                return;
            }
        }
        self.status = format!("Viewing {}", viewer.name());
    }

    fn report_error(&mut self, error: &ViewerError) {
        self.error_message = Some(error.to_string());
    }
}

/// Application state.
#[derive(Debug)]
pub struct App<S: Storage = NetcdfStorage> {
    /// Navigation session.
    pub navigator: Navigator<S>,
    /// Panels fed by the session.
    pub screen: Screen,
    /// File browser state.
    pub file_browser: FileBrowserState,
    /// File browser mode.
    pub file_browser_mode: bool,
    /// Current theme.
    pub theme: Theme,
    /// Panel sizes.
    pub layout: LayoutConfig,
}

impl App<NetcdfStorage> {
    /// Create an application reading files through netCDF.
    pub fn new(file_path: Option<PathBuf>) -> Self {
        Self::with_storage(NetcdfStorage, file_path)
    }
}

impl<S: Storage> App<S> {
    /// Create an application on top of `storage`.
    ///
    /// A directory starts the file browser there, a file is opened directly.
    pub fn with_storage(storage: S, file_path: Option<PathBuf>) -> Self {
        let mut app = Self {
            navigator: Navigator::new(storage),
            screen: Screen {
                status: "Ready".to_string(),
                ..Screen::default()
            },
            file_browser: FileBrowserState::new(),
            file_browser_mode: false,
            theme: Theme::default(),
            layout: LayoutConfig::default(),
        };

        match file_path {
            Some(path) if path.is_dir() => {
                app.file_browser.open_dir(path);
                app.file_browser_mode = true;
            },
            Some(path) => app.load_file(path),
            None => {
                app.file_browser.load_directory();
                app.file_browser_mode = true;
            },
        }

        app
    }

    /// Open a file, replacing the current one.
    pub fn load_file(&mut self, path: PathBuf) {
        let path = std::fs::canonicalize(&path).unwrap_or(path);
        let name = file_label(&path);
        self.screen.status = format!("Loading {}...", name);

        match self.navigator.open_file(&path, &mut self.screen) {
            Ok(()) => {
                self.screen.status = format!("{} loaded", name);
                if let Some(parent) = path.parent() {
                    self.file_browser.current_dir = parent.to_path_buf();
                }
                self.select_current();
            },
            Err(_) => {
                self.screen.status = "Error loading file".to_string();
            },
        }
    }

    /// Close the open file. Open viewers stay.
    pub fn close_file(&mut self) {
        if self.navigator.file().is_none() {
            self.screen.status = "No file loaded".to_string();
            return;
        }
        self.navigator.close_file(&mut self.screen);
        self.screen.status = "File closed".to_string();
    }

    /// Get the current node.
    pub fn current_node(&self) -> Option<&Node> {
        self.screen.explorer.current_node()
    }

    /// Show the attributes of the node under the cursor.
    pub fn select_current(&mut self) {
        let Some(node) = self.current_node().cloned() else {
            return;
        };
        // Failures are already on screen through the sink.
        let _ = self.navigator.select(&node, &mut self.screen);
    }

    /// Move the tree cursor up and select.
    pub fn cursor_up(&mut self) {
        if self.screen.explorer.cursor_up() {
            self.select_current();
        }
    }

    /// Move the tree cursor down and select.
    pub fn cursor_down(&mut self) {
        if self.screen.explorer.cursor_down() {
            self.select_current();
        }
    }

    /// Jump to the first tree item and select it.
    pub fn goto_first(&mut self) {
        self.screen.explorer.goto_first();
        self.select_current();
    }

    /// Jump to the last tree item and select it.
    pub fn goto_last(&mut self) {
        self.screen.explorer.goto_last();
        self.select_current();
    }

    /// Open a viewer on the node under the cursor.
    pub fn activate_current(&mut self) {
        let Some(node) = self.current_node().cloned() else {
            self.screen.status = "No node selected".to_string();
            return;
        };
        if let Ok(None) = self.navigator.activate(&node, &mut self.screen) {
            self.screen.status = "Data viewer only available for datasets".to_string();
        }
    }

    /// Apply a paging request to the viewer in front.
    pub fn page(&mut self, request: PageRequest) {
        let Some(id) = self.screen.data_viewer.active() else {
            return;
        };
        let _ = self.navigator.page(id, request, &mut self.screen);
    }

    /// Jump to the page typed into the page field.
    pub fn submit_page_input(&mut self) {
        if let Some(target) = self.screen.data_viewer.submit_page_input() {
            self.page(PageRequest::JumpTo(target));
        }
    }

    /// Close the viewer in front.
    pub fn close_viewer(&mut self) {
        if let Some(id) = self.screen.data_viewer.close() {
            self.navigator.close_viewer(id);
        }
        self.screen.status = "Data viewer closed".to_string();
    }

    /// Bring the next open viewer to the front.
    pub fn next_viewer(&mut self) {
        let active = self.screen.data_viewer.active();
        let ids: Vec<ViewerId> = self.navigator.viewers().map(|(id, _)| id).collect();
        let next = match active.and_then(|a| ids.iter().position(|&id| id == a)) {
            Some(pos) => ids.get((pos + 1) % ids.len()).copied(),
            None => ids.first().copied(),
        };
        if let Some(id) = next {
            if let Some(viewer) = self.navigator.viewer(id) {
                self.screen.show_viewer(id, viewer);
            }
        }
    }

    /// Hide the viewer overlay, or bring it back.
    pub fn toggle_data_viewer(&mut self) {
        if self.screen.data_viewer.visible {
            self.screen.data_viewer.visible = false;
            return;
        }
        let hidden = self.screen.data_viewer.active();
        match hidden.and_then(|id| Some((id, self.navigator.viewer(id)?))) {
            Some((id, viewer)) => self.screen.show_viewer(id, viewer),
            None if self.navigator.viewers().next().is_some() => self.next_viewer(),
            None => self.screen.status = "No open viewers".to_string(),
        }
    }

    /// The viewer in front.
    pub fn active_viewer(&self) -> Option<&Viewer> {
        self.navigator.viewer(self.screen.data_viewer.active()?)
    }

    /// Rows and columns of the grid in front.
    pub fn active_grid_size(&self) -> (usize, usize) {
        match self.active_viewer() {
            Some(Viewer::Table(view)) => (view.rows(), view.cols()),
            _ => (0, 0),
        }
    }

    /// Copy the current page of the viewer in front.
    pub fn copy_page(&mut self) {
        let result = match self.active_viewer() {
            Some(Viewer::Table(view)) => util::copy_page(view),
            _ => {
                self.screen.status = "Nothing to copy".to_string();
                return;
            },
        };
        let message = match result {
            Ok(()) => "Page copied!".to_string(),
            Err(e) => format!("Copy failed: {}", e),
        };
        self.screen.data_viewer.set_status(message);
    }

    /// Copy the path of the node under the cursor.
    pub fn copy_node_path(&mut self) {
        let result = match self.current_node() {
            Some(node) => util::copy_node_path(node).map(|()| node.path()),
            None => {
                self.screen.status = "No node selected".to_string();
                return;
            },
        };
        self.screen.status = match result {
            Ok(path) => format!("Copied {}!", path),
            Err(e) => format!("Copy failed: {}", e),
        };
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.screen.status = format!("Theme: {}", self.theme.name());
    }

    /// Toggle show hidden files.
    pub fn toggle_hidden(&mut self) {
        self.file_browser.toggle_hidden();
        self.screen.status = format!(
            "Show hidden: {}",
            if self.file_browser.show_hidden {
                "ON"
            } else {
                "OFF"
            }
        );
    }

    /// Open the selected file or enter the selected directory.
    pub fn browser_select(&mut self) {
        if let Some(path) = self.file_browser.select_current() {
            self.file_browser_mode = false;
            self.load_file(path);

            if self.screen.error_message.is_some() {
                self.file_browser_mode = true;
                self.screen.status =
                    "Error loading file (press q to quit, navigate to try another)".to_string();
            }
        }
    }

    /// Navigate to parent directory in file browser.
    pub fn browser_parent(&mut self) {
        self.file_browser.go_to_parent();
        self.screen.status = format!("Browsing: {}", self.file_browser.current_dir.display());
    }

    /// Move cursor up in file browser.
    pub fn browser_up(&mut self) {
        self.file_browser.cursor_up();
    }

    /// Move cursor down in file browser.
    pub fn browser_down(&mut self) {
        self.file_browser.cursor_down();
    }

    /// Leave the file browser if a file is open.
    pub fn close_file_browser(&mut self) {
        if self.navigator.file().is_some() {
            self.file_browser_mode = false;
        }
    }

    /// Open file browser next to the current file.
    pub fn open_file_browser_at_current(&mut self) {
        let start_dir = self
            .navigator
            .file()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        self.file_browser.open_dir(start_dir);
        self.file_browser_mode = true;
        self.screen.status = format!("File browser: {}", self.file_browser.current_dir.display());
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{MemoryDataset, MemoryGroup, MemoryStorage};
    use crate::navigation::SessionState;

    fn app() -> App<MemoryStorage> {
        let root = MemoryGroup::new().with_attr("title", "demo").with_group(
            "g1",
            MemoryGroup::new()
                .with_attr("units", "m")
                .with_dataset("d1", MemoryDataset::iota(&[3, 3]))
                .with_dataset("cube", MemoryDataset::iota(&[2, 2, 3])),
        );
        let storage = MemoryStorage::new().with_file("demo.h5", root);
        App::with_storage(storage, Some(PathBuf::from("demo.h5")))
    }

    fn goto(app: &mut App<MemoryStorage>, path: &str) {
        app.goto_first();
        while app.current_node().map(Node::path).as_deref() != Some(path) {
            if app.current_node().is_some_and(Node::is_group) {
                app.screen.explorer.expand_current();
            }
            assert!(app.screen.explorer.cursor_down(), "{} not found", path);
        }
        app.select_current();
    }

    #[test]
    fn opening_selects_the_root() {
        let app = app();
        assert!(!app.file_browser_mode);
        assert_eq!(app.screen.status, "demo.h5 loaded");
        let table = app.screen.explorer.attributes.as_ref().unwrap();
        assert_eq!(table.path, "/");
        assert_eq!(table.entries[0].name, "title");
    }

    #[test]
    fn moving_the_cursor_refreshes_attributes() {
        let mut app = app();
        app.cursor_down();
        let table = app.screen.explorer.attributes.as_ref().unwrap();
        assert_eq!(table.path, "/g1/");
        assert_eq!(table.entries.len(), 1);
    }

    #[test]
    fn enter_on_a_group_opens_nothing() {
        let mut app = app();
        goto(&mut app, "/g1/");
        app.activate_current();
        assert!(!app.screen.data_viewer.visible);
        assert_eq!(app.navigator.viewers().count(), 0);
    }

    #[test]
    fn paging_through_the_app() {
        let mut app = app();
        goto(&mut app, "/g1/cube");
        app.activate_current();
        assert!(app.screen.data_viewer.visible);

        app.page(PageRequest::Advance(1));
        app.screen.data_viewer.start_page_input();
        app.screen.data_viewer.page_input_push('9');
        app.submit_page_input();

        let Some(Viewer::Table(view)) = app.active_viewer() else {
            panic!("expected a table");
        };
        assert_eq!(view.page_index(), 1);
        assert_eq!(app.screen.status, "cube: page 1");
    }

    #[test]
    fn viewers_outlive_the_file() {
        let mut app = app();
        goto(&mut app, "/g1/d1");
        app.activate_current();
        app.close_file();

        assert_eq!(app.navigator.state(), SessionState::Closed);
        assert!(!app.screen.explorer.has_tree());
        assert!(app.screen.data_viewer.visible);
        assert_eq!(app.active_grid_size(), (3, 3));

        app.close_viewer();
        assert!(app.active_viewer().is_none());
    }

    #[test]
    fn tab_cycles_open_viewers() {
        let mut app = app();
        goto(&mut app, "/g1/d1");
        app.activate_current();
        goto(&mut app, "/g1/cube");
        app.activate_current();
        assert_eq!(app.active_viewer().map(Viewer::name), Some("cube"));

        app.next_viewer();
        assert_eq!(app.active_viewer().map(Viewer::name), Some("d1"));
        app.next_viewer();
        assert_eq!(app.active_viewer().map(Viewer::name), Some("cube"));
    }

    #[test]
    fn failed_open_shows_the_error_and_keeps_the_tree() {
        let mut app = app();
        app.load_file(PathBuf::from("missing.h5"));
        assert!(app.screen.error_message.is_some());
        assert!(app.screen.explorer.has_tree());
        assert_eq!(app.navigator.file(), Some(Path::new("demo.h5")));
    }
}
