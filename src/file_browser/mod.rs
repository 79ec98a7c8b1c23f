//! File browser feature - picking an HDF file to open.
//!
//! Lists the directories of the browsed directory and the files whose
//! extension is one of [`HDF_EXTENSIONS`]. Everything else is hidden.

pub mod ui;

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions the viewer opens, without the leading dot.
pub const HDF_EXTENSIONS: [&str; 7] = ["h5", "he5", "hdf5", "h4", "he4", "hdf4", "hdf"];

/// Container generation implied by a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdfFormat {
    /// `.h4`, `.he4`, `.hdf4` and the bare `.hdf`.
    Hdf4,
    /// `.h5`, `.he5`, `.hdf5`.
    Hdf5,
}

impl HdfFormat {
    /// Short tag shown next to the file name.
    pub fn tag(self) -> &'static str {
        match self {
            HdfFormat::Hdf4 => "HDF4",
            HdfFormat::Hdf5 => "HDF5",
        }
    }
}

/// Format of `path` judged by its extension (case-insensitive).
pub fn hdf_format(path: &Path) -> Option<HdfFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "h5" | "he5" | "hdf5" => Some(HdfFormat::Hdf5),
        "h4" | "he4" | "hdf4" | "hdf" => Some(HdfFormat::Hdf4),
        _ => None,
    }
}

/// Whether `path` has one of the HDF extensions (case-insensitive).
pub fn is_hdf_file(path: &Path) -> bool {
    hdf_format(path).is_some()
}

/// What a listed entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// The `..` entry.
    Parent,
    /// A directory, or a symlink resolving to one.
    Directory,
    /// An openable file.
    File(HdfFormat),
}

/// One row of the listing.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Name shown in the list.
    pub name: String,
    /// Entry kind.
    pub kind: EntryKind,
    /// Size in bytes, for files.
    pub size: Option<u64>,
    /// Whether the entry itself is a symlink.
    pub is_symlink: bool,
}

impl FileEntry {
    fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_string();
        let is_symlink = path.is_symlink();
        // metadata() follows symlinks
        let metadata = fs::metadata(&path).ok()?;

        let (kind, size) = if metadata.is_dir() {
            (EntryKind::Directory, None)
        } else {
            (EntryKind::File(hdf_format(&path)?), Some(metadata.len()))
        };

        Some(Self {
            path,
            name,
            kind,
            size,
            is_symlink,
        })
    }

    fn sort_rank(&self) -> u8 {
        match self.kind {
            EntryKind::Parent => 0,
            EntryKind::Directory => 1,
            EntryKind::File(_) => 2,
        }
    }
}

/// File browser state.
#[derive(Debug)]
pub struct FileBrowserState {
    /// Directory being browsed.
    pub current_dir: PathBuf,
    /// Listed entries, `..` first, then directories, then files.
    pub entries: Vec<FileEntry>,
    /// Cursor position.
    pub cursor: usize,
    /// Scroll offset.
    pub scroll: usize,
    /// Show dot-prefixed entries.
    pub show_hidden: bool,
    /// Why the directory could not be listed.
    pub error: Option<String>,
}

impl FileBrowserState {
    /// Browse the working directory.
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            entries: Vec::new(),
            cursor: 0,
            scroll: 0,
            show_hidden: false,
            error: None,
        }
    }

    /// Browse `dir`.
    pub fn open_dir(&mut self, dir: PathBuf) {
        self.current_dir = dir;
        self.load_directory();
    }

    /// Re-read the current directory.
    pub fn load_directory(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.scroll = 0;
        self.error = None;

        if let Some(parent) = self.current_dir.parent() {
            self.entries.push(FileEntry {
                path: parent.to_path_buf(),
                name: "..".to_string(),
                kind: EntryKind::Parent,
                size: None,
                is_symlink: false,
            });
        }

        let listing = match fs::read_dir(&self.current_dir) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!("Cannot list {}: {}", self.current_dir.display(), e);
                self.error = Some(e.to_string());
                return;
            },
        };

        let show_hidden = self.show_hidden;
        self.entries.extend(
            listing
                .flatten()
                .filter_map(|entry| FileEntry::from_path(entry.path()))
                .filter(|entry| show_hidden || !entry.name.starts_with('.')),
        );
        self.entries.sort_by(compare_entries);
    }

    /// Move cursor up.
    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor down.
    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    /// Entry under the cursor.
    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.cursor)
    }

    /// Enter the selected directory, or return the selected file.
    pub fn select_current(&mut self) -> Option<PathBuf> {
        let entry = self.current_entry()?;
        let (kind, path) = (entry.kind, entry.path.clone());
        match kind {
            EntryKind::File(_) => Some(path),
            EntryKind::Parent => {
                self.go_to_parent();
                None
            },
            EntryKind::Directory => {
                self.open_dir(path);
                None
            },
        }
    }

    /// Go up one directory, keeping the cursor on the one we came from.
    pub fn go_to_parent(&mut self) {
        let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) else {
            return;
        };
        let from = std::mem::replace(&mut self.current_dir, parent);
        self.load_directory();
        if let Some(pos) = self.entries.iter().position(|e| e.path == from) {
            self.cursor = pos;
        }
    }

    /// Toggle show hidden files.
    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        self.load_directory();
    }

    /// Adjust scroll to keep cursor visible.
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        }
        if self.cursor >= self.scroll + viewport_height {
            self.scroll = self.cursor + 1 - viewport_height;
        }
    }
}

impl Default for FileBrowserState {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_entries(a: &FileEntry, b: &FileEntry) -> Ordering {
    a.sort_rank()
        .cmp(&b.sort_rank())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}
