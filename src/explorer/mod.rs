//! Explorer feature - file structure exploration.
//!
//! This module provides the tree panel (expand/collapse navigation over the
//! node tree) and the attribute panel of the selected node.

pub mod details;
pub mod tree;

use crate::data::{AttributeEntry, Node};
use std::collections::HashSet;

/// Explorer state - tree navigation plus the attribute table.
#[derive(Debug, Default)]
pub struct ExplorerState {
    /// All tree items in display order (only visible items).
    items: Vec<TreeItem>,
    /// Cursor position (index into items).
    cursor: usize,
    /// The root node for rebuilding.
    root: Option<Node>,
    /// Paths of expanded groups.
    expanded_paths: HashSet<String>,
    /// Scroll offset for the tree view.
    scroll_offset: usize,
    /// Attribute table of the selected node.
    pub attributes: Option<AttributeTable>,
    /// Scroll offset of the attribute table.
    pub attribute_scroll: usize,
}

/// A single item in the tree view.
#[derive(Debug, Clone)]
pub struct TreeItem {
    /// The node.
    pub node: Node,
    /// Nesting level.
    pub level: usize,
    /// Whether this node is expanded.
    pub expanded: bool,
}

/// Rows shown in the attribute panel.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeTable {
    /// Path of the node the rows belong to.
    pub path: String,
    /// One entry per attribute, in file order.
    pub entries: Vec<AttributeEntry>,
}

impl ExplorerState {
    /// Create a new explorer state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a freshly built tree with only the root expanded.
    pub fn set_tree(&mut self, root: &Node) {
        self.expanded_paths.clear();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_group() && node.expanded {
                self.expanded_paths.insert(node.path());
            }
            stack.extend(node.children.iter());
        }
        self.root = Some(root.clone());
        self.rebuild_visible_items();
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Drop the tree.
    pub fn clear(&mut self) {
        self.root = None;
        self.items.clear();
        self.expanded_paths.clear();
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Whether a tree is shown.
    pub fn has_tree(&self) -> bool {
        self.root.is_some()
    }

    /// Rebuild the visible items list based on expanded state.
    fn rebuild_visible_items(&mut self) {
        self.items.clear();
        let Some(root) = self.root.as_ref() else {
            return;
        };

        let mut stack = vec![(root, 0usize)];
        while let Some((node, level)) = stack.pop() {
            let expanded = self.expanded_paths.contains(&node.path());
            self.items.push(TreeItem {
                node: node.clone(),
                level,
                expanded,
            });
            if expanded {
                stack.extend(node.children.iter().rev().map(|c| (c, level + 1)));
            }
        }
    }

    /// Move the cursor up one position. Returns whether it moved.
    pub fn cursor_up(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            return true;
        }
        false
    }

    /// Move the cursor down one position. Returns whether it moved.
    pub fn cursor_down(&mut self) -> bool {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
            return true;
        }
        false
    }

    /// Adjust scroll to keep cursor visible.
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        }

        if self.cursor >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor.saturating_sub(viewport_height - 1);
        }
    }

    /// Get the current scroll offset.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Expand the group at the cursor.
    pub fn expand_current(&mut self) {
        if let Some(item) = self.items.get(self.cursor) {
            if item.node.is_group() && !item.expanded {
                self.expanded_paths.insert(item.node.path());
                self.rebuild_visible_items();
            }
        }
    }

    /// Collapse the group at the cursor.
    pub fn collapse_current(&mut self) {
        if let Some(item) = self.items.get(self.cursor) {
            if item.node.is_group() && item.expanded {
                self.expanded_paths.remove(&item.node.path());
                self.rebuild_visible_items();
            }
        }
    }

    /// Go to the first item.
    pub fn goto_first(&mut self) {
        self.cursor = 0;
    }

    /// Go to the last visible item.
    pub fn goto_last(&mut self) {
        if !self.items.is_empty() {
            self.cursor = self.items.len() - 1;
        }
    }

    /// Get all currently visible items in the tree.
    pub fn visible_items(&self) -> &[TreeItem] {
        &self.items
    }

    /// Get the current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get the current node.
    pub fn current_node(&self) -> Option<&Node> {
        self.items.get(self.cursor).map(|item| &item.node)
    }

    /// Scroll the attribute table down.
    pub fn scroll_attributes_down(&mut self) {
        let len = self.attributes.as_ref().map_or(0, |t| t.entries.len());
        self.attribute_scroll = (self.attribute_scroll + 5).min(len.saturating_sub(1));
    }

    /// Scroll the attribute table up.
    pub fn scroll_attributes_up(&mut self) {
        self.attribute_scroll = self.attribute_scroll.saturating_sub(5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NodeKind;

    fn tree() -> Node {
        let mut root = Node::root("f.h5");
        let mut g1 = Node::child(&root, "g1", NodeKind::Group);
        let d1 = Node::child(&g1, "d1", NodeKind::Dataset);
        g1.add_child(d1);
        let top = Node::child(&root, "top", NodeKind::Dataset);
        root.add_child(g1);
        root.add_child(top);
        root
    }

    fn paths(state: &ExplorerState) -> Vec<String> {
        state.visible_items().iter().map(|i| i.node.path()).collect()
    }

    #[test]
    fn only_the_root_starts_expanded() {
        let mut state = ExplorerState::new();
        state.set_tree(&tree());
        assert_eq!(paths(&state), vec!["/", "/g1/", "/top"]);
        assert_eq!(state.visible_items()[1].level, 1);
    }

    #[test]
    fn expand_and_collapse_groups_only() {
        let mut state = ExplorerState::new();
        state.set_tree(&tree());

        assert!(state.cursor_down());
        state.expand_current();
        assert_eq!(paths(&state), vec!["/", "/g1/", "/g1/d1", "/top"]);

        assert!(state.cursor_down());
        state.expand_current();
        assert_eq!(state.visible_items().len(), 4);

        assert!(state.cursor_up());
        state.collapse_current();
        assert_eq!(paths(&state), vec!["/", "/g1/", "/top"]);
        assert_eq!(state.current_node().map(Node::path), Some("/g1/".to_string()));
    }

    #[test]
    fn cursor_stops_at_the_ends() {
        let mut state = ExplorerState::new();
        state.set_tree(&tree());
        assert!(!state.cursor_up());
        state.goto_last();
        assert!(!state.cursor_down());
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn scroll_follows_cursor() {
        let mut state = ExplorerState::new();
        state.set_tree(&tree());
        state.goto_last();
        state.adjust_scroll(2);
        assert_eq!(state.scroll_offset(), 1);
        state.goto_first();
        state.adjust_scroll(2);
        assert_eq!(state.scroll_offset(), 0);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut state = ExplorerState::new();
        state.set_tree(&tree());
        state.clear();
        assert!(!state.has_tree());
        assert!(state.current_node().is_none());
    }
}
