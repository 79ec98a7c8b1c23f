//! Node types addressing points in the container hierarchy.

use std::fmt;

/// Path separator used when rendering node addresses.
pub const SEPARATOR: char = '/';

/// Kind of node in the container hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Group node (has children).
    Group,
    /// Leaf dataset node.
    Dataset,
}

impl NodeKind {
    /// Lowercase name used in the UI.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Dataset => "dataset",
        }
    }
}

/// A node in the container tree.
///
/// Segment 0 is the display label (the file name); each further segment is
/// the name of a child. The root is always a group at depth 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Number of segments below the root.
    pub depth: usize,
    /// Display label followed by the child names leading to this node.
    pub segments: Vec<String>,
    /// Type of node.
    pub kind: NodeKind,
    /// Child nodes, in the container's native order.
    pub children: Vec<Node>,
    /// Whether the node is expanded in the tree panel.
    pub expanded: bool,
}

impl Node {
    /// Create the root node of a file.
    pub fn root(label: impl Into<String>) -> Self {
        Self {
            depth: 0,
            segments: vec![label.into()],
            kind: NodeKind::Group,
            children: Vec::new(),
            expanded: true,
        }
    }

    /// Create a child of `parent` named `name`.
    pub fn child(parent: &Node, name: impl Into<String>, kind: NodeKind) -> Self {
        let mut segments = Vec::with_capacity(parent.segments.len() + 1);
        segments.extend(parent.segments.iter().cloned());
        segments.push(name.into());
        Self {
            depth: parent.depth + 1,
            segments,
            kind,
            children: Vec::new(),
            expanded: false,
        }
    }

    /// Display name: the last segment.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// The file label stored in segment 0.
    pub fn label(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or("")
    }

    /// Check if this node is a group.
    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }

    /// Check if this node is a dataset.
    pub fn is_dataset(&self) -> bool {
        self.kind == NodeKind::Dataset
    }

    /// Address of the node inside its file.
    ///
    /// Groups carry a trailing separator (`/g1/`), datasets do not (`/g1/d1`).
    pub fn path(&self) -> String {
        let mut path = String::from(SEPARATOR);
        for segment in self.segments.iter().skip(1) {
            path.push_str(segment);
            path.push(SEPARATOR);
        }
        if self.is_dataset() {
            path.pop();
        }
        path
    }

    /// The label-less path used to address storage.
    pub fn object_path(&self) -> ObjectPath {
        ObjectPath::new(self.segments.iter().skip(1).cloned().collect())
    }

    /// Add a child node.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Get display name with icon and child count.
    pub fn display_name(&self) -> String {
        match self.kind {
            NodeKind::Group if self.depth == 0 => {
                format!("🏠 {} ({})", self.name(), self.children.len())
            },
            NodeKind::Group => format!("📂 {} ({})", self.name(), self.children.len()),
            NodeKind::Dataset => format!("🔢 {}", self.name()),
        }
    }

    /// Find the descendant whose path equals `path`.
    #[cfg(test)]
    pub(crate) fn find(&self, path: &str) -> Option<&Node> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.path() == path {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Count this node and all of its descendants.
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }
}

/// Label-less address of an object inside a container.
///
/// The empty path is the container root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ObjectPath(Vec<String>);

impl ObjectPath {
    /// Create a path from its segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// The container root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a `/`-separated path, ignoring empty segments.
    pub fn parse(path: &str) -> Self {
        Self(
            path.split(SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Path segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether this is the container root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, if any.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Path of a child object.
    pub fn join(&self, name: &str) -> ObjectPath {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// Segments joined without a leading separator (`a/b`).
    pub fn relative(&self) -> String {
        self.0.join("/")
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.relative())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_extends_parent_segments() {
        let root = Node::root("file.h5");
        let group = Node::child(&root, "g1", NodeKind::Group);
        let leaf = Node::child(&group, "d1", NodeKind::Dataset);

        assert_eq!(leaf.depth, 2);
        assert_eq!(leaf.segments, vec!["file.h5", "g1", "d1"]);
        assert_eq!(leaf.segments.len() - 1, leaf.depth);
        assert!(leaf.segments.starts_with(&group.segments));
        assert_eq!(leaf.label(), "file.h5");
    }

    #[test]
    fn paths_mark_groups_with_trailing_separator() {
        let root = Node::root("file.h5");
        let group = Node::child(&root, "g1", NodeKind::Group);
        let leaf = Node::child(&group, "d1", NodeKind::Dataset);

        assert_eq!(root.path(), "/");
        assert_eq!(group.path(), "/g1/");
        assert_eq!(leaf.path(), "/g1/d1");
        assert_eq!(leaf.object_path().to_string(), "/g1/d1");
    }

    #[test]
    fn fresh_nodes_do_not_share_state() {
        let root = Node::root("a.h5");
        let mut first = Node::child(&root, "x", NodeKind::Group);
        let second = Node::child(&root, "y", NodeKind::Group);
        first.expanded = true;
        let leaf = Node::child(&first, "z", NodeKind::Dataset);
        first.add_child(leaf);

        assert!(!second.expanded);
        assert!(second.children.is_empty());
    }

    #[test]
    fn find_locates_nested_nodes() {
        let mut root = Node::root("f.h5");
        let mut group = Node::child(&root, "g", NodeKind::Group);
        group.add_child(Node::child(&group, "d", NodeKind::Dataset));
        root.add_child(group);

        assert_eq!(root.find("/g/d").map(Node::name), Some("d"));
        assert!(root.find("/missing").is_none());
        assert_eq!(root.count(), 3);
    }

    #[test]
    fn object_path_parses_and_joins() {
        let path = ObjectPath::parse("/a//b/");
        assert_eq!(path.segments(), ["a", "b"]);
        assert_eq!(path.join("c").relative(), "a/b/c");
        assert_eq!(ObjectPath::parse("a").join("b"), path);
        assert!(ObjectPath::root().is_root());
        assert_eq!(ObjectPath::root().to_string(), "/");
    }
}
