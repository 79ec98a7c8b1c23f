//! Resolving tree nodes back to container objects.

use crate::data::{Container, Node, NodeKind, ObjectPath};
use crate::error::{Result, ViewerError};

/// A node located in an open container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedObject {
    /// Label-less path of the object.
    pub path: ObjectPath,
    /// Kind reported by the container.
    pub kind: NodeKind,
}

impl ResolvedObject {
    /// The container root.
    pub fn root() -> Self {
        Self {
            path: ObjectPath::root(),
            kind: NodeKind::Group,
        }
    }
}

/// Walk `node`'s segments from the container root, one level at a time.
///
/// Segment 0 (the display label) is skipped. Fails with
/// [`ViewerError::Resolution`] as soon as a segment is missing.
pub fn resolve<C: Container>(container: &C, node: &Node) -> Result<ResolvedObject> {
    let mut current = ResolvedObject::root();

    for segment in node.segments.iter().skip(1).take(node.depth) {
        if current.kind != NodeKind::Group {
            return Err(ViewerError::resolution(node.path()));
        }
        let children = container
            .list_children(&current.path)
            .map_err(|_| ViewerError::resolution(node.path()))?;
        let child = children
            .into_iter()
            .find(|child| &child.name == segment)
            .ok_or_else(|| ViewerError::resolution(node.path()))?;

        current = ResolvedObject {
            path: current.path.join(&child.name),
            kind: child.kind,
        };
    }

    tracing::debug!("Resolved {} as {}", node.path(), current.kind.name());
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{MemoryDataset, MemoryGroup, MemoryStorage};
    use crate::data::Storage;
    use std::path::Path;

    fn storage() -> MemoryStorage {
        let root = MemoryGroup::new().with_group(
            "g1",
            MemoryGroup::new()
                .with_dataset("d1", MemoryDataset::iota(&[3, 3]))
                .with_group("inner", MemoryGroup::new()),
        );
        MemoryStorage::new().with_file("f.h5", root)
    }

    #[test]
    fn resolves_root_and_nested_nodes() {
        let storage = storage();
        let container = storage.open(Path::new("f.h5")).unwrap();
        let root = Node::root("f.h5");
        let g1 = Node::child(&root, "g1", NodeKind::Group);
        let d1 = Node::child(&g1, "d1", NodeKind::Dataset);

        assert_eq!(resolve(&container, &root).unwrap(), ResolvedObject::root());
        let resolved = resolve(&container, &d1).unwrap();
        assert_eq!(resolved.path, ObjectPath::parse("g1/d1"));
        assert_eq!(resolved.kind, NodeKind::Dataset);
    }

    #[test]
    fn label_is_not_part_of_the_lookup() {
        let storage = storage();
        let container = storage.open(Path::new("f.h5")).unwrap();
        let root = Node::root("some other label");
        let g1 = Node::child(&root, "g1", NodeKind::Group);
        assert!(resolve(&container, &g1).is_ok());
    }

    #[test]
    fn missing_segment_is_a_resolution_error() {
        let storage = storage();
        let container = storage.open(Path::new("f.h5")).unwrap();
        let root = Node::root("f.h5");
        let stale = Node::child(&Node::child(&root, "g1", NodeKind::Group), "gone", NodeKind::Dataset);

        let err = resolve(&container, &stale).unwrap_err();
        assert!(matches!(err, ViewerError::Resolution { ref path } if path == "/g1/gone"));
    }

    #[test]
    fn descending_through_a_dataset_fails() {
        let storage = storage();
        let container = storage.open(Path::new("f.h5")).unwrap();
        let root = Node::root("f.h5");
        let g1 = Node::child(&root, "g1", NodeKind::Group);
        let d1 = Node::child(&g1, "d1", NodeKind::Group);
        let below = Node::child(&d1, "x", NodeKind::Dataset);
        assert!(resolve(&container, &below).is_err());
    }

    #[test]
    fn repeated_resolution_is_stable() {
        let storage = storage();
        let container = storage.open(Path::new("f.h5")).unwrap();
        let root = Node::root("f.h5");
        let inner = Node::child(&Node::child(&root, "g1", NodeKind::Group), "inner", NodeKind::Group);
        let first = resolve(&container, &inner).unwrap();
        for _ in 0..10 {
            assert_eq!(resolve(&container, &inner).unwrap(), first);
        }
    }
}
