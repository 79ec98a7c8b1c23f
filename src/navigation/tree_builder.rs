//! Building the node tree of an open container.

use crate::data::{Container, Node, NodeKind};
use crate::error::Result;

/// Walk `container` from its root and build the full node tree.
///
/// Uses an explicit work stack so nesting depth is not bounded by the call
/// stack. Children keep the container's native order.
pub fn build_tree<C: Container>(container: &C, label: &str) -> Result<Node> {
    let mut nodes: Vec<Option<Node>> = vec![Some(Node::root(label))];
    let mut parents: Vec<Option<usize>> = vec![None];
    let mut pending = vec![0usize];

    while let Some(index) = pending.pop() {
        let (parent, path) = match &nodes[index] {
            Some(node) => (node.clone_shallow(), node.object_path()),
            None => continue,
        };

        for entry in container.list_children(&path)? {
            let child = Node::child(&parent, entry.name, entry.kind);
            nodes.push(Some(child));
            parents.push(Some(index));
            if entry.kind == NodeKind::Group {
                pending.push(nodes.len() - 1);
            }
        }
    }

    // Children always sit after their parent, so folding from the back
    // completes every subtree before it is attached.
    for index in (1..nodes.len()).rev() {
        let Some(mut node) = nodes[index].take() else {
            continue;
        };
        node.children.reverse();
        if let Some(parent) = parents[index].and_then(|p| nodes[p].as_mut()) {
            parent.children.push(node);
        }
    }

    let mut root = nodes
        .into_iter()
        .next()
        .flatten()
        .unwrap_or_else(|| Node::root(label));
    root.children.reverse();

    tracing::info!("Built tree for {} with {} nodes", label, root.count());
    Ok(root)
}

impl Node {
    fn clone_shallow(&self) -> Node {
        Node {
            depth: self.depth,
            segments: self.segments.clone(),
            kind: self.kind,
            children: Vec::new(),
            expanded: self.expanded,
        }
    }
}
