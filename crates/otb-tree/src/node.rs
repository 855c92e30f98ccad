//! Node arena and borrowed node views.

use std::fmt;
use std::ops::Range;

use otb_common::NodeReader;

/// A node as stored in the arena.
///
/// Nodes are stored in a flat array and reference their children by index.
/// The property range indexes into the container's byte buffer and still
/// holds escaped bytes.
#[derive(Debug, Clone)]
pub(crate) struct NodeEntry {
    pub(crate) kind: u8,
    pub(crate) props: Range<usize>,
    pub(crate) children: Vec<usize>,
}

/// All nodes of one container, root first.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    pub(crate) nodes: Vec<NodeEntry>,
    pub(crate) depth: usize,
}

impl NodeTree {
    /// Index of the root node.
    pub const ROOT: usize = 0;

    /// Total number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maximum nesting depth; a lone root has depth 1.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// View a node against the buffer the tree was parsed from.
    pub fn node<'a>(&'a self, data: &'a [u8], index: usize) -> Option<Node<'a>> {
        self.nodes.get(index).map(|_| Node {
            tree: self,
            data,
            index,
        })
    }
}

/// A borrowed view of one node.
///
/// Views are tied to the container that owns both the arena and the byte
/// buffer, so they cannot outlive it.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    tree: &'a NodeTree,
    data: &'a [u8],
    index: usize,
}

impl<'a> Node<'a> {
    #[inline]
    fn entry(&self) -> &'a NodeEntry {
        &self.tree.nodes[self.index]
    }

    /// Arena index of this node.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The node's type byte.
    #[inline]
    pub fn kind(&self) -> u8 {
        self.entry().kind
    }

    /// Raw (escaped) property bytes.
    #[inline]
    pub fn props(&self) -> &'a [u8] {
        &self.data[self.entry().props.clone()]
    }

    /// Byte range of the properties within the container buffer.
    #[inline]
    pub fn props_range(&self) -> Range<usize> {
        self.entry().props.clone()
    }

    /// A reader positioned at the start of the properties.
    #[inline]
    pub fn reader(&self) -> NodeReader<'a> {
        NodeReader::new(self.props())
    }

    /// Number of direct children.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.entry().children.len()
    }

    /// Whether the node has any children.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.entry().children.is_empty()
    }

    /// Iterate over direct children in stream order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = Node<'a>> + 'a {
        let tree = self.tree;
        let data = self.data;
        self.entry().children.iter().map(move |&index| Node { tree, data, index })
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index)
            .field("kind", &self.kind())
            .field("props", &self.props_range())
            .field("children", &self.child_count())
            .finish()
    }
}
