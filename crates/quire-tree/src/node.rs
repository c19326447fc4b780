//! Content node types.
//!
//! [`ContentNode`] holds the attributes of a node and doubles as its
//! "light copy": cloning it yields a value with no ties to the live tree.
//! [`NodeView`] borrows a node inside a [`ContentTree`] together with its
//! links, and [`NodeSnapshot`] is the detached form handed to readers that
//! must not hold references into the tree.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

use crate::tree::ContentTree;

/// Stable handle of a node inside a [`ContentTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Attributes of a content node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    /// True for directories, false for markdown documents.
    pub is_dir: bool,
    /// Display name (defaults to the last path segment).
    pub name: String,
    /// Absolute path in the source tree.
    pub raw_path: PathBuf,
    /// Absolute path in the rendered cache tree.
    pub rendered_path: PathBuf,
    /// Optional summary. Left empty until something produces one.
    #[serde(rename = "abstract", default)]
    pub summary: String,
}

/// Detached copy of a node with its immediate neighborhood.
///
/// Contains the node's attributes, light copies of its immediate children
/// (keyed by segment, no grandchildren) and a light copy of its parent.
/// Enough to draw a breadcrumb and a listing; changing it never affects the
/// live tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    /// The node itself.
    #[serde(flatten)]
    pub node: ContentNode,
    /// Immediate children, `None` for documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<BTreeMap<String, ContentNode>>,
    /// Parent node, `None` for the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ContentNode>,
}

/// Borrowed view of a node inside a live tree.
///
/// Serializes recursively: the node's attributes followed by the full
/// subtree under `children`.
#[derive(Clone, Copy)]
pub struct NodeView<'a> {
    tree: &'a ContentTree,
    id: NodeId,
}

impl<'a> NodeView<'a> {
    pub(crate) fn new(tree: &'a ContentTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    /// Handle of the viewed node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Attributes of the viewed node.
    #[must_use]
    pub fn node(&self) -> &'a ContentNode {
        self.tree.node(self.id)
    }

    /// Parent view, `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeView<'a>> {
        self.tree.parent(self.id).map(|id| Self::new(self.tree, id))
    }

    /// Child view by segment.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<NodeView<'a>> {
        self.tree
            .child(self.id, segment)
            .map(|id| Self::new(self.tree, id))
    }

    /// Immediate children sorted by segment.
    pub fn children(&self) -> impl Iterator<Item = (&'a str, NodeView<'a>)> + 'a {
        let tree = self.tree;
        tree.sorted_children(self.id)
            .into_iter()
            .map(move |(segment, id)| (segment, Self::new(tree, id)))
    }

    /// Slash-separated display path from the root.
    #[must_use]
    pub fn path(&self) -> String {
        self.tree.path_of(self.id)
    }

    /// Detached copy of this node and its immediate neighborhood.
    #[must_use]
    pub fn snapshot(&self) -> NodeSnapshot {
        self.tree.snapshot(self.id)
    }
}

impl std::fmt::Debug for NodeView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeView")
            .field("id", &self.id)
            .field("node", self.node())
            .finish_non_exhaustive()
    }
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.node();
        let len = if node.is_dir { 6 } else { 5 };
        let mut state = serializer.serialize_struct("ContentNode", len)?;
        state.serialize_field("isDir", &node.is_dir)?;
        state.serialize_field("name", &node.name)?;
        state.serialize_field("rawPath", &node.raw_path)?;
        state.serialize_field("renderedPath", &node.rendered_path)?;
        state.serialize_field("abstract", &node.summary)?;
        if node.is_dir {
            state.serialize_field("children", &ChildrenView(*self))?;
        }
        state.end()
    }
}

/// Serializes the children of a view as a map keyed by segment.
struct ChildrenView<'a>(NodeView<'a>);

impl Serialize for ChildrenView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children: Vec<_> = self.0.children().collect();
        let mut map = serializer.serialize_map(Some(children.len()))?;
        for (segment, child) in children {
            map.serialize_entry(segment, &child)?;
        }
        map.end()
    }
}
