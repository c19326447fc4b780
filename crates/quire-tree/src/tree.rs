//! Arena-backed content tree.
//!
//! # Architecture
//!
//! Nodes are stored in a flat `Vec` with parent/children relationships
//! tracked by [`NodeId`] indices. The parent link is only used to rebuild
//! display paths; ownership of every node stays with the arena. The tree
//! only grows: nodes are never removed, so a `NodeId` stays valid for the
//! life of the tree.
//!
//! Children are keyed by their filesystem segment. A node's display name
//! may differ from its segment (e.g. `hello.md` shown as "Hello"), and no
//! two siblings share either a segment or a display name.
//!
//! # Path mirroring
//!
//! A child's raw path is its parent's raw path joined with the segment, and
//! its rendered path is the parent's rendered path joined with the same
//! segment. Documents additionally swap the `.md` extension for `.html`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{MAIN_SEPARATOR, PathBuf};

use quire_renderer::{HTML_EXTENSION, Renderer, change_extension, is_markdown};

use crate::error::TreeError;
use crate::node::{ContentNode, NodeId, NodeSnapshot, NodeView};
use crate::options::AddOptions;

/// Name given to the root node.
const ROOT_NAME: &str = ".";

/// A node plus its links.
#[derive(Debug)]
struct Slot {
    node: ContentNode,
    parent: Option<NodeId>,
    /// `Some` for directories only.
    children: Option<HashMap<String, NodeId>>,
}

/// Tree of content nodes bound to a source and a cache directory.
#[derive(Debug)]
pub struct ContentTree {
    slots: Vec<Slot>,
}

impl ContentTree {
    /// Create a tree whose root maps `raw_root` to `rendered_root`.
    #[must_use]
    pub fn new(raw_root: impl Into<PathBuf>, rendered_root: impl Into<PathBuf>) -> Self {
        let root = Slot {
            node: ContentNode {
                is_dir: true,
                name: ROOT_NAME.to_owned(),
                raw_path: raw_root.into(),
                rendered_path: rendered_root.into(),
                summary: String::new(),
            },
            parent: None,
            children: Some(HashMap::new()),
        };
        Self { slots: vec![root] }
    }

    /// Handle of the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Attributes of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ContentNode {
        &self.slots[id.0].node
    }

    /// Attributes of a node, `None` for a foreign handle.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ContentNode> {
        self.slots.get(id.0).map(|slot| &slot.node)
    }

    /// Parent of a node, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    /// Child of a node by segment.
    #[must_use]
    pub fn child(&self, id: NodeId, segment: &str) -> Option<NodeId> {
        self.slots[id.0]
            .children
            .as_ref()
            .and_then(|children| children.get(segment).copied())
    }

    /// Borrowed view of a node.
    #[must_use]
    pub fn view(&self, id: NodeId) -> NodeView<'_> {
        NodeView::new(self, id)
    }

    /// Children of a node sorted by segment.
    pub(crate) fn sorted_children(&self, id: NodeId) -> Vec<(&str, NodeId)> {
        let mut children: Vec<_> = self.slots[id.0]
            .children
            .iter()
            .flatten()
            .map(|(segment, &child)| (segment.as_str(), child))
            .collect();
        children.sort_unstable_by(|a, b| a.0.cmp(b.0));
        children
    }

    /// Slash-separated display path of a node, built from parent links.
    ///
    /// The root is `/`; below it, display names are joined (`/posts/Hello`).
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(i) = current {
            let slot = &self.slots[i.0];
            if slot.parent.is_some() {
                names.push(slot.node.name.as_str());
            }
            current = slot.parent;
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    /// Detached copy of a node with light copies of its children and parent.
    #[must_use]
    pub fn snapshot(&self, id: NodeId) -> NodeSnapshot {
        let slot = &self.slots[id.0];
        let children = slot.children.as_ref().map(|children| {
            children
                .iter()
                .map(|(segment, &child)| (segment.clone(), self.node(child).clone()))
                .collect::<BTreeMap<_, _>>()
        });
        NodeSnapshot {
            node: slot.node.clone(),
            children,
            parent: slot.parent.map(|parent| self.node(parent).clone()),
        }
    }

    /// Compute the node that `segment` would become under `parent`.
    ///
    /// Validates the segment, checks that neither the segment nor `name` is
    /// already taken among the parent's children, stats the source entry and
    /// computes the mirrored rendered path. Only reads the filesystem; the
    /// tree is not modified.
    pub fn derive_node(
        &self,
        parent: NodeId,
        segment: &str,
        name: &str,
    ) -> Result<ContentNode, TreeError> {
        validate_segment(segment)?;

        let parent_slot = &self.slots[parent.0];
        let parent_node = &parent_slot.node;
        let raw_path = parent_node.raw_path.join(segment);

        let Some(siblings) = parent_slot.children.as_ref() else {
            // Documents cannot contain entries.
            return Err(TreeError::SourceNotFound(raw_path));
        };
        if siblings.contains_key(segment)
            || siblings.values().any(|&id| self.node(id).name == name)
        {
            return Err(TreeError::NodeExists(format!(
                "{}/{name}",
                self.path_of(parent).trim_end_matches('/')
            )));
        }

        let meta = fs::metadata(&raw_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TreeError::SourceNotFound(raw_path.clone()),
            _ => TreeError::Io {
                path: raw_path.clone(),
                source: e,
            },
        })?;

        let mut rendered_path = parent_node.rendered_path.join(segment);
        if !meta.is_dir() {
            if !is_markdown(&raw_path) {
                return Err(TreeError::NotMarkdown(raw_path));
            }
            rendered_path = change_extension(&rendered_path, HTML_EXTENSION);
        }

        Ok(ContentNode {
            is_dir: meta.is_dir(),
            name: name.to_owned(),
            raw_path,
            rendered_path,
            summary: String::new(),
        })
    }

    /// Derive a node for `segment` and link it under `parent`.
    ///
    /// Same checks as [`derive_node`](Self::derive_node); on success the new
    /// node's parent is set and it is inserted into the parent's children
    /// under `segment`.
    pub fn derive_child(
        &mut self,
        parent: NodeId,
        segment: &str,
        name: &str,
    ) -> Result<NodeId, TreeError> {
        let node = self.derive_node(parent, segment, name)?;
        let id = NodeId(self.slots.len());

        tracing::debug!(
            raw = %node.raw_path.display(),
            rendered = %node.rendered_path.display(),
            is_dir = node.is_dir,
            "Derived content node"
        );

        let children = node.is_dir.then(HashMap::new);
        self.slots.push(Slot {
            node,
            parent: Some(parent),
            children,
        });
        if let Some(siblings) = self.slots[parent.0].children.as_mut() {
            siblings.insert(segment.to_owned(), id);
        }
        Ok(id)
    }

    /// Grow the tree from `from` along `relative`, then optionally render.
    ///
    /// Each non-empty segment is looked up among the current node's
    /// children and derived (and linked) when missing. Intermediate nodes
    /// are named after their segment; the terminal node gets `name`, or its
    /// segment when `name` is empty. Segments already linked are reused, so
    /// repeating an add is harmless.
    ///
    /// With [`AddOptions::render`], a terminal document is rendered through
    /// `renderer`, and a terminal directory gets its rendered directory
    /// created (and, with [`AddOptions::recursive`], mirrored through
    /// `renderer`).
    ///
    /// Not transactional: when a later segment fails, earlier segments stay
    /// linked.
    pub fn add(
        &mut self,
        from: NodeId,
        relative: &str,
        name: &str,
        options: AddOptions,
        renderer: &dyn Renderer,
    ) -> Result<NodeId, TreeError> {
        let segments = split_segments(relative);
        let mut current = from;

        for (i, &segment) in segments.iter().enumerate() {
            let is_last = i + 1 == segments.len();
            current = match self.child(current, segment) {
                Some(existing) => existing,
                None => {
                    let display = if is_last && !name.is_empty() {
                        name
                    } else {
                        segment
                    };
                    self.derive_child(current, segment, display)?
                }
            };
        }

        if options.render {
            self.render_node(current, options, renderer)?;
        }
        Ok(current)
    }

    /// Render a node into the cache directory.
    fn render_node(
        &self,
        id: NodeId,
        options: AddOptions,
        renderer: &dyn Renderer,
    ) -> Result<(), TreeError> {
        let node = self.node(id);

        if !node.is_dir {
            renderer.render_document(&node.raw_path, &node.rendered_path)?;
            return Ok(());
        }

        fs::create_dir_all(&node.rendered_path).map_err(|e| TreeError::Io {
            path: node.rendered_path.clone(),
            source: e,
        })?;
        if options.recursive {
            renderer.render_directory(&node.raw_path, &node.rendered_path, options.tree_options())?;
        }
        Ok(())
    }

    /// Resolve `segments[start..]` from `from`.
    ///
    /// Empty segments are skipped. Every remaining segment must name an
    /// existing child; the node reached after consuming the last one is
    /// returned. No segments left resolves to `from` itself.
    #[must_use]
    pub fn walk(&self, from: NodeId, segments: &[&str], start: usize) -> Option<NodeId> {
        segments
            .iter()
            .skip(start)
            .filter(|segment| !segment.is_empty())
            .try_fold(from, |current, segment| self.child(current, segment))
    }

    /// Resolve a slash-separated relative path from `from`.
    #[must_use]
    pub fn resolve(&self, from: NodeId, relative: &str) -> Option<NodeId> {
        let segments: Vec<&str> = relative.split('/').collect();
        self.walk(from, &segments, 0)
    }
}

/// Split a relative path into its non-empty segments.
fn split_segments(relative: &str) -> Vec<&str> {
    relative.split('/').filter(|s| !s.is_empty()).collect()
}

/// Reject segments that could not name a single entry inside the parent.
fn validate_segment(segment: &str) -> Result<(), TreeError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', MAIN_SEPARATOR])
    {
        return Err(TreeError::InvalidSegment(segment.to_owned()));
    }
    Ok(())
}
