//! Thread-safe access to a content tree.
//!
//! [`FsContentService`] owns a [`ContentTree`] behind a single `RwLock`.
//! Fetches take the read lock and may run concurrently; [`add`] takes the
//! write lock for the whole derive-and-render step, so readers never see a
//! half-linked node.
//!
//! Two kinds of fetch are offered:
//! - [`fetch`] returns a [`LiveNode`] that keeps the read lock held until it
//!   is dropped. Writers block meanwhile, so keep it short-lived.
//! - [`fetch_copy`] returns a detached [`NodeSnapshot`] and releases the
//!   lock before returning. Use it for anything handed to request handlers.
//!
//! [`add`]: ContentService::add
//! [`fetch`]: ContentService::fetch
//! [`fetch_copy`]: ContentService::fetch_copy

use std::ops::Deref;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use quire_renderer::{HtmlRenderer, Renderer};
use serde::{Serialize, Serializer};

use crate::error::TreeError;
use crate::node::{ContentNode, NodeId, NodeSnapshot, NodeView};
use crate::options::AddOptions;
use crate::tree::ContentTree;

/// Operations of the content tree service.
pub trait ContentService: Send + Sync {
    /// Resolve a relative path from the root, holding the read lock.
    fn fetch(&self, relative: &str) -> Option<LiveNode<'_>>;

    /// Resolve a relative path from the root and return a detached copy.
    fn fetch_copy(&self, relative: &str) -> Option<NodeSnapshot>;

    /// The root node, holding the read lock.
    fn fetch_all(&self) -> LiveNode<'_>;

    /// Grow the tree along `relative` and optionally render the terminal node.
    ///
    /// Returns a detached copy of the terminal node.
    fn add(&self, relative: &str, name: &str, options: AddOptions)
    -> Result<NodeSnapshot, TreeError>;

    /// Reserved for persisting the tree; currently does nothing.
    fn load_from_disk(&self) -> Result<(), TreeError>;

    /// Reserved for persisting the tree; currently does nothing.
    fn write_back(&self) -> Result<(), TreeError>;
}

/// Content service backed by the filesystem.
pub struct FsContentService {
    tree: RwLock<ContentTree>,
    renderer: Arc<dyn Renderer>,
}

impl FsContentService {
    /// Create a service rendering markdown to HTML.
    #[must_use]
    pub fn new(raw_root: impl Into<PathBuf>, rendered_root: impl Into<PathBuf>) -> Self {
        Self::with_renderer(raw_root, rendered_root, Arc::new(HtmlRenderer))
    }

    /// Create a service with a custom renderer.
    #[must_use]
    pub fn with_renderer(
        raw_root: impl Into<PathBuf>,
        rendered_root: impl Into<PathBuf>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            tree: RwLock::new(ContentTree::new(raw_root, rendered_root)),
            renderer,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ContentTree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ContentTree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for FsContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsContentService")
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

impl ContentService for FsContentService {
    fn fetch(&self, relative: &str) -> Option<LiveNode<'_>> {
        let guard = self.read();
        let id = guard.resolve(guard.root(), relative)?;
        Some(LiveNode { guard, id })
    }

    fn fetch_copy(&self, relative: &str) -> Option<NodeSnapshot> {
        let tree = self.read();
        tree.resolve(tree.root(), relative)
            .map(|id| tree.snapshot(id))
    }

    fn fetch_all(&self) -> LiveNode<'_> {
        let guard = self.read();
        let id = guard.root();
        LiveNode { guard, id }
    }

    fn add(
        &self,
        relative: &str,
        name: &str,
        options: AddOptions,
    ) -> Result<NodeSnapshot, TreeError> {
        let mut tree = self.write();
        let root = tree.root();
        let id = tree.add(root, relative, name, options, self.renderer.as_ref())?;

        tracing::info!(path = %tree.path_of(id), render = options.render, "Added content node");
        Ok(tree.snapshot(id))
    }

    fn load_from_disk(&self) -> Result<(), TreeError> {
        let _tree = self.write();
        Ok(())
    }

    fn write_back(&self) -> Result<(), TreeError> {
        let _tree = self.write();
        Ok(())
    }
}

/// A node fetched from a live tree.
///
/// Holds the service's read lock until dropped; writers wait meanwhile.
/// Dereferences to the node's attributes and serializes with its full
/// subtree.
pub struct LiveNode<'a> {
    guard: RwLockReadGuard<'a, ContentTree>,
    id: NodeId,
}

impl LiveNode<'_> {
    /// Borrowed view for navigating children and parent.
    #[must_use]
    pub fn view(&self) -> NodeView<'_> {
        self.guard.view(self.id)
    }

    /// Detached copy of this node and its immediate neighborhood.
    #[must_use]
    pub fn snapshot(&self) -> NodeSnapshot {
        self.guard.snapshot(self.id)
    }
}

impl Deref for LiveNode<'_> {
    type Target = ContentNode;

    fn deref(&self) -> &ContentNode {
        self.guard.node(self.id)
    }
}

impl std::fmt::Debug for LiveNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.view().fmt(f)
    }
}

impl Serialize for LiveNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.view().serialize(serializer)
    }
}
