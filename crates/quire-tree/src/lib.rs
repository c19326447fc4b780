//! Content tree for Quire.
//!
//! Maintains an in-memory mirror of the source directory (markdown documents
//! and sub-directories) alongside the rendered cache directory. Nodes are
//! derived lazily from the filesystem the first time a path reaching through
//! them is added, and every node knows both its raw source path and its
//! mirrored rendered path.
//!
//! This crate provides:
//! - [`ContentTree`]: arena of nodes with derive, add and walk operations
//! - [`ContentService`]: thread-safe access to a tree, implemented by
//!   [`FsContentService`]
//! - [`NodeSnapshot`]: detached copy of a node for untrusted readers
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), quire_tree::TreeError> {
//! use quire_tree::{AddOptions, ContentService, FsContentService};
//!
//! let service = FsContentService::new("notes", "cache");
//! service.add("posts/hello.md", "Hello", AddOptions::default())?;
//!
//! let node = service.fetch_copy("posts/hello.md").expect("just added");
//! assert_eq!(node.node.name, "Hello");
//! # Ok(())
//! # }
//! ```

mod error;
mod node;
mod options;
mod service;
mod tree;

pub use error::TreeError;
pub use node::{ContentNode, NodeId, NodeSnapshot, NodeView};
pub use options::AddOptions;
pub use service::{ContentService, FsContentService, LiveNode};
pub use tree::ContentTree;
