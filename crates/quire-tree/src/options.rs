//! Options controlling what happens after a node is added.

use quire_renderer::TreeOptions;

/// Post-add behavior for [`ContentTree::add`](crate::ContentTree::add).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AddOptions {
    /// Mirror the whole directory into the cache when the added node is a directory.
    pub recursive: bool,
    /// Render the added node into the cache directory.
    pub render: bool,
    /// Replace existing rendered files while mirroring a directory.
    pub overwrite: bool,
    /// Copy non-markdown files into the cache while mirroring a directory.
    pub copy_others: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            render: true,
            overwrite: false,
            copy_others: true,
        }
    }
}

impl AddOptions {
    /// Options that only grow the tree without touching the cache.
    #[must_use]
    pub fn link_only() -> Self {
        Self {
            recursive: false,
            render: false,
            overwrite: false,
            copy_others: false,
        }
    }

    /// Mirroring options handed to the renderer for directory adds.
    #[must_use]
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            overwrite: self.overwrite,
            copy_others: self.copy_others,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_renders_recursively_without_overwrite() {
        let options = AddOptions::default();

        assert!(options.recursive);
        assert!(options.render);
        assert!(!options.overwrite);
        assert!(options.copy_others);
    }

    #[test]
    fn test_tree_options_carries_flags() {
        let options = AddOptions {
            overwrite: true,
            copy_others: false,
            ..AddOptions::default()
        };

        let tree = options.tree_options();

        assert!(tree.overwrite);
        assert!(!tree.copy_others);
    }
}
