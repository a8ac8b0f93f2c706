//! Nested sidebar structure.
//!
//! Folds the ordered flat entry list into a [`SidebarNode`] tree keyed by
//! path segment. Files live in their parent node's `files` list, never as
//! nodes. Folders implied by a deep file path but absent from the list
//! (for example when `show_folders` is off) are created on the way down,
//! so every file ends up under the right nesting.

use crate::scan::Entry;
use std::collections::BTreeMap;

/// A folder in the sidebar hierarchy. The root node has an empty name and path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SidebarNode {
    pub name: String,
    pub relative_path: String,
    /// Child folders by name. Render order is decided by the renderer.
    pub children: BTreeMap<String, SidebarNode>,
    /// Files directly inside this folder, in scan order.
    pub files: Vec<Entry>,
}

impl SidebarNode {
    fn child(name: &str, relative_path: String) -> Self {
        Self {
            name: name.to_string(),
            relative_path,
            ..Self::default()
        }
    }

    /// Return the node at `segments`, creating missing folders along the way.
    fn ensure_path(&mut self, segments: &[&str]) -> &mut SidebarNode {
        let mut node = self;
        for (i, segment) in segments.iter().enumerate() {
            node = node
                .children
                .entry((*segment).to_string())
                .or_insert_with(|| SidebarNode::child(segment, segments[..=i].join("/")));
        }
        node
    }

    fn insert(&mut self, entry: &Entry) {
        let segments = entry.segments();
        if entry.is_dir {
            self.ensure_path(&segments);
        } else {
            let parent = &segments[..segments.len() - 1];
            self.ensure_path(parent).files.push(entry.clone());
        }
    }

    /// Number of file leaves in this subtree.
    pub fn file_count(&self) -> usize {
        self.files.len()
            + self
                .children
                .values()
                .map(SidebarNode::file_count)
                .sum::<usize>()
    }

    /// Number of folder nodes below this one.
    pub fn folder_count(&self) -> usize {
        self.children.len()
            + self
                .children
                .values()
                .map(SidebarNode::folder_count)
                .sum::<usize>()
    }

    /// Look up a descendant by `/`-separated relative path.
    pub fn find(&self, relative_path: &str) -> Option<&SidebarNode> {
        relative_path
            .split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |node, segment| node.children.get(segment))
    }
}

/// Build the sidebar tree from an ordered entry list.
pub fn build_tree(entries: &[Entry]) -> SidebarNode {
    let mut root = SidebarNode::default();
    for entry in entries {
        root.insert(entry);
    }
    tracing::debug!(
        files = root.file_count(),
        folders = root.folder_count(),
        "built sidebar tree"
    );
    root
}
