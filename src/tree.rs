use indextree::{Arena, NodeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// Represents one entry of the scanned source tree
#[derive(Debug, Clone)]
pub struct HeatNode {
    pub path: PathBuf,
    pub name: String,
    pub kind: NodeKind,
    /// Root is 0. Only used for indentation.
    pub depth: usize,
    /// Ignored for files.
    pub expanded: bool,
    /// Measured for files, summed for directories
    pub line_count: u64,
    /// Commits per day over the history window
    pub change_rate: f64,
}

impl HeatNode {
    pub fn new(path: PathBuf, kind: NodeKind, depth: usize) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            path,
            name,
            kind,
            depth,
            expanded: false,
            line_count: 0,
            change_rate: 0.0,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Hierarchical source tree stored in an arena.
///
/// Children are owned by the arena in insertion order; a node's parent is a
/// plain `NodeId`, so back-references never own anything.
#[derive(Debug)]
pub struct HeatTree {
    arena: Arena<HeatNode>,
    root: NodeId,
    path_to_node: HashMap<PathBuf, NodeId>,
}

impl HeatTree {
    /// Create a new tree holding only an expanded root directory
    pub fn new<P: AsRef<Path>>(root_path: P) -> Self {
        let mut arena = Arena::new();
        let root_path_buf = root_path.as_ref().to_path_buf();

        let mut root_node = HeatNode::new(root_path_buf.clone(), NodeKind::Directory, 0);
        root_node.expanded = true;

        let root = arena.new_node(root_node);
        let mut path_to_node = HashMap::new();
        path_to_node.insert(root_path_buf, root);

        Self {
            arena,
            root,
            path_to_node,
        }
    }

    /// Append a new node under `parent`.
    ///
    /// Returns `None` when `parent` is a file or not part of this tree.
    /// Paths are not de-duplicated; the scanner hands out each path once.
    pub fn add_child(&mut self, parent: NodeId, path: PathBuf, kind: NodeKind) -> Option<NodeId> {
        let parent_depth = {
            let parent_node = self.arena.get(parent)?.get();
            if !parent_node.is_dir() {
                return None;
            }
            parent_node.depth
        };

        let node_id = self
            .arena
            .new_node(HeatNode::new(path.clone(), kind, parent_depth + 1));
        parent.append(node_id, &mut self.arena);
        self.path_to_node.insert(path, node_id);

        Some(node_id)
    }

    /// Add a node under the directory matching its parent path
    pub fn add_node(&mut self, path: PathBuf, kind: NodeKind) -> Option<NodeId> {
        let parent_id = self.path_to_node.get(path.parent()?).copied()?;
        self.add_child(parent_id, path, kind)
    }

    /// Flip the expansion flag of a directory. Files are left alone.
    pub fn toggle(&mut self, node_id: NodeId) {
        if let Some(node) = self.arena.get_mut(node_id) {
            let data = node.get_mut();
            if data.is_dir() {
                data.expanded = !data.expanded;
            }
        }
    }

    /// Expand `node_id` and every directory below it
    pub fn expand_all(&mut self, node_id: NodeId) {
        self.set_expanded_recursive(node_id, true);
    }

    /// Collapse `node_id` and every directory below it
    pub fn collapse_all(&mut self, node_id: NodeId) {
        self.set_expanded_recursive(node_id, false);
    }

    fn set_expanded_recursive(&mut self, node_id: NodeId, expanded: bool) {
        let is_dir = self
            .arena
            .get(node_id)
            .map(|n| n.get().is_dir())
            .unwrap_or(false);
        if !is_dir {
            return;
        }

        // collect before mutating the arena
        let subtree: Vec<NodeId> = node_id.descendants(&self.arena).collect();

        for id in subtree {
            if let Some(node) = self.arena.get_mut(id) {
                let data = node.get_mut();
                if data.is_dir() {
                    data.expanded = expanded;
                }
            }
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_path(&self) -> &Path {
        &self.arena[self.root].get().path
    }

    pub fn arena(&self) -> &Arena<HeatNode> {
        &self.arena
    }

    pub fn get(&self, node_id: NodeId) -> Option<&HeatNode> {
        self.arena.get(node_id).map(|n| n.get())
    }

    pub(crate) fn get_mut(&mut self, node_id: NodeId) -> Option<&mut HeatNode> {
        self.arena.get_mut(node_id).map(|n| n.get_mut())
    }

    pub fn node_id(&self, path: &Path) -> Option<NodeId> {
        self.path_to_node.get(path).copied()
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.arena.get(node_id)?.parent()
    }

    pub fn children(&self, node_id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node_id.children(&self.arena)
    }

    /// Number of nodes, the root included
    pub fn node_count(&self) -> usize {
        self.path_to_node.len()
    }

    /// True when the root has no children
    pub fn is_empty(&self) -> bool {
        self.children(self.root).next().is_none()
    }

    /// File ids in pre-order
    pub fn files(&self) -> Vec<NodeId> {
        self.root
            .descendants(&self.arena)
            .filter(|&id| self.arena[id].get().kind == NodeKind::File)
            .collect()
    }

    pub fn total_lines(&self) -> u64 {
        self.arena[self.root].get().line_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HeatTree {
        let mut tree = HeatTree::new("/test");
        tree.add_node(PathBuf::from("/test/file1.txt"), NodeKind::File);
        tree.add_node(PathBuf::from("/test/dir1"), NodeKind::Directory);
        tree.add_node(PathBuf::from("/test/dir1/sub"), NodeKind::Directory);
        tree.add_node(PathBuf::from("/test/dir1/sub/file2.txt"), NodeKind::File);
        tree
    }

    #[test]
    fn test_tree_basic() {
        let tree = sample();
        let root = tree.get(tree.root()).unwrap();

        assert_eq!(root.name, "test");
        assert!(root.expanded);
        assert_eq!(root.depth, 0);
        assert_eq!(tree.node_count(), 5);

        let names: Vec<_> = tree
            .children(tree.root())
            .map(|id| tree.get(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["file1.txt", "dir1"]);
    }

    #[test]
    fn test_empty_tree_counts_only_root() {
        let mut tree = HeatTree::new("/empty");
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);

        tree.add_node(PathBuf::from("/empty/a.rs"), NodeKind::File);
        assert!(!tree.is_empty());
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_new_node_defaults() {
        let node = HeatNode::new(PathBuf::from("/a/b.rs"), NodeKind::File, 3);
        assert_eq!(node.name, "b.rs");
        assert_eq!(node.depth, 3);
        assert!(!node.expanded);
        assert_eq!(node.line_count, 0);
        assert_eq!(node.change_rate, 0.0);

        let root = HeatNode::new(PathBuf::from("/"), NodeKind::Directory, 0);
        assert_eq!(root.name, "/");
    }

    #[test]
    fn test_depth_and_parent_links() {
        let tree = sample();
        let file2 = tree.node_id(Path::new("/test/dir1/sub/file2.txt")).unwrap();
        let sub = tree.node_id(Path::new("/test/dir1/sub")).unwrap();

        assert_eq!(tree.get(file2).unwrap().depth, 3);
        assert_eq!(tree.parent(file2), Some(sub));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn test_file_cannot_have_children() {
        let mut tree = sample();
        let file1 = tree.node_id(Path::new("/test/file1.txt")).unwrap();

        let added = tree.add_child(file1, PathBuf::from("/test/file1.txt/x"), NodeKind::File);
        assert!(added.is_none());
        assert_eq!(tree.children(file1).count(), 0);
    }

    #[test]
    fn test_toggle_ignores_files() {
        let mut tree = sample();
        let dir1 = tree.node_id(Path::new("/test/dir1")).unwrap();
        let file1 = tree.node_id(Path::new("/test/file1.txt")).unwrap();

        tree.toggle(dir1);
        assert!(tree.get(dir1).unwrap().expanded);
        tree.toggle(dir1);
        assert!(!tree.get(dir1).unwrap().expanded);

        tree.toggle(file1);
        assert!(!tree.get(file1).unwrap().expanded);
    }

    #[test]
    fn test_expand_and_collapse_all() {
        let mut tree = sample();
        let dir1 = tree.node_id(Path::new("/test/dir1")).unwrap();
        let sub = tree.node_id(Path::new("/test/dir1/sub")).unwrap();
        let file2 = tree.node_id(Path::new("/test/dir1/sub/file2.txt")).unwrap();

        tree.expand_all(dir1);
        assert!(tree.get(dir1).unwrap().expanded);
        assert!(tree.get(sub).unwrap().expanded);
        assert!(!tree.get(file2).unwrap().expanded);

        tree.collapse_all(dir1);
        assert!(!tree.get(dir1).unwrap().expanded);
        assert!(!tree.get(sub).unwrap().expanded);
        // root is outside the subtree
        assert!(tree.get(tree.root()).unwrap().expanded);
    }

    #[test]
    fn test_expand_all_on_file_is_noop() {
        let mut tree = sample();
        let file1 = tree.node_id(Path::new("/test/file1.txt")).unwrap();
        tree.expand_all(file1);
        assert!(!tree.get(file1).unwrap().expanded);
    }

    #[test]
    fn test_files_in_preorder() {
        let tree = sample();
        let names: Vec<_> = tree
            .files()
            .into_iter()
            .map(|id| tree.get(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["file1.txt", "file2.txt"]);
    }
}
