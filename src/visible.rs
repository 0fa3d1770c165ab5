use indextree::NodeId;

use crate::tree::HeatTree;

/// Linear view of the tree under the current expand/collapse flags.
///
/// Pre-order over the root's children (the root itself is never listed),
/// descending into a directory only while it is expanded. Order at every
/// level is insertion order. Recomputed in full after every flag change.
pub fn flatten(tree: &HeatTree) -> Vec<NodeId> {
    let root = tree.root();
    let mut visible = Vec::new();

    let root_expanded = tree.get(root).map(|n| n.expanded).unwrap_or(false);
    if !root_expanded {
        return visible;
    }

    let mut stack: Vec<NodeId> = tree.children(root).collect();
    stack.reverse();

    while let Some(node_id) = stack.pop() {
        visible.push(node_id);

        let Some(node) = tree.get(node_id) else {
            continue;
        };
        if node.is_dir() && node.expanded {
            let start = stack.len();
            stack.extend(tree.children(node_id));
            stack[start..].reverse();
        }
    }

    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;
    use std::path::{Path, PathBuf};

    /// root/{a/{a1, a2, a3/{deep}}, b.txt, c/{c1}}
    fn sample() -> HeatTree {
        let mut tree = HeatTree::new("/r");
        for (path, kind) in [
            ("/r/a", NodeKind::Directory),
            ("/r/a/a1", NodeKind::File),
            ("/r/a/a2", NodeKind::File),
            ("/r/a/a3", NodeKind::Directory),
            ("/r/a/a3/deep", NodeKind::File),
            ("/r/b.txt", NodeKind::File),
            ("/r/c", NodeKind::Directory),
            ("/r/c/c1", NodeKind::File),
        ] {
            tree.add_node(PathBuf::from(path), kind).unwrap();
        }
        tree
    }

    fn names(tree: &HeatTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| tree.get(id).unwrap().name.clone())
            .collect()
    }

    fn id(tree: &HeatTree, path: &str) -> NodeId {
        tree.node_id(Path::new(path)).unwrap()
    }

    #[test]
    fn test_only_top_level_when_collapsed() {
        let tree = sample();
        assert_eq!(names(&tree, &flatten(&tree)), vec!["a", "b.txt", "c"]);
    }

    #[test]
    fn test_preorder_when_fully_expanded() {
        let mut tree = sample();
        let root = tree.root();
        tree.expand_all(root);

        assert_eq!(
            names(&tree, &flatten(&tree)),
            vec!["a", "a1", "a2", "a3", "deep", "b.txt", "c", "c1"]
        );
    }

    #[test]
    fn test_toggle_inserts_children_after_directory() {
        let mut tree = sample();
        let a = id(&tree, "/r/a");
        tree.toggle(a);

        // a3 is collapsed, so "deep" stays hidden
        assert_eq!(
            names(&tree, &flatten(&tree)),
            vec!["a", "a1", "a2", "a3", "b.txt", "c"]
        );
    }

    #[test]
    fn test_hidden_under_collapsed_ancestor() {
        let mut tree = sample();
        let root = tree.root();
        tree.expand_all(root);
        let a = id(&tree, "/r/a");
        tree.toggle(a);

        let visible = flatten(&tree);
        for &node_id in &visible {
            let mut ancestor = tree.parent(node_id);
            while let Some(parent_id) = ancestor {
                if parent_id == root {
                    break;
                }
                assert!(tree.get(parent_id).unwrap().expanded);
                ancestor = tree.parent(parent_id);
            }
        }
        assert!(!visible.contains(&id(&tree, "/r/a/a3/deep")));
    }

    #[test]
    fn test_collapse_then_expand_round_trip() {
        let mut tree = sample();
        let root = tree.root();
        tree.expand_all(root);
        let before = flatten(&tree).len();

        let a = id(&tree, "/r/a");
        tree.collapse_all(a);
        assert_eq!(flatten(&tree).len(), before - 4);
        tree.expand_all(a);
        assert_eq!(flatten(&tree).len(), before);
    }

    #[test]
    fn test_collapsed_root_hides_everything() {
        let mut tree = sample();
        let root = tree.root();
        tree.toggle(root);
        assert!(flatten(&tree).is_empty());
    }

    #[test]
    fn test_empty_tree() {
        let tree = HeatTree::new("/empty");
        assert!(flatten(&tree).is_empty());
    }

    #[test]
    fn test_stable_across_calls() {
        let mut tree = sample();
        let c = id(&tree, "/r/c");
        tree.toggle(c);
        assert_eq!(flatten(&tree), flatten(&tree));
    }
}
