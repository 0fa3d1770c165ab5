use indextree::{NodeEdge, NodeId};

use crate::tree::{HeatTree, NodeKind};

/// Roll file metrics up into every directory (bottom-up).
///
/// Directory line counts are the sum over all children. Directory change
/// rates are the mean over *direct file children only*; subdirectory rates
/// are kept for display but never folded into the parent's average. A
/// directory without direct files gets a rate of 0.
pub fn aggregate(tree: &mut HeatTree) {
    let post_order: Vec<NodeId> = tree
        .root()
        .traverse(tree.arena())
        .filter_map(|edge| match edge {
            NodeEdge::End(id) => Some(id),
            NodeEdge::Start(_) => None,
        })
        .collect();

    for node_id in post_order {
        let is_dir = tree.get(node_id).map(|n| n.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }

        let (lines, rate) = roll_up(tree, node_id);
        if let Some(node) = tree.get_mut(node_id) {
            node.line_count = lines;
            node.change_rate = rate;
        }
    }
}

fn roll_up(tree: &HeatTree, dir_id: NodeId) -> (u64, f64) {
    let arena = tree.arena();
    let mut total_lines = 0u64;
    let mut rate_sum = 0.0;
    let mut file_count = 0usize;

    for child_id in dir_id.children(arena) {
        let child = arena[child_id].get();
        total_lines += child.line_count;
        if child.kind == NodeKind::File {
            rate_sum += child.change_rate;
            file_count += 1;
        }
    }

    let rate = if file_count > 0 {
        rate_sum / file_count as f64
    } else {
        0.0
    };

    (total_lines, rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn set_file(tree: &mut HeatTree, path: &str, lines: u64, rate: f64) {
        let id = tree
            .add_node(PathBuf::from(path), NodeKind::File)
            .unwrap();
        let node = tree.get_mut(id).unwrap();
        node.line_count = lines;
        node.change_rate = rate;
    }

    fn metrics(tree: &HeatTree, path: &str) -> (u64, f64) {
        let node = tree.get(tree.node_id(Path::new(path)).unwrap()).unwrap();
        (node.line_count, node.change_rate)
    }

    #[test]
    fn test_line_counts_sum_through_directories() {
        let mut tree = HeatTree::new("/root");
        set_file(&mut tree, "/root/a.txt", 30, 0.0);
        tree.add_node(PathBuf::from("/root/dir"), NodeKind::Directory);
        set_file(&mut tree, "/root/dir/b.txt", 600, 0.0);

        aggregate(&mut tree);

        assert_eq!(metrics(&tree, "/root/dir").0, 600);
        assert_eq!(metrics(&tree, "/root").0, 630);
        assert_eq!(tree.total_lines(), 630);
    }

    #[test]
    fn test_rate_is_mean_of_direct_files() {
        let mut tree = HeatTree::new("/root");
        set_file(&mut tree, "/root/x.go", 0, 10.0 / 30.0);
        set_file(&mut tree, "/root/y.go", 0, 5.0 / 30.0);

        aggregate(&mut tree);

        let (_, rate) = metrics(&tree, "/root");
        assert!((rate - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_subdirectory_rates_do_not_enter_parent_average() {
        let mut tree = HeatTree::new("/root");
        set_file(&mut tree, "/root/f.rs", 10, 1.0);
        tree.add_node(PathBuf::from("/root/sub"), NodeKind::Directory);
        set_file(&mut tree, "/root/sub/g.rs", 10, 3.0);
        set_file(&mut tree, "/root/sub/h.rs", 10, 5.0);

        aggregate(&mut tree);

        let (sub_lines, sub_rate) = metrics(&tree, "/root/sub");
        assert_eq!(sub_lines, 20);
        assert!((sub_rate - 4.0).abs() < 1e-9);

        // A leaf-weighted mean would be 3.0, a per-child mean 2.5.
        let (root_lines, root_rate) = metrics(&tree, "/root");
        assert_eq!(root_lines, 30);
        assert!((root_rate - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_directory_without_files_has_zero_rate() {
        let mut tree = HeatTree::new("/root");
        tree.add_node(PathBuf::from("/root/only_dirs"), NodeKind::Directory);
        tree.add_node(PathBuf::from("/root/only_dirs/inner"), NodeKind::Directory);
        set_file(&mut tree, "/root/only_dirs/inner/z.rs", 12, 2.0);
        tree.add_node(PathBuf::from("/root/empty"), NodeKind::Directory);

        aggregate(&mut tree);

        assert_eq!(metrics(&tree, "/root/only_dirs"), (12, 0.0));
        assert_eq!(metrics(&tree, "/root/empty"), (0, 0.0));
        assert_eq!(metrics(&tree, "/root/only_dirs/inner"), (12, 2.0));
    }

    #[test]
    fn test_every_directory_sums_its_children() {
        let mut tree = HeatTree::new("/r");
        tree.add_node(PathBuf::from("/r/a"), NodeKind::Directory);
        tree.add_node(PathBuf::from("/r/a/b"), NodeKind::Directory);
        set_file(&mut tree, "/r/a/b/1", 7, 0.0);
        set_file(&mut tree, "/r/a/2", 11, 0.0);
        set_file(&mut tree, "/r/3", 13, 0.0);

        aggregate(&mut tree);

        let arena = tree.arena();
        for id in tree.root().descendants(arena) {
            let node = arena[id].get();
            if node.is_dir() {
                let sum: u64 = id
                    .children(arena)
                    .map(|c| arena[c].get().line_count)
                    .sum();
                assert_eq!(node.line_count, sum, "mismatch at {}", node.path.display());
            }
        }
        assert_eq!(tree.total_lines(), 31);
    }
}
