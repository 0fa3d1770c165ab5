//! Blocking scan pass: walk, build the tree, measure files, roll up.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::config::Config;
use crate::crawler::{resolve_root, FileCrawler, ScanEntry, ScanStats};
use crate::error::ScanError;
use crate::history::{change_rate, ChangeHistory};
use crate::loc;
use crate::tree::{HeatTree, NodeKind};

/// Result of a finished scan, ready to be installed in the navigator
#[derive(Debug)]
pub struct ScanOutcome {
    pub tree: HeatTree,
    pub stats: ScanStats,
}

/// Scan `root` and return a fully aggregated tree.
///
/// Fails only when the root itself is missing, not a directory, or
/// unreadable. Everything below degrades to zero-valued metrics.
pub fn scan_tree<P: AsRef<Path>>(root: P, config: &Config) -> Result<ScanOutcome, ScanError> {
    let start = Instant::now();
    let root = resolve_root(root)?;

    let (entries, mut stats) = FileCrawler::new(&config.scan).scan(&root);
    let mut tree = build_tree(&root, &entries);

    apply_line_counts(&mut tree);

    let history = ChangeHistory::new(&root, config.scan.window_days);
    let counts = history.commit_counts();
    apply_change_counts(&mut tree, &counts, history.window_days());

    aggregate(&mut tree);

    stats.duration_ms = start.elapsed().as_millis();
    info!(
        root = %root.display(),
        nodes = tree.node_count(),
        lines = tree.total_lines(),
        duration_ms = stats.duration_ms as u64,
        "scan complete"
    );

    Ok(ScanOutcome { tree, stats })
}

/// Build the node tree from pre-ordered scan entries
pub fn build_tree(root: &Path, entries: &[ScanEntry]) -> HeatTree {
    let mut tree = HeatTree::new(root);
    for entry in entries {
        let kind = if entry.is_dir {
            NodeKind::Directory
        } else {
            NodeKind::File
        };
        if tree.add_node(entry.path.clone(), kind).is_none() {
            debug!(path = %entry.path.display(), "entry has no parent in tree, dropped");
        }
    }
    tree
}

/// Fill `line_count` of every file
pub fn apply_line_counts(tree: &mut HeatTree) {
    let files = tree.files();
    let paths: Vec<PathBuf> = files
        .iter()
        .filter_map(|&id| tree.get(id).map(|n| n.path.clone()))
        .collect();

    let counts = loc::count_all(&paths);

    for (id, lines) in files.into_iter().zip(counts) {
        if let Some(node) = tree.get_mut(id) {
            node.line_count = lines;
        }
    }
}

/// Fill `change_rate` of every file from per-path commit counts
pub fn apply_change_counts(tree: &mut HeatTree, counts: &HashMap<PathBuf, u32>, window_days: u32) {
    for id in tree.files() {
        if let Some(node) = tree.get_mut(id) {
            let count = counts.get(&node.path).copied().unwrap_or(0);
            node.change_rate = change_rate(count, window_days);
        }
    }
}
