//! Presentation rows computed from the navigation state.
//!
//! Everything here is plain data so the drawing code in `render` stays a
//! thin mapping onto widgets.

use crate::config::Config;
use crate::crawler::ScanStats;
use crate::heat::{HeatColor, Metric};
use crate::nav::NavState;
use crate::tree::NodeKind;

/// One visible tree line, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub depth: usize,
    pub kind: NodeKind,
    pub expanded: bool,
    pub name: String,
    pub value: f64,
    pub level: usize,
    pub bar_len: usize,
    pub color: HeatColor,
    pub is_cursor: bool,
}

impl RowView {
    /// Two spaces per level below the root's children
    pub fn indent(&self) -> String {
        "  ".repeat(self.depth.saturating_sub(1))
    }

    pub fn icon(&self) -> &'static str {
        match (self.kind, self.expanded) {
            (NodeKind::Directory, true) => "▼ 📁",
            (NodeKind::Directory, false) => "▶ 📁",
            (NodeKind::File, _) => "  📄",
        }
    }
}

pub fn rows(state: &NavState, config: &Config) -> Vec<RowView> {
    let Some(tree) = state.tree() else {
        return Vec::new();
    };
    let metric = state.metric();
    let scheme = config.heat.scheme(metric);
    let max_width = config.view.bar_width;

    state
        .visible()
        .iter()
        .enumerate()
        .filter_map(|(index, &id)| {
            let node = tree.get(id)?;
            let value = metric.value(node);
            let level = scheme.classify(value);
            Some(RowView {
                depth: node.depth,
                kind: node.kind,
                expanded: node.expanded,
                name: node.name.clone(),
                value,
                level,
                bar_len: scheme.bar_length(value, max_width),
                color: scheme.color(level),
                is_cursor: index == state.cursor(),
            })
        })
        .collect()
}

/// Right-aligned value column: integer lines or two-decimal rate
pub fn format_value(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Size => format!("{:6}", value as u64),
        Metric::ChangeRate => format!("{value:6.2}"),
    }
}

/// Filled bar padded to `max_width` so names line up
pub fn bar(len: usize, max_width: usize) -> (String, String) {
    let len = len.min(max_width);
    ("█".repeat(len), " ".repeat(max_width - len))
}

/// Footer status: item count, cursor position and mode
pub fn status_line(state: &NavState) -> String {
    format!(
        "Items: {}  Cursor: {}  Mode: {}",
        state.visible().len(),
        state.cursor(),
        state.metric().title()
    )
}

/// Scan totals; unreadable entries are only mentioned when there were some
pub fn scan_summary(stats: &ScanStats) -> String {
    let mut summary = format!(
        "{} files, {} dirs in {} ms",
        stats.total_files, stats.total_dirs, stats.duration_ms
    );
    if stats.skipped_entries > 0 {
        summary.push_str(&format!(", {} skipped", stats.skipped_entries));
    }
    summary
}
