//! Navigation state machine.
//!
//! Every key press and the scan completion arrive here as a [`NavEvent`];
//! [`NavState::update`] applies it synchronously and re-flattens the tree
//! whenever an expansion flag changed. No I/O happens in this module.

use indextree::NodeId;

use crate::crawler::ScanStats;
use crate::error::ScanError;
use crate::heat::Metric;
use crate::scan::ScanOutcome;
use crate::tree::{HeatNode, HeatTree};
use crate::visible::flatten;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSwitch {
    To(Metric),
    Toggle,
}

#[derive(Debug)]
pub enum NavEvent {
    MoveDown,
    MoveUp,
    ToggleNode,
    ExpandAllUnder,
    CollapseAllUnder,
    SwitchMetric(MetricSwitch),
    Quit,
    ScanCompleted(Result<ScanOutcome, ScanError>),
}

#[derive(Debug)]
pub enum Phase {
    Loading,
    Ready(HeatTree),
    Failed(ScanError),
}

#[derive(Debug)]
pub struct NavState {
    phase: Phase,
    visible: Vec<NodeId>,
    cursor: usize,
    metric: Metric,
    stats: Option<ScanStats>,
    quit: bool,
}

impl Default for NavState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            visible: Vec::new(),
            cursor: 0,
            metric: Metric::Size,
            stats: None,
            quit: false,
        }
    }

    /// Reducer form of [`NavState::update`]
    pub fn reduce(mut self, event: NavEvent) -> Self {
        self.update(event);
        self
    }

    /// Apply one event. Events that make no sense in the current phase are
    /// dropped; after `Quit` nothing changes any more.
    pub fn update(&mut self, event: NavEvent) {
        if self.quit {
            return;
        }

        if let NavEvent::Quit = event {
            self.quit = true;
            return;
        }

        match event {
            NavEvent::ScanCompleted(result) => {
                if matches!(self.phase, Phase::Loading) {
                    self.install(result);
                }
            }
            event => {
                if self.is_ready() {
                    self.navigate(event);
                }
            }
        }
    }

    fn install(&mut self, result: Result<ScanOutcome, ScanError>) {
        match result {
            Ok(outcome) => {
                self.visible = flatten(&outcome.tree);
                self.cursor = 0;
                self.stats = Some(outcome.stats);
                self.phase = Phase::Ready(outcome.tree);
            }
            Err(err) => {
                self.visible.clear();
                self.cursor = 0;
                self.phase = Phase::Failed(err);
            }
        }
    }

    fn navigate(&mut self, event: NavEvent) {
        match event {
            NavEvent::MoveDown => {
                if self.cursor + 1 < self.visible.len() {
                    self.cursor += 1;
                }
            }
            NavEvent::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            NavEvent::ToggleNode => self.mutate_selected(HeatTree::toggle),
            NavEvent::ExpandAllUnder => self.mutate_selected(HeatTree::expand_all),
            NavEvent::CollapseAllUnder => self.mutate_selected(HeatTree::collapse_all),
            NavEvent::SwitchMetric(MetricSwitch::To(metric)) => self.metric = metric,
            NavEvent::SwitchMetric(MetricSwitch::Toggle) => self.metric = self.metric.toggled(),
            NavEvent::Quit | NavEvent::ScanCompleted(_) => {}
        }
    }

    /// Run `op` on the selected directory and re-flatten. The cursor keeps
    /// its index rather than following the node.
    fn mutate_selected(&mut self, op: fn(&mut HeatTree, NodeId)) {
        let Some(selected) = self.visible.get(self.cursor).copied() else {
            return;
        };
        let Phase::Ready(tree) = &mut self.phase else {
            return;
        };
        if !tree.get(selected).map(HeatNode::is_dir).unwrap_or(false) {
            return;
        }

        op(tree, selected);
        self.visible = flatten(tree);
        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn visible(&self) -> &[NodeId] {
        &self.visible
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn tree(&self) -> Option<&HeatTree> {
        match &self.phase {
            Phase::Ready(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ScanError> {
        match &self.phase {
            Phase::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn stats(&self) -> Option<&ScanStats> {
        self.stats.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready(_))
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Node under the cursor, if any
    pub fn selected(&self) -> Option<&HeatNode> {
        let tree = self.tree()?;
        tree.get(*self.visible.get(self.cursor)?)
    }
}
