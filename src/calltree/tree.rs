//! Weighted call tree built from stack samples.
//!
//! Every sample increments the count of each node on its path, so a node's
//! count is the number of samples that observed that frame. Counts are not
//! roll-up sums of children.
//!
//! Lifecycle: a `CallTreeBuilder` starts `Empty`, moves to `Building` with its
//! first sample and is consumed by `freeze()` into an immutable `CallTree`.

use super::frame::Frame;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// Lifecycle state of a call tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    /// No sample recorded yet
    Empty,
    /// Sampling in progress
    Building,
    /// Sampling stopped; no further mutation
    Frozen,
}

/// One node of the call tree
#[derive(Debug, Clone, PartialEq)]
pub struct CallTreeNode {
    frame: Frame,
    count: u64,
    children: HashMap<Frame, CallTreeNode>,
}

impl CallTreeNode {
    pub(crate) fn new(frame: Frame) -> Self {
        Self {
            frame,
            count: 0,
            children: HashMap::new(),
        }
    }

    /// Rebuild a node from stored parts (used when loading reports)
    pub(crate) fn from_parts(frame: Frame, count: u64, children: Vec<CallTreeNode>) -> Self {
        Self {
            frame,
            count,
            children: children
                .into_iter()
                .map(|child| (child.frame.clone(), child))
                .collect(),
        }
    }

    /// Record one sample path below (and including) this node.
    ///
    /// `frames` is ordered outermost first.
    fn record_path(&mut self, frames: &[Frame]) {
        self.count += 1;
        if let Some((head, tail)) = frames.split_first() {
            self.children
                .entry(head.clone())
                .or_insert_with(|| CallTreeNode::new(head.clone()))
                .record_path(tail);
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Number of samples that observed this frame
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of samples whose innermost frame was this node
    pub fn self_count(&self) -> u64 {
        let children: u64 = self.children.values().map(|c| c.count).sum();
        self.count.saturating_sub(children)
    }

    /// Children keyed by frame identity (unordered)
    pub fn children(&self) -> &HashMap<Frame, CallTreeNode> {
        &self.children
    }

    pub fn child(&self, frame: &Frame) -> Option<&CallTreeNode> {
        self.children.get(frame)
    }

    /// Children by descending count, ties broken by frame identity
    pub fn sorted_children(&self) -> Vec<&CallTreeNode> {
        let mut children: Vec<&CallTreeNode> = self.children.values().collect();
        children.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.frame.cmp(&b.frame)));
        children
    }

    /// Number of nodes below this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Height of the subtree below this node (0 for a leaf)
    pub fn height(&self) -> usize {
        self.children
            .values()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Mutable tree owned by the sampling thread
#[derive(Debug)]
pub struct CallTreeBuilder {
    root: CallTreeNode,
    missed_samples: u64,
}

impl CallTreeBuilder {
    /// Create an empty builder whose root represents the session `label`
    pub fn new(label: &str) -> Self {
        Self {
            root: CallTreeNode::new(Frame::root(label)),
            missed_samples: 0,
        }
    }

    /// Fold one sample (outermost frame first) into the tree
    pub fn record(&mut self, frames: &[Frame]) {
        self.root.record_path(frames);
    }

    /// Count a tick whose stack could not be captured
    pub fn record_missed(&mut self) {
        self.missed_samples += 1;
    }

    pub fn state(&self) -> TreeState {
        if self.root.count == 0 {
            TreeState::Empty
        } else {
            TreeState::Building
        }
    }

    pub fn total_samples(&self) -> u64 {
        self.root.count
    }

    pub fn missed_samples(&self) -> u64 {
        self.missed_samples
    }

    /// Stop building and hand out the immutable tree
    pub fn freeze(
        self,
        interval: Duration,
        started_at: DateTime<Utc>,
        stopped_at: DateTime<Utc>,
    ) -> CallTree {
        CallTree {
            root: self.root,
            interval,
            missed_samples: self.missed_samples,
            started_at,
            stopped_at,
        }
    }
}

/// Frozen call tree of one profiling session
#[derive(Debug, Clone, PartialEq)]
pub struct CallTree {
    root: CallTreeNode,
    interval: Duration,
    missed_samples: u64,
    started_at: DateTime<Utc>,
    stopped_at: DateTime<Utc>,
}

impl CallTree {
    pub(crate) fn from_parts(
        root: CallTreeNode,
        interval: Duration,
        missed_samples: u64,
        started_at: DateTime<Utc>,
        stopped_at: DateTime<Utc>,
    ) -> Self {
        Self {
            root,
            interval,
            missed_samples,
            started_at,
            stopped_at,
        }
    }

    pub fn root(&self) -> &CallTreeNode {
        &self.root
    }

    pub fn state(&self) -> TreeState {
        TreeState::Frozen
    }

    /// Label of the profiled thread
    pub fn label(&self) -> &str {
        &self.root.frame.method
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of samples folded into the tree
    pub fn total_samples(&self) -> u64 {
        self.root.count
    }

    pub fn missed_samples(&self) -> u64 {
        self.missed_samples
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        1 + self.root.descendant_count()
    }

    /// Deepest node depth (root is depth 0)
    pub fn max_depth(&self) -> usize {
        self.root.height()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stopped_at(&self) -> DateTime<Utc> {
        self.stopped_at
    }

    pub fn is_empty(&self) -> bool {
        self.root.count == 0
    }
}
