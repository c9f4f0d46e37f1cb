//! Output JSON schema definitions for profile reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.
//!
//! The call tree is stored as a flat pre-order node list where every node
//! names its parent by index, so the JSON nesting depth does not grow with
//! the depth of the profiled stacks.

use crate::calltree::{CallTree, CallTreeNode, Frame};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Top-level profile structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Label of the profiled thread
    pub label: String,

    /// Sampling interval in milliseconds
    pub interval_ms: u64,

    /// Samples folded into the tree
    pub total_samples: u64,

    /// Ticks whose stack could not be captured
    pub missed_samples: u64,

    pub started_at: DateTime<Utc>,

    pub stopped_at: DateTime<Utc>,

    /// Call tree nodes in pre-order; index 0 is the root
    pub nodes: Vec<NodeReport>,

    /// Top hot paths (ranked by self samples)
    pub hot_paths: Vec<HotPath>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// One call tree node in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeReport {
    pub class: String,
    pub method: String,
    pub count: u64,
    /// Index of the parent node; absent for the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
}

/// A hot path in the session (collapsed stack with its self samples)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotPath {
    /// Collapsed stack representation (e.g., "App.run;App.parse")
    pub stack: String,

    /// Samples whose innermost frame ended this path
    pub samples: u64,

    /// Percentage of all samples
    pub percentage: f64,
}

impl NodeReport {
    fn new(node: &CallTreeNode, parent: Option<usize>) -> Self {
        Self {
            class: node.frame().class.to_string(),
            method: node.frame().method.to_string(),
            count: node.count(),
            parent,
        }
    }

    fn frame(&self) -> Frame {
        Frame::owned(self.class.clone(), self.method.clone())
    }
}

/// Flatten `root` in pre-order, siblings hottest first
fn flatten(root: &CallTreeNode) -> Vec<NodeReport> {
    let mut nodes = Vec::new();
    let mut pending = vec![(root, None)];

    while let Some((node, parent)) = pending.pop() {
        let index = nodes.len();
        nodes.push(NodeReport::new(node, parent));
        pending.extend(
            node.sorted_children()
                .into_iter()
                .rev()
                .map(|child| (child, Some(index))),
        );
    }

    nodes
}

/// Rebuild the node hierarchy from a flat list
///
/// Parents must precede their children and sibling frames must be unique.
fn unflatten(nodes: &[NodeReport]) -> Result<CallTreeNode, OutputError> {
    let invalid = |reason: String| OutputError::InvalidReport(reason);

    match nodes.first() {
        None => return Err(invalid("report has no call tree nodes".to_string())),
        Some(root) if root.parent.is_some() => {
            return Err(invalid("first node must be the root".to_string()))
        }
        Some(_) => {}
    }

    let mut siblings = HashSet::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate().skip(1) {
        let parent = node
            .parent
            .ok_or_else(|| invalid(format!("node {} has no parent", index)))?;
        if parent >= index {
            return Err(invalid(format!(
                "node {} points to parent {} which does not precede it",
                index, parent
            )));
        }
        if !siblings.insert((parent, node.frame())) {
            return Err(invalid(format!(
                "duplicate child {}.{} under node {}",
                node.class, node.method, parent
            )));
        }
    }

    // Children always follow their parent, so a reverse walk finishes
    // every subtree before its parent needs it.
    let mut children: Vec<Vec<CallTreeNode>> = vec![Vec::new(); nodes.len()];
    let mut root = None;
    for (index, node) in nodes.iter().enumerate().rev() {
        let built = CallTreeNode::from_parts(
            node.frame(),
            node.count,
            std::mem::take(&mut children[index]),
        );
        match node.parent {
            Some(parent) => children[parent].push(built),
            None => root = Some(built),
        }
    }

    root.ok_or_else(|| invalid("report has no root node".to_string()))
}

impl ProfileReport {
    /// Build a report from a frozen tree and its hot paths
    pub fn from_tree(tree: &CallTree, hot_paths: Vec<HotPath>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            label: tree.label().to_string(),
            interval_ms: tree.interval().as_millis() as u64,
            total_samples: tree.total_samples(),
            missed_samples: tree.missed_samples(),
            started_at: tree.started_at(),
            stopped_at: tree.stopped_at(),
            nodes: flatten(tree.root()),
            hot_paths,
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    /// Root node entry, if any
    pub fn root(&self) -> Option<&NodeReport> {
        self.nodes.first()
    }

    /// Rebuild the frozen tree stored in this report
    ///
    /// # Errors
    /// * `OutputError::InvalidReport` - the node list does not form a tree
    pub fn to_tree(&self) -> Result<CallTree, OutputError> {
        Ok(CallTree::from_parts(
            unflatten(&self.nodes)?,
            Duration::from_millis(self.interval_ms),
            self.missed_samples,
            self.started_at,
            self.stopped_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calltree::CallTreeBuilder;

    fn sample_tree() -> CallTree {
        let mut builder = CallTreeBuilder::new("main");
        builder.record(&[Frame::new("A", "run"), Frame::new("A", "leaf")]);
        builder.record(&[Frame::new("A", "run")]);
        builder.record(&[Frame::new("A", "idle")]);
        builder.record_missed();

        let now = Utc::now();
        builder.freeze(Duration::from_millis(25), now, now)
    }

    fn node(method: &str, count: u64, parent: Option<usize>) -> NodeReport {
        NodeReport {
            class: "A".to_string(),
            method: method.to_string(),
            count,
            parent,
        }
    }

    #[test]
    fn test_report_from_tree() {
        let tree = sample_tree();
        let report = ProfileReport::from_tree(&tree, vec![]);

        assert_eq!(report.version, SCHEMA_VERSION);
        assert_eq!(report.label, "main");
        assert_eq!(report.interval_ms, 25);
        assert_eq!(report.total_samples, 3);
        assert_eq!(report.missed_samples, 1);

        let methods: Vec<&str> = report.nodes.iter().map(|n| n.method.as_str()).collect();
        assert_eq!(methods, vec!["main", "run", "leaf", "idle"]);
        let parents: Vec<Option<usize>> = report.nodes.iter().map(|n| n.parent).collect();
        assert_eq!(parents, vec![None, Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_report_rebuilds_tree() {
        let tree = sample_tree();
        let report = ProfileReport::from_tree(&tree, vec![]);

        assert_eq!(report.to_tree().unwrap(), tree);
    }

    #[test]
    fn test_root_parent_is_omitted_from_json() {
        let report = ProfileReport::from_tree(&sample_tree(), vec![]);
        let json = serde_json::to_value(&report.nodes).unwrap();

        assert!(json[0].get("parent").is_none());
        assert_eq!(json[1]["parent"], 0);
    }

    #[test]
    fn test_duplicate_siblings_rejected() {
        let mut report = ProfileReport::from_tree(&sample_tree(), vec![]);
        report.nodes = vec![
            node("main", 2, None),
            node("run", 1, Some(0)),
            node("run", 1, Some(0)),
        ];

        let err = report.to_tree().unwrap_err();
        assert!(matches!(err, OutputError::InvalidReport(_)));
        assert!(err.to_string().contains("duplicate child A.run"));
    }

    #[test]
    fn test_forward_parent_rejected() {
        let mut report = ProfileReport::from_tree(&sample_tree(), vec![]);
        report.nodes = vec![node("main", 1, None), node("run", 1, Some(2)), node("leaf", 1, Some(1))];

        assert!(matches!(
            report.to_tree(),
            Err(OutputError::InvalidReport(_))
        ));
    }

    #[test]
    fn test_empty_node_list_rejected() {
        let mut report = ProfileReport::from_tree(&sample_tree(), vec![]);
        report.nodes.clear();

        assert!(report.to_tree().is_err());
        assert!(report.root().is_none());
    }
}
