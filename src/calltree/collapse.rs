//! Flatten a call tree into collapsed stack format.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "parent;child;grandchild weight"
//!
//! Example: "Workload.run;Workload.inner_a 7"
//! This means: 7 samples were taken while inner_a (called from run) was the
//! innermost frame.

use super::tree::{CallTree, CallTreeNode};
use crate::utils::config::STACK_SEPARATOR;
use log::debug;

/// A single collapsed stack entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string
    pub stack: String,

    /// Weight (self samples of the innermost frame)
    pub weight: u64,
}

impl CollapsedStack {
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// Line in the form accepted by flamegraph tools
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }

    /// Innermost frame of the path
    pub fn leaf(&self) -> &str {
        self.stack
            .rsplit(STACK_SEPARATOR)
            .next()
            .unwrap_or(&self.stack)
    }
}

/// Build collapsed stacks from a frozen tree
///
/// The root is not part of the path. Samples that ended at the root (empty
/// target stack) therefore produce no entry.
///
/// # Returns
/// One entry per path with self samples, sorted by weight (descending),
/// then by path.
pub fn build_collapsed_stacks(tree: &CallTree) -> Vec<CollapsedStack> {
    let mut stacks = Vec::new();
    let mut path: Vec<String> = Vec::new();

    for child in tree.root().children().values() {
        collect(child, &mut path, &mut stacks);
    }

    stacks.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.stack.cmp(&b.stack)));

    debug!("Built {} collapsed stacks from {} nodes", stacks.len(), tree.node_count());

    stacks
}

fn collect(node: &CallTreeNode, path: &mut Vec<String>, out: &mut Vec<CollapsedStack>) {
    path.push(node.frame().to_string());

    let self_count = node.self_count();
    if self_count > 0 {
        out.push(CollapsedStack::new(
            path.join(&STACK_SEPARATOR.to_string()),
            self_count,
        ));
    }

    for child in node.children().values() {
        collect(child, path, out);
    }

    path.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calltree::{CallTreeBuilder, Frame};
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn test_collapsed_stack_to_line() {
        let stack = CollapsedStack::new("A.run;A.inner".to_string(), 10);
        assert_eq!(stack.to_line(), "A.run;A.inner 10");
        assert_eq!(stack.leaf(), "A.inner");
    }

    #[test]
    fn test_build_collapsed_stacks() {
        let run = Frame::new("A", "run");
        let inner = Frame::new("A", "inner");

        let mut builder = CallTreeBuilder::new("main");
        builder.record(&[run.clone(), inner.clone()]);
        builder.record(&[run.clone(), inner]);
        builder.record(&[run]);
        builder.record(&[]);

        let now = Utc::now();
        let tree = builder.freeze(Duration::from_millis(1), now, now);
        let stacks = build_collapsed_stacks(&tree);

        assert_eq!(
            stacks,
            vec![
                CollapsedStack::new("A.run;A.inner".to_string(), 2),
                CollapsedStack::new("A.run".to_string(), 1),
            ]
        );

        // Self counts cover every sample except those ending at the root
        let total: u64 = stacks.iter().map(|s| s.weight).sum();
        assert_eq!(total, tree.total_samples() - tree.root().self_count());
    }
}
