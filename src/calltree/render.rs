//! Bounded text rendering of a frozen call tree.
//!
//! Output is one line per node, indented two spaces per level:
//!
//! ```text
//! 12 (100.0%) <session>.main
//!   12 (100.0%) Workload.run
//!     7 (58.3%) Workload.inner_a
//!     5 (41.7%) Workload.inner_b
//! ```
//!
//! Children are ordered by descending count, ties broken by frame identity.
//! Branches cut by either bound are annotated with a line starting with
//! `...`; node lines never start with `...`.

use super::tree::{CallTree, CallTreeNode};
use crate::utils::config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES};
use crate::utils::error::RenderError;
use std::io::Write;

/// Bounds applied while rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLimits {
    /// Maximum node lines printed; must be at least 1
    pub max_nodes: usize,

    /// Deepest level printed; 0 prints only the root
    pub max_depth: usize,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RenderLimits {
    pub fn new(max_nodes: usize, max_depth: usize) -> Self {
        Self {
            max_nodes,
            max_depth,
        }
    }

    /// No truncation at all
    pub fn unlimited() -> Self {
        Self {
            max_nodes: usize::MAX,
            max_depth: usize::MAX,
        }
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.max_nodes == 0 {
            return Err(RenderError::InvalidLimit(
                "max_nodes must be at least 1 (use RenderLimits::unlimited() for no limit)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Render `tree` to `out` within `limits`
///
/// # Errors
/// * `RenderError::InvalidLimit` - `max_nodes` is 0
/// * `RenderError::Io` - the writer failed
pub fn render_tree<W: Write>(
    tree: &CallTree,
    out: &mut W,
    limits: RenderLimits,
) -> Result<(), RenderError> {
    limits.validate()?;

    let mut renderer = Renderer {
        out,
        limits,
        total_samples: tree.total_samples(),
        printed: 0,
        hidden_by_depth: 0,
    };

    let completed = renderer.visit(tree.root(), 0)?;

    if !completed {
        let hidden = tree
            .node_count()
            .saturating_sub(renderer.printed + renderer.hidden_by_depth);
        writeln!(
            renderer.out,
            "... output truncated at {} node(s); {} more not shown",
            limits.max_nodes, hidden
        )?;
    }

    Ok(())
}

/// Render `tree` into a `String`
pub fn render_to_string(tree: &CallTree, limits: RenderLimits) -> Result<String, RenderError> {
    let mut buffer = Vec::new();
    render_tree(tree, &mut buffer, limits)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

impl CallTree {
    /// See [`render_tree`]
    pub fn render<W: Write>(&self, out: &mut W, limits: RenderLimits) -> Result<(), RenderError> {
        render_tree(self, out, limits)
    }

    /// See [`render_to_string`]
    pub fn render_to_string(&self, limits: RenderLimits) -> Result<String, RenderError> {
        render_to_string(self, limits)
    }
}

struct Renderer<'a, W: Write> {
    out: &'a mut W,
    limits: RenderLimits,
    total_samples: u64,
    printed: usize,
    hidden_by_depth: usize,
}

impl<W: Write> Renderer<'_, W> {
    /// Pre-order walk. Returns `Ok(false)` once the node budget is spent
    /// with nodes still left to print.
    fn visit(&mut self, node: &CallTreeNode, depth: usize) -> Result<bool, RenderError> {
        if self.printed >= self.limits.max_nodes {
            return Ok(false);
        }

        self.write_node(node, depth)?;

        if node.children().is_empty() {
            return Ok(true);
        }

        if depth >= self.limits.max_depth {
            let hidden = node.descendant_count();
            self.hidden_by_depth += hidden;
            writeln!(
                self.out,
                "{}... {} deeper node(s) truncated (max depth {})",
                indent(depth + 1),
                hidden,
                self.limits.max_depth
            )?;
            return Ok(true);
        }

        for child in node.sorted_children() {
            if !self.visit(child, depth + 1)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn write_node(&mut self, node: &CallTreeNode, depth: usize) -> Result<(), RenderError> {
        let percentage = if self.total_samples > 0 {
            (node.count() as f64 / self.total_samples as f64) * 100.0
        } else {
            0.0
        };

        writeln!(
            self.out,
            "{}{} ({:.1}%) {}",
            indent(depth),
            node.count(),
            percentage,
            node.frame()
        )?;
        self.printed += 1;
        Ok(())
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
