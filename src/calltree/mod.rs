//! Call tree aggregation, rendering and flattening.
//!
//! This module turns stack samples into:
//! - A weighted call tree (frozen once sampling stops)
//! - Bounded text renderings of that tree
//! - Collapsed stacks and hot-path metrics

pub mod collapse;
pub mod frame;
pub mod metrics;
pub mod render;
pub mod tree;

// Re-export main types and functions
pub use collapse::{build_collapsed_stacks, CollapsedStack};
pub use frame::Frame;
pub use metrics::{calculate_hot_paths, calculate_sample_distribution, SampleDistribution};
pub use render::{render_tree, RenderLimits};
pub use tree::{CallTree, CallTreeBuilder, CallTreeNode, TreeState};
