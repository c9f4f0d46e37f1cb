use crate::calltree::RenderLimits;
use crate::flamegraph::FlamegraphConfig;
use crate::utils::config::{DEFAULT_INTERVAL_MS, DEFAULT_TOP_PATHS};
use std::path::PathBuf;

/// Arguments for the profile command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ProfileArgs {
    /// Sampling interval in milliseconds
    pub interval_ms: i64,

    /// Label of the profiled thread (root node name)
    pub label: String,

    /// Pause at the start of the demo workload, in milliseconds
    pub sleep_ms: u64,

    /// Loop iterations of the demo workload
    pub iterations: u64,

    /// Bounds for the printed call tree
    pub render_limits: RenderLimits,

    /// Output path for JSON profile (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Number of top hot paths to include in profile
    pub top_paths: usize,

    /// Flamegraph configuration
    pub flamegraph_config: Option<FlamegraphConfig>,

    /// Print hot path summary to stdout
    pub print_summary: bool,
}

impl Default for ProfileArgs {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            label: "main".to_string(),
            sleep_ms: 400,
            iterations: 2_000,
            render_limits: RenderLimits::default(),
            output_json: None,
            output_svg: None,
            top_paths: DEFAULT_TOP_PATHS,
            flamegraph_config: None,
            print_summary: false,
        }
    }
}
