//! Configuration and constants for the library and CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default sampling interval in milliseconds
pub const DEFAULT_INTERVAL_MS: i64 = 500;

// Rendering bounds used by the CLI when none are given
pub const DEFAULT_MAX_NODES: usize = 50;
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Number of hot paths stored in a profile report
pub const DEFAULT_TOP_PATHS: usize = 20;
pub const MAX_TOP_PATHS: usize = 1000;

/// Class name carried by the root node of every call tree
pub const ROOT_CLASS: &str = "<session>";

/// Name prefix for sampler timer threads
pub const SAMPLER_THREAD_PREFIX: &str = "sampler-";

/// Separator between frames in collapsed stack lines
pub const STACK_SEPARATOR: char = ';';
