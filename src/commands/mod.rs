//! CLI command implementations.
//!
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod profile;
pub mod utils;
pub mod workload;

// Re-export main command functions
pub use models::ProfileArgs;
pub use profile::{execute_profile, validate_args};
pub use utils::{display_schema, display_version, render_profile_file, validate_profile_file};
pub use workload::DemoWorkload;
