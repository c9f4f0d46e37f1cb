//! Sampling profiler.
//!
//! - `stack`: per-thread shadow stacks that profiled code pushes frames onto
//! - `source`: the `StackSource` seam the timer reads snapshots through
//! - `session`: the `Sampler` timer thread and scoped sessions

pub mod session;
pub mod source;
pub mod stack;

// Re-export main types and functions
pub use session::{ProfilingSession, Sampler, SamplerConfig};
pub use source::StackSource;
pub use stack::{
    current_stack, enter, enter_frame, in_frame, lookup, register_current, unregister,
    FrameGuard, StackHandle,
};
