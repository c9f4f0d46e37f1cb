//! Toolbelt
//!
//! A small utility library whose main piece is a sampling call-tree
//! profiler:
//!
//! - [`sampler`]: background timer that samples a thread's shadow stack
//! - [`calltree`]: weighted call tree, bounded text rendering, hot paths
//! - [`output`] / [`flamegraph`]: JSON reports and SVG flamegraphs
//!
//! Alongside it live collection helpers ([`collections`]), a property
//! comparator ([`compare`]) and error wrapping helpers ([`failure`]).
//!
//! ## Getting Started
//!
//! ```
//! use toolbelt::calltree::RenderLimits;
//! use toolbelt::sampler::{enter, Sampler};
//!
//! let mut sampler = Sampler::new(1).unwrap();
//! let ((), tree) = sampler
//!     .profile("main", || {
//!         let _frame = enter("Example", "work");
//!         std::thread::sleep(std::time::Duration::from_millis(5));
//!     })
//!     .unwrap();
//!
//! let text = tree.render_to_string(RenderLimits::default()).unwrap();
//! assert!(text.starts_with(&tree.total_samples().to_string()));
//! ```

pub mod calltree;
pub mod collections;
pub mod commands;
pub mod compare;
pub mod failure;
pub mod flamegraph;
pub mod output;
pub mod sampler;
pub mod utils;
